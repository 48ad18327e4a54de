use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use testdeps::analysis::analyze;
use testdeps::render::{render_to_string, RenderFormat, RenderedGraph};
use testdeps::resolver::{GoListResolver, ResolveError, Resolver, SnapshotResolver};

#[derive(Parser)]
#[command(name = "testdeps")]
#[command(version)]
#[command(about = "Prints the module dependency graph, highlighting modules that are present only because of tests", long_about = None)]
struct Cli {
    /// Package pattern to load
    #[arg(short, long, default_value = "all")]
    pattern: String,

    /// Directory to run the resolver in
    #[arg(short = 'C', long, default_value = ".")]
    dir: PathBuf,

    /// Go toolchain binary
    #[arg(long, env = "GO", default_value = "go")]
    go: PathBuf,

    /// Read the package graph from a JSON snapshot instead of running go list
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Output format: mermaid, dot or json
    #[arg(short, long, default_value = "mermaid")]
    format: RenderFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Exit status for resolution failures.
const EXIT_RESOLVE: u8 = 1;
/// Exit status for rendering and output failures.
const EXIT_OTHER: u8 = 3;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "testdeps=warn",
        1 => "testdeps=info",
        2 => "testdeps=debug",
        _ => "testdeps=trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn build_resolver(cli: &Cli) -> anyhow::Result<Box<dyn Resolver>> {
    match &cli.snapshot {
        Some(path) => {
            let resolver = SnapshotResolver::from_file(path)
                .with_context(|| format!("loading snapshot {}", path.display()))?;
            Ok(Box::new(resolver))
        }
        None => Ok(Box::new(GoListResolver::new(&cli.go, &cli.dir))),
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let resolver = build_resolver(cli)?;
    let analysis = analyze(&resolver, &cli.pattern)
        .with_context(|| format!("resolving pattern '{}'", cli.pattern))?;

    let rendered = RenderedGraph::from_analysis(&analysis);
    let output = render_to_string(cli.format, &rendered).context("rendering graph")?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes()).context("writing output")?;
    stdout.flush().context("writing output")?;
    Ok(())
}

/// Maps a failed run to its process exit status.
fn exit_status(err: &anyhow::Error) -> u8 {
    let resolution_failed = err
        .chain()
        .any(|cause| cause.downcast_ref::<ResolveError>().is_some());
    if resolution_failed {
        EXIT_RESOLVE
    } else {
        EXIT_OTHER
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("testdeps: {:#}", err);
            ExitCode::from(exit_status(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use testdeps::resolver::PackageDiagnostic;

    #[test]
    fn test_bad_snapshot_exits_with_resolve_status() {
        let err = SnapshotResolver::parse_str("{ not json").unwrap_err();
        let err = anyhow::Error::new(err).context("loading snapshot deps.json");
        assert_eq!(exit_status(&err), EXIT_RESOLVE);
    }

    #[test]
    fn test_package_errors_exit_with_resolve_status() {
        let err = ResolveError::Packages(vec![PackageDiagnostic::new(
            "example.com/app",
            "missing go.sum entry",
        )]);
        let err = anyhow::Error::new(err).context("resolving pattern 'all'");
        assert_eq!(exit_status(&err), EXIT_RESOLVE);
    }

    #[test]
    fn test_output_failure_exits_with_other_status() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed");
        let err = anyhow::Error::new(io_err).context("writing output");
        assert_eq!(exit_status(&err), EXIT_OTHER);

        let err = anyhow!("rendering graph");
        assert_eq!(exit_status(&err), EXIT_OTHER);
    }

    #[test]
    fn test_missing_snapshot_exits_with_resolve_status() {
        let cli = Cli::parse_from(["testdeps", "--snapshot", "/nonexistent/testdeps-snapshot.json"]);
        let err = run(&cli).unwrap_err();
        assert_eq!(exit_status(&err), EXIT_RESOLVE);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["testdeps"]);
        assert_eq!(cli.pattern, "all");
        assert_eq!(cli.format, RenderFormat::Mermaid);
        assert!(cli.snapshot.is_none());
    }
}
