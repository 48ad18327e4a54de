//! Resolver backed by `go list`.
//!
//! Runs `go list -e -json -deps [-test] <pattern>` and turns the emitted
//! stream of JSON package objects into a [`PackageGraph`].

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::process::Command;

use serde::Deserialize;

use super::types::{LoadMode, ModuleInfo, PackageGraph};
use super::{PackageDiagnostic, ResolveError, ResolveResult, Resolver};

/// Package object as printed by `go list -json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoPackage {
    import_path: String,
    #[serde(default)]
    module: Option<GoModule>,
    #[serde(default)]
    imports: Vec<String>,
    #[serde(default)]
    import_map: HashMap<String, String>,
    #[serde(default)]
    dep_only: bool,
    #[serde(default)]
    error: Option<GoPackageError>,
    #[serde(default)]
    deps_errors: Vec<GoPackageError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoModule {
    path: String,
    #[serde(default)]
    main: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoPackageError {
    #[serde(default)]
    import_stack: Vec<String>,
    #[serde(default)]
    pos: String,
    err: String,
}

impl GoPackageError {
    fn message(&self) -> String {
        if self.pos.is_empty() {
            self.err.clone()
        } else {
            format!("{}: {}", self.pos, self.err)
        }
    }
}

/// A [`Resolver`] that shells out to the Go toolchain.
#[derive(Debug, Clone)]
pub struct GoListResolver {
    go: PathBuf,
    dir: PathBuf,
}

impl Default for GoListResolver {
    fn default() -> Self {
        Self::new("go", ".")
    }
}

impl GoListResolver {
    /// Creates a resolver that runs `go` inside `dir`.
    pub fn new(go: impl Into<PathBuf>, dir: impl Into<PathBuf>) -> Self {
        Self {
            go: go.into(),
            dir: dir.into(),
        }
    }

    fn args(pattern: &str, mode: LoadMode) -> Vec<&str> {
        let mut args = vec!["list", "-e", "-json", "-deps"];
        if mode.includes_tests() {
            args.push("-test");
        }
        args.push(pattern);
        args
    }
}

impl Resolver for GoListResolver {
    fn resolve(&self, pattern: &str, mode: LoadMode) -> ResolveResult<PackageGraph> {
        let program = self.go.display().to_string();
        let args = Self::args(pattern, mode);
        tracing::debug!(program = %program, ?args, dir = %self.dir.display(), "running resolver");

        let output = Command::new(&self.go)
            .args(&args)
            .current_dir(&self.dir)
            .output()
            .map_err(|source| ResolveError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ResolveError::Command {
                program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let graph = parse_output(&stdout)?;
        tracing::info!(%mode, packages = graph.len(), roots = graph.roots().len(), "loaded packages");
        Ok(graph)
    }
}

/// Builds a [`PackageGraph`] from the JSON stream printed by `go list -json -deps`.
///
/// Packages without `DepOnly` are the roots. Any package or dependency error
/// fails the whole load with every diagnostic collected.
///
/// # Example
///
/// ```
/// use testdeps::resolver::go_list::parse_output;
///
/// let out = r#"
/// {"ImportPath": "fmt", "Standard": true, "DepOnly": true}
/// {"ImportPath": "example.com/app", "Module": {"Path": "example.com/app", "Main": true},
///  "Imports": ["fmt"]}
/// "#;
///
/// let graph = parse_output(out).unwrap();
/// assert_eq!(graph.len(), 2);
/// assert_eq!(graph.roots().len(), 1);
/// ```
pub fn parse_output(stdout: &str) -> ResolveResult<PackageGraph> {
    let packages = serde_json::Deserializer::from_str(stdout)
        .into_iter::<GoPackage>()
        .collect::<Result<Vec<_>, _>>()?;

    let mut diagnostics = BTreeSet::new();
    for pkg in &packages {
        if let Some(err) = &pkg.error {
            diagnostics.insert(PackageDiagnostic::new(&pkg.import_path, err.message()));
        }
        for err in &pkg.deps_errors {
            let culprit = err.import_stack.last().unwrap_or(&pkg.import_path);
            diagnostics.insert(PackageDiagnostic::new(culprit, err.message()));
        }
    }
    if !diagnostics.is_empty() {
        return Err(ResolveError::Packages(diagnostics.into_iter().collect()));
    }

    let mut graph = PackageGraph::new();
    for pkg in &packages {
        let module = pkg.module.as_ref().map(|m| ModuleInfo {
            path: m.path.clone(),
            main: m.main,
        });
        let id = graph.add_package(&pkg.import_path, module);
        if id.index() + 1 != graph.len() {
            tracing::debug!(package = %pkg.import_path, "duplicate package in go list output");
        }
    }

    let mut unresolved = 0usize;
    for pkg in &packages {
        let Some(from) = graph.lookup(&pkg.import_path) else {
            continue;
        };
        for import in &pkg.imports {
            let to = graph.lookup(import).or_else(|| {
                pkg.import_map
                    .get(import)
                    .and_then(|mapped| graph.lookup(mapped))
            });
            if to.is_none() {
                unresolved += 1;
                tracing::debug!(package = %pkg.import_path, import = %import, "unresolved import");
            }
            graph.add_import(from, to);
        }
        if !pkg.dep_only {
            graph.add_root(from);
        }
    }

    if unresolved > 0 {
        tracing::debug!(unresolved, "skipping unresolved imports");
    }
    if graph.roots().is_empty() {
        tracing::warn!("go list matched no packages");
    }

    Ok(graph)
}
