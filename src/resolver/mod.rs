//! Resolver boundary for loading package graphs.
//!
//! A [`Resolver`] turns a load pattern into a [`PackageGraph`], either with
//! or without test sources. The analysis core never looks past this trait.
//!
//! # Supported Resolvers
//!
//! - **go list** ([`GoListResolver`]) - runs the Go toolchain
//! - **snapshot** ([`SnapshotResolver`]) - replays a recorded JSON graph
//!
//! # Example
//!
//! ```
//! use testdeps::resolver::{LoadMode, Resolver, SnapshotResolver};
//!
//! let json = r#"{
//!     "packages": [
//!         {"id": "example.com/app", "module": "example.com/app", "main": true,
//!          "imports": ["fmt"]},
//!         {"id": "fmt"}
//!     ]
//! }"#;
//!
//! let resolver = SnapshotResolver::parse_str(json).unwrap();
//! let graph = resolver.resolve("all", LoadMode::Production).unwrap();
//! assert_eq!(graph.roots().len(), 1);
//! ```

pub mod go_list;
pub mod snapshot;
pub mod types;

use std::fmt;

pub use go_list::GoListResolver;
pub use snapshot::SnapshotResolver;
pub use types::{LoadMode, ModuleInfo, Package, PackageGraph, PackageId};

/// A single error reported by the resolver against one package.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PackageDiagnostic {
    /// Import path of the package the error belongs to.
    pub package: String,
    /// The error message.
    pub message: String,
}

impl PackageDiagnostic {
    /// Creates a new diagnostic.
    pub fn new(package: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for PackageDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.package, self.message)
    }
}

/// Errors that can occur while resolving a package graph.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The resolver program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The resolver program exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    Command {
        program: String,
        status: String,
        stderr: String,
    },

    /// Failed to read resolver input.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// Resolver output was not valid JSON.
    #[error("failed to decode resolver output: {0}")]
    Decode(#[from] serde_json::Error),

    /// The snapshot document is structurally invalid.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// One or more packages reported load errors.
    #[error("{} package error(s), aborting:\n{}", .0.len(), format_diagnostics(.0))]
    Packages(Vec<PackageDiagnostic>),
}

/// Result type alias for resolver operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

fn format_diagnostics(diagnostics: &[PackageDiagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("  {}", d))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Loads the package graph for a pattern.
///
/// Implementations perform the load exactly once per call and report any
/// error as fatal; callers never see a partially loaded graph.
pub trait Resolver {
    /// Resolves `pattern`, including test sources when `mode` asks for them.
    fn resolve(&self, pattern: &str, mode: LoadMode) -> ResolveResult<PackageGraph>;
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn resolve(&self, pattern: &str, mode: LoadMode) -> ResolveResult<PackageGraph> {
        (**self).resolve(pattern, mode)
    }
}

impl<R: Resolver + ?Sized> Resolver for Box<R> {
    fn resolve(&self, pattern: &str, mode: LoadMode) -> ResolveResult<PackageGraph> {
        (**self).resolve(pattern, mode)
    }
}
