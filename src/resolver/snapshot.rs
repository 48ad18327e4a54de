//! Resolver that replays a recorded package graph.
//!
//! Snapshots let the analysis run without a toolchain, and pin down
//! scenarios in tests. Each package lists its production imports and,
//! separately, the imports that only its test files add.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::types::{LoadMode, ModuleInfo, PackageGraph};
use super::{ResolveError, ResolveResult, Resolver};

/// Root document of a snapshot file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Snapshot {
    /// Explicit traversal roots. Defaults to every package of a main module.
    #[serde(default)]
    pub roots: Option<Vec<String>>,

    /// All packages known to the snapshot.
    #[serde(default)]
    pub packages: Vec<SnapshotPackage>,
}

/// One package entry in a snapshot.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SnapshotPackage {
    /// Unique package identity (import path).
    pub id: String,

    /// Owning module path. Absent for standard library packages.
    #[serde(default)]
    pub module: Option<String>,

    /// True if the owning module is the main module.
    #[serde(default)]
    pub main: bool,

    /// Imports made by production sources.
    #[serde(default)]
    pub imports: Vec<String>,

    /// Additional imports made only by test sources.
    #[serde(default, alias = "testImports")]
    pub test_imports: Vec<String>,
}

/// A [`Resolver`] backed by an in-memory [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotResolver {
    snapshot: Snapshot,
}

impl SnapshotResolver {
    /// Wraps an already-built snapshot, rejecting duplicate package ids.
    pub fn new(snapshot: Snapshot) -> ResolveResult<Self> {
        let mut seen = HashSet::new();
        for pkg in &snapshot.packages {
            if !seen.insert(pkg.id.as_str()) {
                return Err(ResolveError::InvalidSnapshot(format!(
                    "duplicate package id '{}'",
                    pkg.id
                )));
            }
        }
        Ok(Self { snapshot })
    }

    /// Loads a snapshot from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ResolveResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parses a snapshot from a JSON string.
    pub fn parse_str(content: &str) -> ResolveResult<Self> {
        let snapshot: Snapshot = serde_json::from_str(content)?;
        Self::new(snapshot)
    }

    fn default_roots(&self) -> Vec<&str> {
        match &self.snapshot.roots {
            Some(roots) => roots.iter().map(String::as_str).collect(),
            None => self
                .snapshot
                .packages
                .iter()
                .filter(|pkg| pkg.main && pkg.module.is_some())
                .map(|pkg| pkg.id.as_str())
                .collect(),
        }
    }
}

impl Resolver for SnapshotResolver {
    fn resolve(&self, pattern: &str, mode: LoadMode) -> ResolveResult<PackageGraph> {
        let mut graph = PackageGraph::new();

        for pkg in &self.snapshot.packages {
            let module = pkg.module.as_ref().map(|path| ModuleInfo {
                path: path.clone(),
                main: pkg.main,
            });
            graph.add_package(&pkg.id, module);
        }

        for pkg in &self.snapshot.packages {
            let Some(from) = graph.lookup(&pkg.id) else {
                continue;
            };
            let test_imports: &[String] = if mode.includes_tests() {
                &pkg.test_imports
            } else {
                &[]
            };
            for import in pkg.imports.iter().chain(test_imports) {
                let to = graph.lookup(import);
                if to.is_none() {
                    tracing::debug!(package = %pkg.id, import = %import, "unresolved import in snapshot");
                }
                graph.add_import(from, to);
            }
        }

        for root in self.default_roots() {
            if !matches_pattern(pattern, root) {
                continue;
            }
            match graph.lookup(root) {
                Some(id) => graph.add_root(id),
                None => {
                    return Err(ResolveError::InvalidSnapshot(format!(
                        "root '{}' is not a known package",
                        root
                    )))
                }
            }
        }

        if graph.roots().is_empty() {
            tracing::warn!(pattern, "pattern matched no packages");
        }
        tracing::info!(%mode, packages = graph.len(), roots = graph.roots().len(), "loaded snapshot");

        Ok(graph)
    }
}

/// Matches a package id against a load pattern.
///
/// `all` matches everything, `prefix/...` matches `prefix` and anything
/// below it, any other pattern must match exactly.
pub fn matches_pattern(pattern: &str, id: &str) -> bool {
    if pattern == "all" {
        return true;
    }
    match pattern.strip_suffix("/...") {
        Some(prefix) => {
            id == prefix
                || id
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        }
        None => pattern == id,
    }
}
