//! Package graph types produced by resolvers.
//!
//! A [`PackageGraph`] is an arena of [`Package`]s addressed by [`PackageId`].
//! Resolvers build it once per load; the analysis core only reads it.

use std::collections::HashMap;
use std::fmt;

use crate::graph::ImportGraph;

/// Stable identity of a package inside one [`PackageGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId(usize);

impl PackageId {
    /// Returns the arena slot of this package.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Selects whether test sources and their imports are part of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadMode {
    /// Only production sources.
    #[default]
    Production,
    /// Production sources plus test files and everything they import.
    WithTests,
}

impl LoadMode {
    /// Returns true if test sources are included.
    pub fn includes_tests(&self) -> bool {
        matches!(self, LoadMode::WithTests)
    }
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadMode::Production => write!(f, "production"),
            LoadMode::WithTests => write!(f, "with-tests"),
        }
    }
}

/// The module that owns a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Canonical module path, without version.
    pub path: String,
    /// True if this is the main module of the load.
    pub main: bool,
}

impl ModuleInfo {
    /// Creates a non-main module reference.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            main: false,
        }
    }

    /// Creates a main module reference.
    pub fn main(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            main: true,
        }
    }
}

/// A single compilation unit reported by a resolver.
#[derive(Debug, Clone)]
pub struct Package {
    /// Import path as reported by the resolver (unique within a graph).
    pub import_path: String,
    /// Owning module, or `None` for standard library code.
    pub module: Option<ModuleInfo>,
    /// Direct imports. `None` entries are unresolved placeholders.
    pub imports: Vec<Option<PackageId>>,
}

/// Arena of packages plus the roots selected by the load pattern.
///
/// # Example
///
/// ```rust
/// use testdeps::resolver::{ModuleInfo, PackageGraph};
///
/// let mut graph = PackageGraph::new();
/// let app = graph.add_package("example.com/app", Some(ModuleInfo::main("example.com/app")));
/// let fmt = graph.add_package("fmt", None);
/// graph.add_import(app, Some(fmt));
/// graph.add_root(app);
///
/// assert_eq!(graph.len(), 2);
/// assert_eq!(graph.roots(), &[app]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackageGraph {
    packages: Vec<Package>,
    roots: Vec<PackageId>,
    by_path: HashMap<String, PackageId>,
}

impl PackageGraph {
    /// Creates an empty package graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a package, or returns the existing id if the import path is known.
    pub fn add_package(&mut self, import_path: &str, module: Option<ModuleInfo>) -> PackageId {
        if let Some(&id) = self.by_path.get(import_path) {
            return id;
        }

        let id = PackageId(self.packages.len());
        self.packages.push(Package {
            import_path: import_path.to_string(),
            module,
            imports: Vec::new(),
        });
        self.by_path.insert(import_path.to_string(), id);
        id
    }

    /// Appends an import edge. `None` records an unresolved placeholder.
    pub fn add_import(&mut self, from: PackageId, to: Option<PackageId>) {
        if let Some(pkg) = self.packages.get_mut(from.0) {
            pkg.imports.push(to);
        }
    }

    /// Marks a package as a traversal root. Repeated roots are ignored.
    pub fn add_root(&mut self, id: PackageId) {
        if id.0 < self.packages.len() && !self.roots.contains(&id) {
            self.roots.push(id);
        }
    }

    /// Looks up a package id by import path.
    pub fn lookup(&self, import_path: &str) -> Option<PackageId> {
        self.by_path.get(import_path).copied()
    }

    /// Returns the package stored under `id`.
    pub fn package(&self, id: PackageId) -> Option<&Package> {
        self.packages.get(id.0)
    }

    /// Returns the traversal roots.
    pub fn roots(&self) -> &[PackageId] {
        &self.roots
    }

    /// Returns the number of packages in the arena.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if the arena holds no packages.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl ImportGraph for PackageGraph {
    type Node = PackageId;

    fn module_of(&self, node: PackageId) -> Option<&str> {
        self.package(node)
            .and_then(|pkg| pkg.module.as_ref())
            .map(|module| module.path.as_str())
            .filter(|path| !path.is_empty())
    }

    fn is_main_module(&self, node: PackageId) -> bool {
        self.package(node)
            .and_then(|pkg| pkg.module.as_ref())
            .is_some_and(|module| module.main && !module.path.is_empty())
    }

    fn imports(&self, node: PackageId) -> &[Option<PackageId>] {
        self.package(node)
            .map(|pkg| pkg.imports.as_slice())
            .unwrap_or(&[])
    }
}
