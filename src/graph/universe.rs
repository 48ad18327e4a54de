//! Module universes and the test-only diff.

use std::collections::{BTreeSet, HashSet};

use super::traverse::{traverse, ImportGraph};

/// The set of module paths reachable under one load mode.
///
/// Iteration order is unspecified; use [`ModuleUniverse::sorted`] when order
/// matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleUniverse {
    modules: HashSet<String>,
}

impl ModuleUniverse {
    /// Creates an empty universe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the owning modules of every package reachable from `roots`.
    ///
    /// Packages without a module do not contribute.
    pub fn collect<G>(graph: &G, roots: &[G::Node]) -> Self
    where
        G: ImportGraph + ?Sized,
    {
        let mut universe = Self::new();
        traverse(graph, roots, |node| {
            if let Some(module) = graph.module_of(node) {
                universe.insert(module);
            }
        });
        universe
    }

    /// Adds a module path. Empty paths are ignored.
    pub fn insert(&mut self, module: &str) -> bool {
        if module.is_empty() {
            return false;
        }
        self.modules.insert(module.to_string())
    }

    /// Returns true if the module is part of this universe.
    pub fn contains(&self, module: &str) -> bool {
        self.modules.contains(module)
    }

    /// Returns the number of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if the universe is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterates over module paths in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(String::as_str)
    }

    /// Returns the module paths in lexicographic order.
    pub fn sorted(&self) -> Vec<&str> {
        self.iter().collect::<BTreeSet<_>>().into_iter().collect()
    }

    /// Modules in `self` that are absent from `other`.
    pub fn difference(&self, other: &ModuleUniverse) -> ModuleUniverse {
        ModuleUniverse {
            modules: self.modules.difference(&other.modules).cloned().collect(),
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for ModuleUniverse {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut universe = Self::new();
        for module in iter {
            universe.insert(module.as_ref());
        }
        universe
    }
}

/// Modules reachable only once test sources are loaded.
///
/// # Example
///
/// ```rust
/// use testdeps::graph::{test_only, ModuleUniverse};
///
/// let without: ModuleUniverse = ["app", "lib"].into_iter().collect();
/// let with: ModuleUniverse = ["app", "lib", "testtool"].into_iter().collect();
///
/// assert_eq!(test_only(&with, &without).sorted(), vec!["testtool"]);
/// ```
pub fn test_only(with_tests: &ModuleUniverse, without_tests: &ModuleUniverse) -> ModuleUniverse {
    with_tests.difference(without_tests)
}
