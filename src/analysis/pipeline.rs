//! Two-load analysis: production graph versus test-inclusive graph.

use std::collections::BTreeSet;

use crate::graph::{test_only, ImportGraph, ModuleGraph, ModuleUniverse};
use crate::resolver::{LoadMode, ResolveResult, Resolver};

/// Everything needed to render the dependency diagram.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Module graph projected from the test-inclusive load.
    pub graph: ModuleGraph,
    /// Modules flagged as main by the resolver.
    pub main_modules: BTreeSet<String>,
    /// Modules reachable without test sources.
    pub without_tests: ModuleUniverse,
    /// Modules reachable with test sources.
    pub with_tests: ModuleUniverse,
    /// `with_tests \ without_tests`.
    pub test_only: ModuleUniverse,
}

impl Analysis {
    /// Returns true if `module` is reachable only through tests.
    pub fn is_test_only(&self, module: &str) -> bool {
        self.test_only.contains(module)
    }

    /// Returns true if `module` is a main module.
    pub fn is_main(&self, module: &str) -> bool {
        self.main_modules.contains(module)
    }
}

/// Loads `pattern` twice and derives the test-only module set.
///
/// The production load runs first. Any resolver error aborts the analysis.
///
/// # Example
///
/// ```
/// use testdeps::analysis::analyze;
/// use testdeps::resolver::SnapshotResolver;
///
/// let resolver = SnapshotResolver::parse_str(r#"{"packages": [
///     {"id": "app", "module": "app", "main": true,
///      "imports": ["lib"], "test_imports": ["check"]},
///     {"id": "lib", "module": "lib"},
///     {"id": "check", "module": "check"}
/// ]}"#).unwrap();
///
/// let analysis = analyze(&resolver, "all").unwrap();
/// assert_eq!(analysis.test_only.sorted(), vec!["check"]);
/// assert!(analysis.is_main("app"));
/// ```
pub fn analyze<R>(resolver: &R, pattern: &str) -> ResolveResult<Analysis>
where
    R: Resolver + ?Sized,
{
    let production = resolver.resolve(pattern, LoadMode::Production)?;
    let without_tests = ModuleUniverse::collect(&production, production.roots());
    drop(production);

    let packages = resolver.resolve(pattern, LoadMode::WithTests)?;
    let with_tests = ModuleUniverse::collect(&packages, packages.roots());
    let mut graph = ModuleGraph::project(&packages, packages.roots());
    let main_modules = main_modules(&packages, packages.roots());

    let test_only = test_only(&with_tests, &without_tests);

    for module in test_only.iter() {
        graph.add_module(module);
    }
    for module in main_modules.iter().filter(|m| with_tests.contains(m)) {
        graph.add_module(module);
    }

    tracing::info!(
        modules = graph.node_count(),
        edges = graph.edge_count(),
        without_tests = without_tests.len(),
        with_tests = with_tests.len(),
        test_only = test_only.len(),
        "analysis complete"
    );

    Ok(Analysis {
        graph,
        main_modules,
        without_tests,
        with_tests,
        test_only,
    })
}

fn main_modules<G>(packages: &G, roots: &[G::Node]) -> BTreeSet<String>
where
    G: ImportGraph + ?Sized,
{
    let mut mains = BTreeSet::new();
    crate::graph::traverse(packages, roots, |pkg| {
        if packages.is_main_module(pkg) {
            if let Some(module) = packages.module_of(pkg) {
                mains.insert(module.to_string());
            }
        }
    });
    mains
}
