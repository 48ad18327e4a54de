//! Test-only dependency analysis.
//!
//! Resolves a pattern once without and once with test sources, projects the
//! test-inclusive package graph onto modules, and diffs the two module
//! universes to find dependencies that only tests pull in.
//!
//! # Example
//!
//! ```ignore
//! use testdeps::analysis::analyze;
//! use testdeps::resolver::GoListResolver;
//!
//! let analysis = analyze(&GoListResolver::default(), "all")?;
//! for module in analysis.test_only.sorted() {
//!     println!("test-only: {}", module);
//! }
//! ```

pub mod pipeline;

pub use pipeline::{analyze, Analysis};
