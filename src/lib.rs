//! testdeps - module dependency diagrams that separate test-only dependencies
//!
//! This crate loads a module's package graph twice, once without and once
//! with test sources, collapses it onto modules, and renders the result with
//! every module classified as main, test-only or regular.

pub mod analysis;
pub mod graph;
pub mod render;
pub mod resolver;
