//! assetdeps - Build-order resolver for annotated stylesheet and script assets
//!
//! This crate scans `@module` / `@requires` / `@package` annotations in
//! source assets, assembles them into a directed acyclic graph, and derives
//! a deterministic order in which to concatenate or compile them.

pub mod export;
pub mod graph;
pub mod parser;
pub mod resolver;
