//! Graph module for dependency ordering.
//!
//! This module provides the [`Dag`] struct, a directed acyclic graph that
//! rejects cycle-closing edges as they are inserted and yields its nodes in
//! dependency order.
//!
//! # Example
//!
//! ```rust
//! use assetdeps::graph::Dag;
//!
//! let mut graph: Dag<String> = Dag::new();
//! graph.add_node("forms".to_string()).unwrap();
//! graph.add_node("buttons".to_string()).unwrap();
//! graph.add_node("reset".to_string()).unwrap();
//! graph.add_edges_from_node("forms", ["buttons", "reset"]).unwrap();
//! graph.add_edge("buttons", "reset").unwrap();
//!
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.edge_count(), 3);
//!
//! let order: Vec<&String> = graph.topological_sort().collect();
//! assert_eq!(order, ["reset", "buttons", "forms"]);
//! ```

mod dag;
mod error;
mod node;

pub use dag::{Dag, TopologicalSort};
pub use error::{Cycle, GraphError, GraphResult};
pub use node::Node;
