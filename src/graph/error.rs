//! Errors raised by [`Dag`](super::Dag) mutations.

use std::fmt;

use thiserror::Error;

use super::node::Node;

/// Structural errors for graph insertion and lookup.
///
/// None of these are recoverable by the graph itself; the graph state is
/// always left exactly as it was before the failing call.
#[derive(Debug, Error)]
pub enum GraphError<N: Node> {
    /// A node with the same identifier is already present. The rejected node
    /// is handed back.
    #[error("node `{}` is already in the graph: it can't be inserted twice", .0.id())]
    DuplicateInsertion(N),

    /// An operation referenced an identifier that was never inserted.
    #[error("node `{0}` does not exist in the graph")]
    NodeNotExists(N::Id),

    /// The edge would have closed a cycle; it was not kept.
    #[error("graph contains a cycle: `{0}`")]
    CyclicInsertion(Cycle<N::Id>),
}

/// Result type alias for graph operations.
pub type GraphResult<T, N> = Result<T, GraphError<N>>;

/// A cycle discovered while inserting an edge.
///
/// The path starts at the source of the rejected edge, follows the rejected
/// edge, and walks existing edges back to the source, so the first and last
/// entries are always the same identifier: `a -> b -> c -> a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle<I> {
    path: Vec<I>,
}

impl<I> Cycle<I> {
    pub(crate) fn new(path: Vec<I>) -> Self {
        Self { path }
    }

    /// The identifiers along the cycle, first and last equal.
    pub fn path(&self) -> &[I] {
        &self.path
    }

    /// Number of identifiers in the path (a self-loop has two).
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Returns true if the path is empty (never produced by the graph).
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Consumes the cycle, returning its path.
    pub fn into_path(self) -> Vec<I> {
        self.path
    }
}

impl<I: fmt::Display> fmt::Display for Cycle<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(" --> ")?;
            }
            write!(f, "{}", id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_display() {
        let cycle = Cycle::new(vec!["a", "b", "c", "a"]);
        assert_eq!(cycle.to_string(), "a --> b --> c --> a");
        assert_eq!(cycle.len(), 4);
    }

    #[test]
    fn test_error_messages() {
        let dup: GraphError<String> = GraphError::DuplicateInsertion("reset".to_string());
        assert_eq!(
            dup.to_string(),
            "node `reset` is already in the graph: it can't be inserted twice"
        );

        let missing: GraphError<u32> = GraphError::NodeNotExists(3);
        assert_eq!(missing.to_string(), "node `3` does not exist in the graph");

        let cyclic: GraphError<u32> = GraphError::CyclicInsertion(Cycle::new(vec![1, 2, 1]));
        assert_eq!(cyclic.to_string(), "graph contains a cycle: `1 --> 2 --> 1`");
    }
}
