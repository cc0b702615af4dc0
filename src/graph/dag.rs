//! Directed acyclic graph with incremental cycle rejection.
//!
//! Nodes are keyed by the identifier their [`Node`] impl produces. Edges point
//! from the dependent node to its dependency. Every edge insertion is checked
//! on the spot, so the graph never holds a cycle and can always be sorted.

use std::borrow::Borrow;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::hash::Hash;
use std::iter::FusedIterator;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use tracing::debug;

use super::error::{Cycle, GraphError, GraphResult};
use super::node::Node;

/// A directed acyclic graph of [`Node`]s.
///
/// The graph uses petgraph's `DiGraph` internally, with a side table mapping
/// identifiers to node indices for O(1) lookup. An edge `a -> b` means "`a`
/// depends on `b`".
///
/// # Example
///
/// ```rust
/// use assetdeps::graph::{Dag, GraphError};
///
/// let mut graph: Dag<String> = Dag::new();
/// graph.add_node("layout".to_string()).unwrap();
/// graph.add_node("reset".to_string()).unwrap();
/// graph.add_edge("layout", "reset").unwrap();
///
/// // Closing the loop is refused and leaves the graph untouched.
/// let err = graph.add_edge("reset", "layout").unwrap_err();
/// assert!(matches!(err, GraphError::CyclicInsertion(_)));
/// assert_eq!(graph.edge_count(), 1);
///
/// let order: Vec<&String> = graph.topological_sort().collect();
/// assert_eq!(order, ["reset", "layout"]);
/// ```
#[derive(Debug, Clone)]
pub struct Dag<N: Node> {
    /// The underlying directed graph
    graph: DiGraph<N, ()>,
    /// Maps identifiers to their node indices
    node_indices: HashMap<N::Id, NodeIndex>,
}

impl<N: Node> Default for Dag<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Node> Dag<N> {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
        }
    }

    /// Creates a new graph with pre-allocated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Inserts a node keyed by its identifier.
    ///
    /// The node starts with no outgoing edges. Returns a reference to the
    /// stored node.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateInsertion`] if the identifier is already
    /// present. The rejected node is returned inside the error and the graph
    /// is unchanged.
    pub fn add_node(&mut self, node: N) -> GraphResult<&N, N> {
        debug!(id = %node.id(), "adding node");
        if self.node_indices.contains_key(node.id()) {
            return Err(GraphError::DuplicateInsertion(node));
        }

        let id = node.id().clone();
        let idx = self.graph.add_node(node);
        self.node_indices.insert(id, idx);
        Ok(&self.graph[idx])
    }

    /// Inserts every node in order, stopping at the first failure.
    pub fn add_nodes<I>(&mut self, nodes: I) -> GraphResult<(), N>
    where
        I: IntoIterator<Item = N>,
    {
        for node in nodes {
            self.add_node(node)?;
        }
        Ok(())
    }

    /// Checks if a node exists in the graph.
    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        N::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.node_indices.contains_key(id)
    }

    /// Gets a reference to a node by identifier.
    pub fn get<Q>(&self, id: &Q) -> Option<&N>
    where
        N::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    /// Iterates over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.graph.node_weights()
    }

    /// Returns the identifiers `id` has outgoing edges to.
    ///
    /// The order of the yielded identifiers carries no meaning.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeNotExists`] if `id` was never inserted.
    pub fn neighbors<Q>(&self, id: &Q) -> GraphResult<impl Iterator<Item = &N::Id> + '_, N>
    where
        N::Id: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = N::Id> + ?Sized,
    {
        let idx = self
            .index_of(id)
            .ok_or_else(|| GraphError::NodeNotExists(id.to_owned()))?;

        Ok(self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(move |n| self.graph[n].id()))
    }

    /// Inserts the edge `from -> to` ("`from` depends on `to`").
    ///
    /// Inserting an edge that already exists is a no-op.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NodeNotExists`] if either endpoint is missing. `to` is
    ///   checked first, so it is the one reported when both are missing.
    /// - [`GraphError::CyclicInsertion`] if `to` already reaches `from`. The
    ///   edge is removed again before returning, so the graph stays acyclic.
    pub fn add_edge<Q>(&mut self, from: &Q, to: &Q) -> GraphResult<(), N>
    where
        N::Id: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = N::Id> + ?Sized,
    {
        let to_idx = self
            .index_of(to)
            .ok_or_else(|| GraphError::NodeNotExists(to.to_owned()))?;
        let from_idx = self
            .index_of(from)
            .ok_or_else(|| GraphError::NodeNotExists(from.to_owned()))?;

        debug!(
            from = %self.graph[from_idx].id(),
            to = %self.graph[to_idx].id(),
            "adding edge"
        );

        if self.graph.contains_edge(from_idx, to_idx) {
            return Ok(());
        }

        let edge = self.graph.add_edge(from_idx, to_idx, ());
        if let Some(path) = self.find_path(to_idx, from_idx) {
            self.graph.remove_edge(edge);

            let mut cycle = Vec::with_capacity(path.len() + 1);
            cycle.push(self.graph[from_idx].id().clone());
            cycle.extend(path.into_iter().map(|idx| self.graph[idx].id().clone()));
            return Err(GraphError::CyclicInsertion(Cycle::new(cycle)));
        }

        Ok(())
    }

    /// Inserts one edge from `from` to each target, in order.
    ///
    /// Stops at the first failing edge and returns its error. Edges inserted
    /// before the failure are kept.
    pub fn add_edges_from_node<'q, Q, I>(&mut self, from: &Q, to: I) -> GraphResult<(), N>
    where
        N::Id: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = N::Id> + ?Sized + 'q,
        I: IntoIterator<Item = &'q Q>,
    {
        for target in to {
            self.add_edge(from, target)?;
        }
        Ok(())
    }

    /// Returns every identifier with dependencies before their dependents.
    ///
    /// For each edge `a -> b`, `b` is yielded before `a`. When several nodes
    /// are ready at once, the one inserted first is yielded first, so the
    /// order is fully determined by insertion order.
    pub fn topological_sort(&self) -> TopologicalSort<'_, N> {
        TopologicalSort::new(&self.graph)
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    fn index_of<Q>(&self, id: &Q) -> Option<NodeIndex>
    where
        N::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.node_indices.get(id).copied()
    }

    /// Depth-first search for a path `start -> ... -> target`.
    ///
    /// Each node is pushed at most once, so the stack never outgrows the node
    /// count and shared descendants are explored a single time.
    fn find_path(&self, start: NodeIndex, target: NodeIndex) -> Option<Vec<NodeIndex>> {
        let mut stack = Vec::with_capacity(self.graph.node_count());
        let mut visited = HashSet::with_capacity(self.graph.node_count());
        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();

        stack.push(start);
        visited.insert(start);

        while let Some(current) = stack.pop() {
            if current == target {
                let mut path = vec![current];
                let mut cursor = current;
                while let Some(&prev) = parent.get(&cursor) {
                    path.push(prev);
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }

            for next in self.graph.neighbors_directed(current, Direction::Outgoing) {
                if visited.insert(next) {
                    parent.insert(next, current);
                    stack.push(next);
                }
            }
        }

        None
    }
}

/// Iterator returned by [`Dag::topological_sort`].
///
/// Kahn's algorithm run over reversed edges: a node becomes ready once all of
/// its dependencies have been yielded.
#[derive(Debug)]
pub struct TopologicalSort<'g, N: Node> {
    graph: &'g DiGraph<N, ()>,
    /// Dependencies not yet yielded, per node index
    pending: Vec<usize>,
    ready: BinaryHeap<Reverse<NodeIndex>>,
    remaining: usize,
}

impl<'g, N: Node> TopologicalSort<'g, N> {
    fn new(graph: &'g DiGraph<N, ()>) -> Self {
        let mut pending = Vec::with_capacity(graph.node_count());
        let mut ready = BinaryHeap::new();

        for idx in graph.node_indices() {
            let deps = graph.neighbors_directed(idx, Direction::Outgoing).count();
            if deps == 0 {
                ready.push(Reverse(idx));
            }
            pending.push(deps);
        }

        Self {
            graph,
            pending,
            ready,
            remaining: graph.node_count(),
        }
    }
}

impl<'g, N: Node> Iterator for TopologicalSort<'g, N> {
    type Item = &'g N::Id;

    fn next(&mut self) -> Option<Self::Item> {
        let Reverse(idx) = self.ready.pop()?;

        for dependent in self.graph.neighbors_directed(idx, Direction::Incoming) {
            let deps = &mut self.pending[dependent.index()];
            *deps -= 1;
            if *deps == 0 {
                self.ready.push(Reverse(dependent));
            }
        }

        self.remaining -= 1;
        Some(self.graph[idx].id())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<N: Node> ExactSizeIterator for TopologicalSort<'_, N> {}

impl<N: Node> FusedIterator for TopologicalSort<'_, N> {}
