//! Structural snapshots of a computation graph.
//!
//! The node model itself is a web of reference-counted handles. A snapshot
//! flattens it into a [`petgraph::Graph`] with exactly one vertex per distinct
//! node, which makes the whole toolbox of graph algorithms available for
//! inspection, e.g. [`petgraph::algo::toposort`].
//!
//! Edges point from parent to child and are added in construction order, one
//! per child slot. A task that uses the same child twice has two parallel
//! edges to it.

use std::collections::HashMap;

use petgraph::Graph;
use petgraph::graph::NodeIndex;

use crate::engine::{Node, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Variable,
    Task,
}

/// The data stored for every vertex of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLabel {
    pub name: String,
    pub kind: NodeKind,
}

/// Builds the snapshot of every node reachable from `root`. The root is
/// always the vertex with index `0`.
pub fn snapshot<N: Node + ?Sized>(root: &N) -> Graph<NodeLabel, ()> {
    let root = root.to_step();

    let mut graph = Graph::new();
    let mut seen = HashMap::new();
    let mut pending = vec![(add_vertex(&mut graph, &root), &root)];
    seen.insert(root.addr(), pending[0].0);

    while let Some((index, step)) = pending.pop() {
        for child in step.children() {
            let child_index = match seen.get(&child.addr()) {
                Some(&child_index) => child_index,
                None => {
                    let child_index = add_vertex(&mut graph, child);
                    seen.insert(child.addr(), child_index);
                    pending.push((child_index, child));
                    child_index
                }
            };
            graph.add_edge(index, child_index, ());
        }
    }

    graph
}

fn add_vertex<T>(graph: &mut Graph<NodeLabel, ()>, step: &Step<T>) -> NodeIndex {
    let kind = match step {
        Step::Variable(_) => NodeKind::Variable,
        Step::Task(_) => NodeKind::Task,
    };

    graph.add_node(NodeLabel {
        name: step.get_name(),
        kind,
    })
}
