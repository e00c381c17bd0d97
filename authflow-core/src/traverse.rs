// Reachability from the root over the undirected view of the edge list

use crate::model::{Edge, Node, NodeKind};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;
use std::collections::HashMap;
use tracing::debug;

/// The nodes reachable from the root, in breadth-first visit order.
pub struct Reachable<'a> {
    visited: Vec<&'a Node>,
}

impl<'a> Reachable<'a> {
    /// Walks every edge in both directions starting at the first
    /// `authStarter` node. Edges naming missing nodes are skipped.
    pub fn from_root(nodes: &'a [Node], edges: &[Edge]) -> Self {
        let Some(root_position) = nodes.iter().position(|n| n.kind == NodeKind::AuthStarter)
        else {
            debug!("No authStarter node, nothing is reachable");
            return Self {
                visited: Vec::new(),
            };
        };
        let root = &nodes[root_position];

        let mut graph: UnGraph<usize, ()> = UnGraph::new_undirected();
        let mut index_of: HashMap<&str, NodeIndex> = HashMap::new();
        let root_index = graph.add_node(root_position);
        index_of.insert(root.id.as_str(), root_index);
        for (position, node) in nodes.iter().enumerate() {
            // Duplicate ids collapse onto the root, else the first occurrence
            index_of
                .entry(node.id.as_str())
                .or_insert_with(|| graph.add_node(position));
        }

        for edge in edges {
            match (
                index_of.get(edge.source.as_str()),
                index_of.get(edge.target.as_str()),
            ) {
                (Some(&a), Some(&b)) => {
                    graph.add_edge(a, b, ());
                }
                _ => debug!("Skipping dangling edge {}", edge.id),
            }
        }

        let mut visited = Vec::new();
        let mut bfs = Bfs::new(&graph, root_index);
        while let Some(index) = bfs.next(&graph) {
            visited.push(&nodes[graph[index]]);
        }

        debug!(
            "Reached {} of {} nodes from {}",
            visited.len(),
            nodes.len(),
            root.id
        );
        Self { visited }
    }

    pub fn nodes(&self) -> &[&'a Node] {
        &self.visited
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.visited.iter().any(|n| n.id == id)
    }

    /// First visited node of a kind. Each configuration concern is read
    /// from at most one node, and this is the one.
    pub fn first(&self, kind: &NodeKind) -> Option<&'a Node> {
        self.visited.iter().copied().find(|n| &n.kind == kind)
    }

    pub fn first_where(&self, predicate: impl Fn(&NodeKind) -> bool) -> Option<&'a Node> {
        self.visited.iter().copied().find(|n| predicate(&n.kind))
    }

    pub fn all_where(&self, predicate: impl Fn(&NodeKind) -> bool) -> Vec<&'a Node> {
        self.visited
            .iter()
            .copied()
            .filter(|n| predicate(&n.kind))
            .collect()
    }
}
