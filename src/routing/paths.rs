//! Simple path enumeration
//!
//! All simple directed paths between a fixed source and target, found by
//! depth-first search with backtracking. The visited set belongs to the
//! current branch only, so paths sharing a prefix are all discovered.
//!
//! Worst case is exponential in the node count; the targeted networks are a
//! few dozen nodes at most.
use super::graph::RoadGraph;
use itertools::Itertools;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashSet;

/// A simple directed path from source to target.
///
/// Stores both the visited nodes and the traversed edges; the edge sequence
/// keeps parallel edges apart (two edges between the same node pair are two
/// different paths).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    /// visited nodes, source first, target last
    pub nodes: Vec<NodeIndex>,
    /// traversed edges, `edges[i]` connects `nodes[i]` to `nodes[i+1]`
    pub edges: Vec<EdgeIndex>,
}

impl Path {
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }
    ///
    /// Render as node labels joined by arrows, e.g. `s -> a -> t`.
    ///
    pub fn show(&self, graph: &RoadGraph) -> String {
        self.nodes.iter().map(|&v| graph[v].as_str()).join(" -> ")
    }
}

///
/// Enumerate all simple paths from `source` to `target`.
///
/// The result order is deterministic for a fixed graph: it follows the
/// petgraph outgoing-edge iteration order at each branch. An empty result
/// means the two nodes are disconnected; that is a valid value, not an error.
///
pub fn enumerate_paths(graph: &RoadGraph, source: NodeIndex, target: NodeIndex) -> Vec<Path> {
    let mut paths = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(source);
    let mut nodes = vec![source];
    let mut edges = Vec::new();
    visit(graph, target, &mut visited, &mut nodes, &mut edges, &mut paths);
    paths
}

fn visit(
    graph: &RoadGraph,
    target: NodeIndex,
    visited: &mut HashSet<NodeIndex>,
    nodes: &mut Vec<NodeIndex>,
    edges: &mut Vec<EdgeIndex>,
    paths: &mut Vec<Path>,
) {
    let head = *nodes.last().unwrap();
    if head == target {
        paths.push(Path {
            nodes: nodes.clone(),
            edges: edges.clone(),
        });
        return;
    }
    for er in graph.edges_directed(head, Direction::Outgoing) {
        let next = er.target();
        if visited.contains(&next) {
            continue;
        }
        visited.insert(next);
        nodes.push(next);
        edges.push(er.id());
        visit(graph, target, visited, nodes, edges, paths);
        edges.pop();
        nodes.pop();
        visited.remove(&next);
    }
}

//
// tests
//
