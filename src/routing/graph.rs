//! Road network definitions
//! - CostEdge: directed edge with affine congestion cost
//! - RoadGraph: DiGraph whose nodes carry labels and whose edges are CostEdge
use super::RoutingError;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// Edge attributes used in RoadGraph
///
/// The travel cost of the edge is an affine function of the number of
/// drivers `x` currently on it:
///
/// ```text
/// cost(x) = a * x + b
/// ```
///
/// `a` is the congestion slope and `b` the free-flow cost. Both are fixed
/// after the graph is built.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CostEdge {
    /// congestion slope a(e)
    pub a: f64,
    /// free-flow cost b(e)
    pub b: f64,
}

impl CostEdge {
    pub fn new(a: f64, b: f64) -> CostEdge {
        CostEdge { a, b }
    }
}

impl std::fmt::Display for CostEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x+{}", self.a, self.b)
    }
}

///
/// cost trait
///
/// travel cost of an edge as a function of the current flow on it
///
pub trait EdgeCost {
    fn cost(&self, flow: u32) -> f64;
}

impl EdgeCost for CostEdge {
    fn cost(&self, flow: u32) -> f64 {
        self.a * flow as f64 + self.b
    }
}

/// RoadGraph definition
///
/// Node weights are the labels from the input file. Parallel edges between
/// the same ordered pair are allowed; they stay distinct by EdgeIndex.
pub type RoadGraph = DiGraph<String, CostEdge>;

///
/// Build a RoadGraph from node labels and labeled edges.
///
/// Fails with `RoutingError::InvalidGraph` if an edge references a label
/// that is not in the node list.
///
pub fn from_parts<S: AsRef<str>>(
    labels: &[S],
    edges: &[(S, S, CostEdge)],
) -> Result<RoadGraph, RoutingError> {
    let mut graph = RoadGraph::new();
    for label in labels {
        graph.add_node(label.as_ref().to_string());
    }
    for (u, v, w) in edges {
        let ui = node_by_label(&graph, u.as_ref())
            .ok_or_else(|| RoutingError::InvalidGraph(format!("unknown node {}", u.as_ref())))?;
        let vi = node_by_label(&graph, v.as_ref())
            .ok_or_else(|| RoutingError::InvalidGraph(format!("unknown node {}", v.as_ref())))?;
        graph.add_edge(ui, vi, *w);
    }
    Ok(graph)
}

///
/// Find the node whose label is `label`.
///
pub fn node_by_label(graph: &RoadGraph, label: &str) -> Option<NodeIndex> {
    graph.node_indices().find(|&v| graph[v] == label)
}

///
/// Edges leaving `node`, in petgraph iteration order.
///
pub fn outgoing(graph: &RoadGraph, node: NodeIndex) -> Vec<EdgeIndex> {
    graph
        .edges_directed(node, Direction::Outgoing)
        .map(|er| er.id())
        .collect()
}

//
// tests
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_edge_is_affine() {
        let e = CostEdge::new(2.0, 1.0);
        assert_eq!(e.cost(0), 1.0);
        assert_eq!(e.cost(3), 7.0);
        assert_eq!(format!("{}", e), "2x+1");
    }

    #[test]
    fn from_parts_builds_and_indexes() {
        let g = from_parts(
            &["s", "a", "t"],
            &[
                ("s", "a", CostEdge::new(1.0, 0.0)),
                ("a", "t", CostEdge::new(0.0, 2.0)),
                ("s", "t", CostEdge::new(0.5, 1.0)),
            ],
        )
        .unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);

        let s = node_by_label(&g, "s").unwrap();
        assert_eq!(outgoing(&g, s).len(), 2);
        assert!(node_by_label(&g, "x").is_none());
    }

    #[test]
    fn from_parts_rejects_unknown_endpoint() {
        let res = from_parts(&["s", "t"], &[("s", "q", CostEdge::new(1.0, 0.0))]);
        assert!(matches!(res, Err(RoutingError::InvalidGraph(_))));
    }

    #[test]
    fn parallel_edges_stay_distinct() {
        let g = from_parts(
            &["0", "1"],
            &[
                ("0", "1", CostEdge::new(1.0, 0.0)),
                ("0", "1", CostEdge::new(0.0, 2.0)),
            ],
        )
        .unwrap();
        assert_eq!(g.edge_count(), 2);
        let s = node_by_label(&g, "0").unwrap();
        assert_eq!(outgoing(&g, s).len(), 2);
    }
}
