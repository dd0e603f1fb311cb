use super::graph::{CostEdge, RoadGraph};

/// mock road network generation functions
///
/// Two parallel roads between "0" and "1":
/// road A with cost 1x+0, road B with cost 0x+2.
/// With 4 drivers the equilibrium is 2/2 (everyone pays 2) and the social
/// optimum is 1 on A, 3 on B (total cost 7).
pub fn mock_two_parallel_roads() -> RoadGraph {
    let mut graph = RoadGraph::new();
    let s = graph.add_node("0".to_string());
    let t = graph.add_node("1".to_string());
    graph.add_edge(s, t, CostEdge::new(1.0, 0.0));
    graph.add_edge(s, t, CostEdge::new(0.0, 2.0));
    graph
}

/// Diamond with two symmetric routes s->a->t and s->b->t,
/// each of total cost x+1.
pub fn mock_diamond() -> RoadGraph {
    let mut graph = RoadGraph::new();
    let s = graph.add_node("s".to_string());
    let a = graph.add_node("a".to_string());
    let b = graph.add_node("b".to_string());
    let t = graph.add_node("t".to_string());
    graph.add_edge(s, a, CostEdge::new(1.0, 0.0));
    graph.add_edge(a, t, CostEdge::new(0.0, 1.0));
    graph.add_edge(s, b, CostEdge::new(0.0, 1.0));
    graph.add_edge(b, t, CostEdge::new(1.0, 0.0));
    graph
}

/// Braess-style diamond with a shortcut a->b.
/// Routes: s->a->t (x+10), s->b->t (10+x), s->a->b->t (x+1+x).
pub fn mock_braess() -> RoadGraph {
    let mut graph = RoadGraph::new();
    let s = graph.add_node("s".to_string());
    let a = graph.add_node("a".to_string());
    let b = graph.add_node("b".to_string());
    let t = graph.add_node("t".to_string());
    graph.add_edge(s, a, CostEdge::new(1.0, 0.0));
    graph.add_edge(a, t, CostEdge::new(0.0, 10.0));
    graph.add_edge(s, b, CostEdge::new(0.0, 10.0));
    graph.add_edge(b, t, CostEdge::new(1.0, 0.0));
    graph.add_edge(a, b, CostEdge::new(0.0, 1.0));
    graph
}

/// "s" and "t" with no route between them ("s" only reaches "x").
pub fn mock_disconnected() -> RoadGraph {
    let mut graph = RoadGraph::new();
    let s = graph.add_node("s".to_string());
    let _t = graph.add_node("t".to_string());
    let x = graph.add_node("x".to_string());
    graph.add_edge(s, x, CostEdge::new(1.0, 1.0));
    graph
}
