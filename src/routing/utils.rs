//!
//! Graphviz dot rendering of road networks
//!
use super::flow::EdgeFlow;
use super::graph::RoadGraph;
use petgraph::dot::Dot;
use petgraph::visit::EdgeRef;

///
/// Dot rendering with per-edge cost functions as labels.
///
pub fn draw(graph: &RoadGraph) -> String {
    format!("{}", Dot::new(graph))
}

///
/// Dot rendering labeling each edge with its cost function, driver count and
/// realized cost under `flow`.
///
pub fn draw_with_flow(graph: &RoadGraph, flow: &EdgeFlow) -> String {
    let mut out = String::from("digraph {\n");
    for v in graph.node_indices() {
        out += &format!("    {} [ label = \"{}\" ]\n", v.index(), graph[v]);
    }
    for er in graph.edge_references() {
        let e = er.id();
        let f = flow.get(e);
        out += &format!(
            "    {} -> {} [ label = \"{} | x={} cost={}\" ]\n",
            er.source().index(),
            er.target().index(),
            graph[e],
            f,
            graph[e].a * f as f64 + graph[e].b,
        );
    }
    out += "}\n";
    out
}

#[cfg(test)]
mod tests {
    use super::super::mocks::mock_two_parallel_roads;
    use super::super::paths::enumerate_paths;
    use super::*;

    #[test]
    fn draw_with_flow_labels_driver_counts() {
        let g = mock_two_parallel_roads();
        let s = g.node_indices().next().unwrap();
        let t = g.node_indices().nth(1).unwrap();
        let paths = enumerate_paths(&g, s, t);
        let flow = EdgeFlow::from_path_counts(&g, &paths, &[1, 3]);

        let dot = draw_with_flow(&g, &flow);
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("x=1") && dot.contains("x=3"));
    }

    #[test]
    fn draw_contains_cost_labels() {
        let g = mock_two_parallel_roads();
        let dot = draw(&g);
        assert!(dot.contains("1x+0"));
        assert!(dot.contains("0x+2"));
    }
}
