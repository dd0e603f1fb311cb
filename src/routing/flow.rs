//! Edge flow definitions
//! - EdgeFlow: mapping of a driver count f(e) to each edge e
//!
//! Edge flows are always derived from a per-path allocation (or a per-driver
//! assignment); they are never an independent source of truth.
use super::graph::{EdgeCost, RoadGraph};
use super::paths::Path;
use petgraph::graph::EdgeIndex;
use std::collections::HashMap;

/// EdgeFlow f is a mapping of a driver count u32 f(e) to each edge e
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct EdgeFlow(HashMap<EdgeIndex, u32>);

impl EdgeFlow {
    pub fn zero(graph: &RoadGraph) -> EdgeFlow {
        let mut hm = HashMap::new();
        for e in graph.edge_indices() {
            hm.insert(e, 0);
        }
        EdgeFlow(hm)
    }
    ///
    /// Derive edge flows from per-path driver counts.
    /// `counts[i]` drivers travel along `paths[i]`.
    ///
    pub fn from_path_counts(graph: &RoadGraph, paths: &[Path], counts: &[u32]) -> EdgeFlow {
        assert_eq!(paths.len(), counts.len());
        let mut flow = EdgeFlow::zero(graph);
        for (path, &count) in paths.iter().zip(counts.iter()) {
            for &e in path.edges.iter() {
                flow.add(e, count);
            }
        }
        flow
    }
    ///
    /// Derive edge flows from a driver assignment.
    /// `assignment[d]` is the index (into `paths`) of the path driver d uses.
    ///
    pub fn from_assignment(graph: &RoadGraph, paths: &[Path], assignment: &[usize]) -> EdgeFlow {
        let mut flow = EdgeFlow::zero(graph);
        for &p in assignment.iter() {
            for &e in paths[p].edges.iter() {
                flow.add(e, 1);
            }
        }
        flow
    }
    pub fn get(&self, e: EdgeIndex) -> u32 {
        self.0.get(&e).copied().unwrap_or(0)
    }
    pub fn add(&mut self, e: EdgeIndex, v: u32) {
        *self.0.entry(e).or_insert(0) += v;
    }
    pub fn sub(&mut self, e: EdgeIndex, v: u32) {
        let f = self.0.entry(e).or_insert(0);
        assert!(*f >= v, "edge flow went negative");
        *f -= v;
    }
    ///
    /// Cost a driver experiences on `path` under the current flows,
    /// with the flows taken as-is (the driver is assumed already counted).
    ///
    pub fn path_cost(&self, graph: &RoadGraph, path: &Path) -> f64 {
        path.edges
            .iter()
            .map(|&e| graph[e].cost(self.get(e)))
            .sum()
    }
    ///
    /// Total system cost Σ_e f(e) * cost_e(f(e)).
    ///
    pub fn total_cost(&self, graph: &RoadGraph) -> f64 {
        graph
            .edge_indices()
            .map(|e| {
                let f = self.get(e);
                f as f64 * graph[e].cost(f)
            })
            .sum()
    }
}

///
/// Check that per-path counts and an edge flow describe the same state,
/// i.e. the edge flow was derived from exactly these counts.
///
pub fn is_consistent(graph: &RoadGraph, paths: &[Path], counts: &[u32], flow: &EdgeFlow) -> bool {
    EdgeFlow::from_path_counts(graph, paths, counts) == *flow
}

//
// tests
//

#[cfg(test)]
mod tests {
    use super::super::graph::node_by_label;
    use super::super::mocks::{mock_braess, mock_two_parallel_roads};
    use super::super::paths::enumerate_paths;
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn edge_flow_from_counts_sums_shared_edges() {
        let g = mock_braess();
        let s = node_by_label(&g, "s").unwrap();
        let t = node_by_label(&g, "t").unwrap();
        let paths = enumerate_paths(&g, s, t);
        assert_eq!(paths.len(), 3);

        let counts = vec![1, 2, 3];
        let flow = EdgeFlow::from_path_counts(&g, &paths, &counts);
        // every edge flow is the sum of the counts of the paths using it
        for e in g.edge_indices() {
            let expected: u32 = paths
                .iter()
                .zip(counts.iter())
                .filter(|(p, _)| p.edges.contains(&e))
                .map(|(_, &c)| c)
                .sum();
            assert_eq!(flow.get(e), expected);
        }
        assert!(is_consistent(&g, &paths, &counts, &flow));
        assert!(!is_consistent(&g, &paths, &[3, 2, 1], &flow));
    }

    #[test]
    fn assignment_and_counts_derive_the_same_flow() {
        let g = mock_two_parallel_roads();
        let s = node_by_label(&g, "0").unwrap();
        let t = node_by_label(&g, "1").unwrap();
        let paths = enumerate_paths(&g, s, t);

        let by_counts = EdgeFlow::from_path_counts(&g, &paths, &[2, 2]);
        let by_assignment = EdgeFlow::from_assignment(&g, &paths, &[0, 1, 0, 1]);
        assert_eq!(by_counts, by_assignment);
    }

    #[test]
    fn costs_on_the_parallel_roads() {
        // road A: 1x+0, road B: 0x+2
        let g = mock_two_parallel_roads();
        let s = node_by_label(&g, "0").unwrap();
        let t = node_by_label(&g, "1").unwrap();
        let paths = enumerate_paths(&g, s, t);
        let a = paths.iter().position(|p| g[p.edges[0]].a == 1.0).unwrap();
        let b = 1 - a;

        let mut counts = vec![0, 0];
        counts[a] = 2;
        counts[b] = 2;
        let flow = EdgeFlow::from_path_counts(&g, &paths, &counts);
        assert_abs_diff_eq!(flow.path_cost(&g, &paths[a]), 2.0);
        assert_abs_diff_eq!(flow.path_cost(&g, &paths[b]), 2.0);
        // total = 2*2 + 2*2
        assert_abs_diff_eq!(flow.total_cost(&g), 8.0);
    }

    #[test]
    fn zero_flow_costs_nothing() {
        let g = mock_two_parallel_roads();
        let flow = EdgeFlow::zero(&g);
        assert_abs_diff_eq!(flow.total_cost(&g), 0.0);
    }
}
