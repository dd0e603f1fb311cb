//! Congestion-game routing analysis
//!
//! Two allocations of D drivers over the simple paths between a source and a
//! target, on a directed road network with affine edge costs `a*x + b`:
//!
//! * the social optimum ([`social_optimum`]), minimizing the total system
//!   travel cost via a convex quadratic program, and
//! * the Nash/Wardrop equilibrium ([`nash_equilibrium`]), where no single
//!   driver gains by switching paths, via iterated best response.
//!
//! [`analyze`] runs both on a shared path set and reports the price of
//! anarchy.
pub mod flow;
pub mod graph;
pub mod mocks;
pub mod nash;
pub mod paths;
pub mod social;
pub mod utils;

pub use flow::EdgeFlow;
pub use graph::{CostEdge, EdgeCost, RoadGraph};
pub use nash::{nash_equilibrium, nash_equilibrium_with_cap, Assignment, Equilibrium};
pub use paths::{enumerate_paths, Path};
pub use social::{social_optimum, SocialOptimum};

use log::info;
use petgraph::graph::NodeIndex;
use thiserror::Error;

///
/// Failures of graph construction and of the two solvers.
///
/// Every error is terminal for the invocation; the caller formats it.
///
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    /// malformed or inconsistent graph input
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
    /// no path at all between the requested endpoints
    #[error("no route from {origin} to {destination}")]
    Disconnected { origin: String, destination: String },
    /// the constraints admit no allocation of the requested drivers
    #[error("no feasible allocation of {demand} drivers")]
    Infeasible { demand: u32 },
    /// the convex program did not reach a certified optimum
    #[error("social optimum solver failed: {0}")]
    Solver(String),
    /// best response hit its round cap; `last` is the best-effort assignment
    #[error("best response did not converge within {rounds} rounds")]
    NoConvergence { rounds: usize, last: Assignment },
}

///
/// Both solutions for one (graph, source, target, demand) instance.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// the shared path set both solvers ran on
    pub paths: Vec<Path>,
    pub social: SocialOptimum,
    pub equilibrium: Equilibrium,
    /// equilibrium total cost / social-optimum total cost (>= 1);
    /// 1 when both are free (e.g. zero demand)
    pub price_of_anarchy: f64,
}

///
/// Enumerate the paths once and run both solvers on them.
///
/// Fails with `Disconnected` before invoking either solver when no path
/// exists, whatever the demand.
///
pub fn analyze(
    graph: &RoadGraph,
    source: NodeIndex,
    target: NodeIndex,
    demand: u32,
) -> Result<Analysis, RoutingError> {
    let paths = enumerate_paths(graph, source, target);
    if paths.is_empty() {
        return Err(RoutingError::Disconnected {
            origin: graph[source].clone(),
            destination: graph[target].clone(),
        });
    }
    info!(
        "{} simple paths from {} to {}",
        paths.len(),
        graph[source],
        graph[target]
    );

    let social = social_optimum(graph, &paths, demand)?;
    let equilibrium = nash_equilibrium(graph, &paths, demand)?;
    let price_of_anarchy = if social.total_cost > 0.0 {
        equilibrium.total_cost / social.total_cost
    } else {
        1.0
    };
    Ok(Analysis {
        paths,
        social,
        equilibrium,
        price_of_anarchy,
    })
}

//
// tests
//

#[cfg(test)]
mod tests {
    use super::graph::node_by_label;
    use super::mocks::{mock_braess, mock_disconnected, mock_two_parallel_roads};
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn parallel_roads_analysis() {
        let g = mock_two_parallel_roads();
        let s = node_by_label(&g, "0").unwrap();
        let t = node_by_label(&g, "1").unwrap();
        let analysis = analyze(&g, s, t, 4).unwrap();

        assert_abs_diff_eq!(analysis.social.total_cost, 7.0, epsilon = 1e-9);
        assert_abs_diff_eq!(analysis.equilibrium.total_cost, 8.0);
        assert_abs_diff_eq!(analysis.price_of_anarchy, 8.0 / 7.0, epsilon = 1e-9);
    }

    #[test]
    fn price_of_anarchy_is_at_least_one() {
        let g = mock_braess();
        let s = node_by_label(&g, "s").unwrap();
        let t = node_by_label(&g, "t").unwrap();
        for d in [1u32, 2, 4, 6, 9] {
            let analysis = analyze(&g, s, t, d).unwrap();
            assert!(analysis.price_of_anarchy >= 1.0 - 1e-9);
            assert_eq!(analysis.social.counts.iter().sum::<u32>(), d);
            assert_eq!(analysis.equilibrium.counts.iter().sum::<u32>(), d);
        }
    }

    #[test]
    fn disconnected_pair_errors_before_solving() {
        let g = mock_disconnected();
        let s = node_by_label(&g, "s").unwrap();
        let t = node_by_label(&g, "t").unwrap();
        for d in [0u32, 5] {
            let res = analyze(&g, s, t, d);
            assert_eq!(
                res,
                Err(RoutingError::Disconnected {
                    origin: "s".to_string(),
                    destination: "t".to_string(),
                })
            );
            // the variant formats as a plain message, not as an error chain
            assert_eq!(res.unwrap_err().to_string(), "no route from s to t");
        }
    }

    #[test]
    fn zero_demand_analysis_is_free() {
        let g = mock_two_parallel_roads();
        let s = node_by_label(&g, "0").unwrap();
        let t = node_by_label(&g, "1").unwrap();
        let analysis = analyze(&g, s, t, 0).unwrap();
        assert_abs_diff_eq!(analysis.social.total_cost, 0.0);
        assert_abs_diff_eq!(analysis.equilibrium.total_cost, 0.0);
        assert_abs_diff_eq!(analysis.price_of_anarchy, 1.0);
    }
}
