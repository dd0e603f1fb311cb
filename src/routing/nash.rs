//! Nash equilibrium solver
//!
//! Approximates the discrete Wardrop equilibrium by iterated best response:
//! each pass lets every driver in turn switch to the path that would be
//! strictly cheapest for them given everyone else's current choice. A pass
//! with no switch is a fixed point: no driver can improve unilaterally.
//!
//! With affine non-decreasing edge costs this is a congestion game, so best
//! response terminates; a round cap still guards against cycling and reports
//! the last assignment on exhaustion.
use super::flow::EdgeFlow;
use super::graph::{EdgeCost, RoadGraph};
use super::paths::Path;
use super::RoutingError;
use log::debug;

/// full best-response passes allowed before giving up
fn max_rounds(demand: u32) -> usize {
    100 + 10 * demand as usize
}

///
/// Which path each driver uses: entry d is the index (into the enumerated
/// path set) of driver d's path.
///
/// Drivers are interchangeable for flow purposes; the per-driver indices are
/// kept so realized costs can be reported per driver.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment(pub Vec<usize>);

impl Assignment {
    ///
    /// Deterministic starting point: driver d takes path d mod P.
    ///
    pub fn round_robin(n_drivers: u32, n_paths: usize) -> Assignment {
        Assignment((0..n_drivers as usize).map(|d| d % n_paths).collect())
    }
    pub fn n_drivers(&self) -> usize {
        self.0.len()
    }
    /// driver counts per path
    pub fn counts(&self, n_paths: usize) -> Vec<u32> {
        let mut counts = vec![0; n_paths];
        for &p in self.0.iter() {
            counts[p] += 1;
        }
        counts
    }
}

///
/// Equilibrium result: no driver can lower their realized cost by
/// unilaterally switching to another enumerated path.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Equilibrium {
    /// per-driver path choice at the fixed point
    pub assignment: Assignment,
    /// driver counts per path
    pub counts: Vec<u32>,
    /// realized travel cost of each driver at the final flows
    pub driver_costs: Vec<f64>,
    /// total system cost
    pub total_cost: f64,
    /// full passes run, including the final all-quiet pass
    pub rounds: usize,
}

///
/// One full best-response pass over all drivers.
///
/// Pure in its inputs: returns the updated assignment and whether any driver
/// switched. For each driver, every candidate path is priced at the flow
/// state with the driver's own contribution moved there; the driver keeps
/// their current path on ties.
///
pub fn best_response_step(
    graph: &RoadGraph,
    paths: &[Path],
    assignment: &Assignment,
) -> (Assignment, bool) {
    let mut next = assignment.clone();
    let mut flow = EdgeFlow::from_assignment(graph, paths, &next.0);
    let mut changed = false;

    for d in 0..next.0.len() {
        let current = next.0[d];
        // price candidates without this driver's own contribution
        for &e in paths[current].edges.iter() {
            flow.sub(e, 1);
        }
        let mut best = current;
        let mut best_cost = cost_if_joining(graph, &flow, &paths[current]);
        for (p, path) in paths.iter().enumerate() {
            if p == current {
                continue;
            }
            let cost = cost_if_joining(graph, &flow, path);
            // strictly cheaper only: ties keep the current path
            if cost < best_cost {
                best = p;
                best_cost = cost;
            }
        }
        if best != current {
            next.0[d] = best;
            changed = true;
        }
        for &e in paths[next.0[d]].edges.iter() {
            flow.add(e, 1);
        }
    }
    (next, changed)
}

///
/// Cost a driver would experience on `path` if they joined it, given the
/// flows of everyone else.
///
fn cost_if_joining(graph: &RoadGraph, others: &EdgeFlow, path: &Path) -> f64 {
    path.edges
        .iter()
        .map(|&e| graph[e].cost(others.get(e) + 1))
        .sum()
}

///
/// Run best response from the round-robin start until a fixed point, with
/// the default round cap.
///
/// Fails with `Infeasible` when there is no path to route a positive demand
/// over, and with `NoConvergence` (carrying the last assignment) when the
/// round cap is exhausted.
///
pub fn nash_equilibrium(
    graph: &RoadGraph,
    paths: &[Path],
    demand: u32,
) -> Result<Equilibrium, RoutingError> {
    nash_equilibrium_with_cap(graph, paths, demand, max_rounds(demand))
}

///
/// As [`nash_equilibrium`], but with an explicit cap on the number of full
/// best-response passes.
///
pub fn nash_equilibrium_with_cap(
    graph: &RoadGraph,
    paths: &[Path],
    demand: u32,
    cap: usize,
) -> Result<Equilibrium, RoutingError> {
    if paths.is_empty() {
        if demand > 0 {
            return Err(RoutingError::Infeasible { demand });
        }
        return Ok(Equilibrium {
            assignment: Assignment(Vec::new()),
            counts: Vec::new(),
            driver_costs: Vec::new(),
            total_cost: 0.0,
            rounds: 0,
        });
    }

    let mut assignment = Assignment::round_robin(demand, paths.len());
    for round in 1..=cap {
        let (next, changed) = best_response_step(graph, paths, &assignment);
        assignment = next;
        if !changed {
            debug!("best response converged after {} rounds", round);
            return Ok(equilibrium_at(graph, paths, assignment, round));
        }
    }
    Err(RoutingError::NoConvergence {
        rounds: cap,
        last: assignment,
    })
}

fn equilibrium_at(
    graph: &RoadGraph,
    paths: &[Path],
    assignment: Assignment,
    rounds: usize,
) -> Equilibrium {
    let flow = EdgeFlow::from_assignment(graph, paths, &assignment.0);
    let driver_costs = assignment
        .0
        .iter()
        .map(|&p| flow.path_cost(graph, &paths[p]))
        .collect();
    let counts = assignment.counts(paths.len());
    let total_cost = flow.total_cost(graph);
    Equilibrium {
        assignment,
        counts,
        driver_costs,
        total_cost,
        rounds,
    }
}

//
// tests
//

#[cfg(test)]
mod tests {
    use super::super::graph::node_by_label;
    use super::super::mocks::{mock_diamond, mock_two_parallel_roads};
    use super::super::paths::enumerate_paths;
    use super::*;
    use approx::assert_abs_diff_eq;

    fn paths_of(graph: &RoadGraph, s: &str, t: &str) -> Vec<Path> {
        let s = node_by_label(graph, s).unwrap();
        let t = node_by_label(graph, t).unwrap();
        enumerate_paths(graph, s, t)
    }

    #[test]
    fn parallel_roads_equilibrium() {
        // road A: 1x+0, road B: 0x+2, D=4: 2 drivers on each, all paying 2.
        let g = mock_two_parallel_roads();
        let paths = paths_of(&g, "0", "1");
        let eq = nash_equilibrium(&g, &paths, 4).unwrap();

        assert_eq!(eq.counts, vec![2, 2]);
        for &c in eq.driver_costs.iter() {
            assert_abs_diff_eq!(c, 2.0);
        }
        assert_abs_diff_eq!(eq.total_cost, 8.0);
    }

    #[test]
    fn no_driver_can_improve_at_the_fixed_point() {
        let g = mock_diamond();
        let paths = paths_of(&g, "s", "t");
        let eq = nash_equilibrium(&g, &paths, 7).unwrap();
        assert_eq!(eq.assignment.n_drivers(), 7);
        assert_eq!(eq.counts.iter().sum::<u32>(), 7);

        // every driver's realized cost is <= the cost of switching anywhere
        let mut flow = EdgeFlow::from_assignment(&g, &paths, &eq.assignment.0);
        for (d, &current) in eq.assignment.0.iter().enumerate() {
            for &e in paths[current].edges.iter() {
                flow.sub(e, 1);
            }
            let own = cost_if_joining(&g, &flow, &paths[current]);
            assert_abs_diff_eq!(own, eq.driver_costs[d]);
            for path in paths.iter() {
                assert!(own <= cost_if_joining(&g, &flow, path) + 1e-12);
            }
            for &e in paths[current].edges.iter() {
                flow.add(e, 1);
            }
        }
    }

    #[test]
    fn step_is_idempotent_at_convergence() {
        let g = mock_two_parallel_roads();
        let paths = paths_of(&g, "0", "1");
        let eq = nash_equilibrium(&g, &paths, 5).unwrap();

        let (again, changed) = best_response_step(&g, &paths, &eq.assignment);
        assert!(!changed);
        assert_eq!(again, eq.assignment);
    }

    #[test]
    fn zero_drivers_is_free() {
        let g = mock_diamond();
        let paths = paths_of(&g, "s", "t");
        let eq = nash_equilibrium(&g, &paths, 0).unwrap();
        assert_eq!(eq.counts, vec![0, 0]);
        assert!(eq.driver_costs.is_empty());
        assert_abs_diff_eq!(eq.total_cost, 0.0);
    }

    #[test]
    fn exhausted_round_cap_reports_the_last_assignment() {
        // on the Braess network the round-robin start is not a fixed point,
        // so a one-pass cap must run out
        let g = super::super::mocks::mock_braess();
        let paths = paths_of(&g, "s", "t");
        let res = nash_equilibrium_with_cap(&g, &paths, 6, 1);
        match res {
            Err(RoutingError::NoConvergence { rounds, last }) => {
                assert_eq!(rounds, 1);
                // the best-effort assignment still routes every driver
                assert_eq!(last.n_drivers(), 6);
                assert_eq!(last.counts(paths.len()).iter().sum::<u32>(), 6);
            }
            other => panic!("expected NoConvergence, got {:?}", other),
        }
        // the same instance converges once given enough rounds
        assert!(nash_equilibrium(&g, &paths, 6).is_ok());
    }

    #[test]
    fn no_path_with_demand_is_infeasible() {
        let g = mock_diamond();
        let res = nash_equilibrium(&g, &[], 2);
        assert!(matches!(res, Err(RoutingError::Infeasible { demand: 2 })));
        assert!(nash_equilibrium(&g, &[], 0).is_ok());
    }

    #[test]
    fn counts_match_per_driver_assignment() {
        let g = mock_diamond();
        let paths = paths_of(&g, "s", "t");
        let eq = nash_equilibrium(&g, &paths, 6).unwrap();
        assert_eq!(eq.counts, eq.assignment.counts(paths.len()));
        // symmetric network: even demand splits evenly
        assert_eq!(eq.counts, vec![3, 3]);
    }
}
