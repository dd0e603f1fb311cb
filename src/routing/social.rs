//! Social optimum solver
//!
//! Finds the allocation of drivers over paths minimizing the total system
//! travel cost. With affine edge costs `a*x + b` (a >= 0) the per-edge total
//! cost `x * (a*x + b)` is a convex quadratic, so the objective over path
//! flows is the convex quadratic program
//!
//! ```text
//! minimize  x' Q x + c' x    where  Q = M' diag(a) M,  c = M' b
//! s.t.      sum(x) = D,  x >= 0
//! ```
//!
//! with M the edge/path incidence matrix. The program is solved by
//! Frank-Wolfe with exact line search over the scaled simplex, then the
//! continuous optimum is rounded to integer driver counts by
//! largest-remainder rounding.
use super::flow::EdgeFlow;
use super::graph::RoadGraph;
use super::paths::Path;
use super::RoutingError;
use log::debug;
use ndarray::{Array1, Array2};

/// duality gap for a certified optimum, relative to the current cost
const GAP_TOL: f64 = 1e-9;
/// fallback gap still accepted on iteration exhaustion
const GAP_TOL_COARSE: f64 = 1e-4;
const MAX_ITER: usize = 10_000;

///
/// Social-optimum allocation of D drivers.
///
#[derive(Debug, Clone, PartialEq)]
pub struct SocialOptimum {
    /// integer driver count per path, summing to D.
    ///
    /// Rounded from the continuous optimum by largest remainder, so it may
    /// be a small constant away from the best integer split.
    pub counts: Vec<u32>,
    /// continuous optimum the counts were rounded from
    pub fractional: Vec<f64>,
    /// total system cost at the integer counts
    pub total_cost: f64,
}

///
/// Edge/path incidence matrix: entry (e, p) is how many times path p uses
/// edge e (0 or 1 for simple paths). Built once per (graph, path set) and
/// reused by the objective and its gradient.
///
pub fn incidence_matrix(graph: &RoadGraph, paths: &[Path]) -> Array2<f64> {
    let mut m = Array2::zeros((graph.edge_count(), paths.len()));
    for (p, path) in paths.iter().enumerate() {
        for &e in path.edges.iter() {
            m[[e.index(), p]] += 1.0;
        }
    }
    m
}

///
/// Minimize total system cost over allocations of `demand` drivers to
/// `paths`.
///
/// Fails with `Infeasible` when there is no path to route a positive demand
/// over, and with `Solver` when the convex program does not reach its gap
/// tolerance.
///
pub fn social_optimum(
    graph: &RoadGraph,
    paths: &[Path],
    demand: u32,
) -> Result<SocialOptimum, RoutingError> {
    if paths.is_empty() {
        if demand > 0 {
            return Err(RoutingError::Infeasible { demand });
        }
        return Ok(SocialOptimum {
            counts: Vec::new(),
            fractional: Vec::new(),
            total_cost: 0.0,
        });
    }
    if demand == 0 {
        return Ok(SocialOptimum {
            counts: vec![0; paths.len()],
            fractional: vec![0.0; paths.len()],
            total_cost: 0.0,
        });
    }

    let m = incidence_matrix(graph, paths);
    let a: Array1<f64> = graph.edge_indices().map(|e| graph[e].a).collect();
    let b: Array1<f64> = graph.edge_indices().map(|e| graph[e].b).collect();
    // Q = M' diag(a) M, c = M' b
    let am = &m * &a.insert_axis(ndarray::Axis(1));
    let q = m.t().dot(&am);
    let c = m.t().dot(&b);

    let x = frank_wolfe(&q, &c, demand as f64)?;
    let counts = round_largest_remainder(&x, demand);
    let total_cost = EdgeFlow::from_path_counts(graph, paths, &counts).total_cost(graph);
    Ok(SocialOptimum {
        counts,
        fractional: x.to_vec(),
        total_cost,
    })
}

///
/// Frank-Wolfe with away steps and exact line search for
/// `min x'Qx + c'x  s.t.  sum(x) = d, x >= 0`.
///
/// The linear subproblem over the scaled simplex is solved by picking the
/// smallest gradient coordinate; the duality gap `g . (x - s)` certifies
/// optimality. Away steps let the iterate drop a path entirely, which avoids
/// the zigzag when the optimum leaves some paths unused.
///
fn frank_wolfe(q: &Array2<f64>, c: &Array1<f64>, d: f64) -> Result<Array1<f64>, RoutingError> {
    let n = c.len();
    let mut x = Array1::from_elem(n, d / n as f64);
    let mut gap = f64::INFINITY;

    for iter in 0..MAX_ITER {
        let g = 2.0 * q.dot(&x) + c;

        // toward-vertex of the simplex minimizing the linearized objective
        let j_fw = argmin(&g);
        let gap_fw = g.dot(&x) - d * g[j_fw];
        // away-vertex: the used path with the worst gradient
        let j_aw = argmax_used(&g, &x);
        let gap_aw = d * g[j_aw] - g.dot(&x);

        let cost = x.dot(&q.dot(&x)) + c.dot(&x);
        gap = gap_fw;
        if gap <= GAP_TOL * (1.0 + cost.abs()) {
            debug!("frank-wolfe converged iter={} gap={:e}", iter, gap);
            return Ok(x);
        }

        let (dir, gamma_max) = if gap_fw >= gap_aw {
            let mut s = Array1::zeros(n);
            s[j_fw] = d;
            (&s - &x, 1.0)
        } else {
            let mut s = Array1::zeros(n);
            s[j_aw] = d;
            // moving away from s; the step is capped where x[j_aw] hits zero
            (&x - &s, x[j_aw] / (d - x[j_aw]))
        };

        let curv = dir.dot(&q.dot(&dir));
        let slope = g.dot(&dir);
        // exact minimizer of the quadratic along x + gamma * dir
        let gamma = if curv > 0.0 {
            (-slope / (2.0 * curv)).clamp(0.0, gamma_max)
        } else {
            gamma_max
        };
        x = &x + &(gamma * &dir);
        // clear float residue so dropped paths are exactly unused
        x.mapv_inplace(|v| if v < 1e-12 { 0.0 } else { v });
    }

    let cost = x.dot(&q.dot(&x)) + c.dot(&x);
    if gap <= GAP_TOL_COARSE * (1.0 + cost.abs()) {
        debug!("frank-wolfe stopped at coarse tolerance gap={:e}", gap);
        return Ok(x);
    }
    Err(RoutingError::Solver(format!(
        "frank-wolfe did not converge: gap={:e} after {} iterations",
        gap, MAX_ITER
    )))
}

fn argmin(g: &Array1<f64>) -> usize {
    let mut j = 0;
    for i in 1..g.len() {
        if g[i] < g[j] {
            j = i;
        }
    }
    j
}

fn argmax_used(g: &Array1<f64>, x: &Array1<f64>) -> usize {
    let mut j = 0;
    let mut best = f64::NEG_INFINITY;
    for i in 0..g.len() {
        if x[i] > 0.0 && g[i] > best {
            best = g[i];
            j = i;
        }
    }
    j
}

///
/// Round a continuous allocation (summing to `demand`) to integers summing
/// to exactly `demand`: floor everything, then hand the leftover drivers to
/// the largest fractional parts, ties to the lowest path index.
///
pub fn round_largest_remainder(x: &Array1<f64>, demand: u32) -> Vec<u32> {
    let mut counts: Vec<u32> = x.iter().map(|&v| v.max(0.0).floor() as u32).collect();
    let assigned: u32 = counts.iter().sum();
    let mut remaining = demand.saturating_sub(assigned) as usize;

    let mut order: Vec<usize> = (0..x.len()).collect();
    order.sort_by(|&i, &j| {
        let fi = x[i] - x[i].floor();
        let fj = x[j] - x[j].floor();
        fj.partial_cmp(&fi).unwrap().then(i.cmp(&j))
    });
    while remaining > 0 {
        for &i in order.iter() {
            if remaining == 0 {
                break;
            }
            counts[i] += 1;
            remaining -= 1;
        }
    }
    counts
}

//
// tests
//
