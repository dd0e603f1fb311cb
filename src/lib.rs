//!
//! wardrop computes the [social optimum](https://en.wikipedia.org/wiki/Socially_optimal_solution)
//! and the [Wardrop equilibrium](https://en.wikipedia.org/wiki/John_Glen_Wardrop)
//! of a congestion routing game with affine edge costs and integer drivers.
//!
pub mod gml;
pub mod routing;
