//! Centroid defuzzification over a sampled universe.
//!
//! `centroid = Σ x·μ(x) / Σ μ(x)` across the universe grid. An aggregate that is
//! zero everywhere has no centre of gravity; the universe midpoint is returned.

use crate::domain::variable::Universe;

pub fn centroid<F>(universe: &Universe, membership: F) -> f64
where
    F: Fn(f64) -> f64,
{
    let mut weighted = 0.0;
    let mut total = 0.0;
    for x in universe.samples() {
        let mu = membership(x);
        weighted += x * mu;
        total += mu;
    }
    if total == 0.0 {
        universe.midpoint()
    } else {
        weighted / total
    }
}
