//! The shared, evenly spaced time grid.

use std::f64::consts::TAU;
use ndarray as nd;
use crate::{
    basis::box_energy,
    config::{ Config, Horizon },
    error::{ SimError, SimResult },
    units::HBAR,
};

/// An ordered, evenly spaced sequence of time samples starting at `t = 0`.
///
/// Arrays borrowed from this type are guaranteed to be strictly increasing
/// with uniform spacing.
#[derive(Clone, Debug)]
pub struct TimeGrid {
    t: nd::Array1<f64>,
    dt: f64,
}

impl TimeGrid {
    /// Create a new grid of `n` samples over `[0, t_final]`.
    ///
    /// Fails if `n < 2` or `t_final` is not finite and positive.
    pub fn new(t_final: f64, n: usize) -> SimResult<Self> {
        if n < 2 {
            return Err(SimError::invalid(
                format!("time grid needs at least 2 samples; got {}", n)));
        }
        if !t_final.is_finite() || t_final <= 0.0 {
            return Err(SimError::invalid(
                format!("time horizon must be finite and positive; got {}", t_final)));
        }
        let t: nd::Array1<f64> = nd::Array1::linspace(0.0, t_final, n);
        let dt = t_final / (n - 1) as f64;
        Ok(Self { t, dt })
    }

    /// Create a grid for a box of width `l` and particle mass `m` according to
    /// the horizon policy in `config`.
    pub fn from_policy(l: f64, m: f64, config: &Config) -> SimResult<Self> {
        let t_final
            = match config.horizon {
                Horizon::Periods(c) => c * lowest_transition_period(l, m),
                Horizon::Fixed(t) => t,
            };
        Self::new(t_final, config.num_samples)
    }

    /// Get a reference to the time coordinate array.
    pub fn get_t(&self) -> &nd::Array1<f64> { &self.t }

    /// Get the grid spacing.
    pub fn get_dt(&self) -> f64 { self.dt }

    /// Get the final time.
    pub fn t_final(&self) -> f64 { self.t[self.t.len() - 1] }

    /// Get the number of samples.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.t.len() }

    /// Iterate over the time samples.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.t.iter().copied()
    }
}

/// Period 2πħ / (*E*₂ − *E*₁) of the lowest transition of the unperturbed box.
///
/// This does not depend on the basis size, so it is well defined even for a
/// single-mode basis.
pub fn lowest_transition_period(l: f64, m: f64) -> f64 {
    TAU * HBAR / (box_energy(2, l, m) - box_energy(1, l, m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use crate::utils::array_diff;

    #[test]
    fn uniform_and_increasing() {
        let grid = TimeGrid::new(2.0, 201).unwrap();
        assert_eq!(grid.len(), 201);
        assert_eq!(grid.get_t()[0], 0.0);
        assert!((grid.t_final() - 2.0).abs() < 1e-12);
        let dt = array_diff(grid.get_t());
        assert!(dt.iter().all(|&d| d > 0.0));
        assert!(dt.iter().all(|&d| (d - grid.get_dt()).abs() < 1e-12));
    }

    #[test]
    fn default_policy_is_one_revival() {
        let (l, m) = (1.3, 0.7);
        let grid = TimeGrid::from_policy(l, m, &Config::default()).unwrap();
        let t_rev = 4.0 * m * l * l / (PI * HBAR);
        assert!((grid.t_final() / t_rev - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fixed_policy() {
        let config = Config::default()
            .with_horizon(Horizon::Fixed(5.0))
            .with_samples(11);
        let grid = TimeGrid::from_policy(1.0, 1.0, &config).unwrap();
        assert_eq!(grid.len(), 11);
        assert!((grid.get_dt() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_degenerate_grids() {
        assert!(TimeGrid::new(1.0, 1).is_err());
        assert!(TimeGrid::new(0.0, 10).is_err());
        assert!(TimeGrid::new(f64::NAN, 10).is_err());
        let config = Config::default().with_horizon(Horizon::Periods(-1.0));
        assert!(TimeGrid::from_policy(1.0, 1.0, &config).is_err());
    }
}
