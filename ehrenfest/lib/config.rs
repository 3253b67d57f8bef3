//! Run configuration: time-grid policy, eigensolver selection, and basis size
//! limits.
//!
//! The defaults here are part of the public contract of [`run`][crate::run];
//! identical parameters with the default configuration always produce the same
//! time grid.

use crate::eigen::SpectralMethod;

/// Default number of time samples.
pub const DEF_NUM_SAMPLES: usize = 1000;

/// Default horizon in units of the lowest unperturbed transition period,
/// 2πħ/(*E*₂ − *E*₁). Three such periods make up one full revival time of the
/// box, 4 *m* *l*²/(π ħ).
pub const DEF_HORIZON_PERIODS: f64 = 3.0;

/// Default maximum basis size.
pub const DEF_MAX_BASIS: usize = 256;

/// Selects the final time of the shared time grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Horizon {
    /// A number of lowest transition periods of the unperturbed box.
    Periods(f64),
    /// A fixed final time, in natural units.
    Fixed(f64),
}

impl Default for Horizon {
    fn default() -> Self { Self::Periods(DEF_HORIZON_PERIODS) }
}

impl Horizon {
    /// Return `true` if `self` is `Periods`.
    pub fn is_periods(&self) -> bool { matches!(self, Self::Periods(_)) }

    /// Return `true` if `self` is `Fixed`.
    pub fn is_fixed(&self) -> bool { matches!(self, Self::Fixed(_)) }

    /// Return the horizon's defining value.
    pub fn value(&self) -> f64 {
        match self {
            Self::Periods(c) => *c,
            Self::Fixed(t) => *t,
        }
    }
}

/// Configuration for a simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Number of time samples *N* (at least 2).
    pub num_samples: usize,
    /// Final-time policy for the time grid.
    pub horizon: Horizon,
    /// Eigensolver for the forced Hamiltonian.
    pub method: SpectralMethod,
    /// Largest accepted basis size.
    pub max_basis: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_samples: DEF_NUM_SAMPLES,
            horizon: Horizon::default(),
            method: SpectralMethod::default(),
            max_basis: DEF_MAX_BASIS,
        }
    }
}

impl Config {
    /// Set the number of time samples.
    pub fn with_samples(mut self, num_samples: usize) -> Self {
        self.num_samples = num_samples;
        self
    }

    /// Set the time-grid horizon.
    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the eigensolver.
    pub fn with_method(mut self, method: SpectralMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the largest accepted basis size.
    pub fn with_max_basis(mut self, max_basis: usize) -> Self {
        self.max_basis = max_basis;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.num_samples, DEF_NUM_SAMPLES);
        assert_eq!(config.horizon, Horizon::Periods(DEF_HORIZON_PERIODS));
        assert!(config.method.is_jacobi());
        assert_eq!(config.max_basis, DEF_MAX_BASIS);
    }

    #[test]
    fn builders() {
        let config = Config::default()
            .with_samples(10)
            .with_horizon(Horizon::Fixed(2.5))
            .with_method(SpectralMethod::Lapack)
            .with_max_basis(8);
        assert_eq!(config.num_samples, 10);
        assert!(config.horizon.is_fixed());
        assert_eq!(config.horizon.value(), 2.5);
        assert!(config.method.is_lapack());
        assert_eq!(config.max_basis, 8);
    }
}
