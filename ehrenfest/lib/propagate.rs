//! Exact time evolution of a state in a truncated basis via the eigenbasis
//! of the (time-independent) Hamiltonian.
//!
//! Given the dressed spectrum `H = V diag(E) V^T` and initial coefficients
//! `c(0)` over the box basis, the state at any time is
//! ```text
//! d(0) = V^T c(0)
//! d(t) = exp(-i E t / ħ) d(0)     (elementwise)
//! c(t) = V d(t)
//! ```
//! There is no time stepping, so no error accumulates over long horizons.
//! Phases are computed relative to the lowest dressed energy, which only
//! changes the (unobservable) global phase of the state.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    Arr2,
    eigen::Spectrum,
    error::{ LengthError, SimError, SimResult },
    grid::TimeGrid,
    units::HBAR,
    utils::{ expectation_antisym, expectation_sym, norm_sqr },
};

/// Largest tolerated deviation of the squared norm of the evolved state from
/// 1.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Evolves a fixed initial state under a diagonalized Hamiltonian.
#[derive(Clone, Debug)]
pub struct Propagator {
    // dressed energies, ascending
    energies: nd::Array1<f64>,
    // dressed states as columns, promoted to complex for products with states
    states: nd::Array2<C64>,
    // initial coefficients in the dressed basis
    d0: nd::Array1<C64>,
    // reference energy for phase accumulation
    e_ref: f64,
}

impl Propagator {
    /// Express the initial coefficients `c0` (over the original basis) in the
    /// dressed basis of `spectrum`.
    pub fn new<S>(spectrum: &Spectrum, c0: &Arr1<S>) -> SimResult<Self>
    where S: nd::Data<Elem = C64>
    {
        LengthError::check(c0, &spectrum.energies)?;
        let states: nd::Array2<C64> = spectrum.states.mapv(C64::from);
        let d0: nd::Array1<C64> = states.t().dot(c0);
        let e_ref = spectrum.energies.first().copied().unwrap_or(0.0);
        Ok(Self { energies: spectrum.energies.clone(), states, d0, e_ref })
    }

    /// Dimension of the state space.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.energies.len() }

    /// Coefficients of the state at time `t` in the dressed basis.
    pub fn dressed_at(&self, t: f64) -> nd::Array1<C64> {
        nd::Zip::from(&self.d0).and(&self.energies)
            .map_collect(|dj, ej| dj * C64::cis(-(ej - self.e_ref) * t / HBAR))
    }

    /// Coefficients of the state at time `t` in the original basis.
    pub fn state_at(&self, t: f64) -> nd::Array1<C64> {
        self.states.dot(&self.dressed_at(t))
    }

    /// ⟨x̂⟩ at time `t`, for position matrix `X` over the original basis.
    pub fn position_at<S>(&self, X: &Arr2<S>, t: f64) -> SimResult<f64>
    where S: nd::Data<Elem = f64>
    {
        LengthError::check_square(X, self.len())?;
        Ok(expectation_sym(X, &self.state_at(t)))
    }

    /// ⟨p̂⟩ at time `t`, for derivative matrix `D` (p̂ = -iħD) over the
    /// original basis.
    pub fn momentum_at<S>(&self, D: &Arr2<S>, t: f64) -> SimResult<f64>
    where S: nd::Data<Elem = f64>
    {
        LengthError::check_square(D, self.len())?;
        Ok(HBAR * expectation_antisym(D, &self.state_at(t)))
    }

    /// ⟨Ĥ⟩, which is conserved.
    pub fn energy(&self) -> f64 {
        self.d0.iter().zip(&self.energies)
            .map(|(dj, ej)| dj.norm_sqr() * ej)
            .sum()
    }

    /// Compute ⟨x̂⟩ at every point of `grid`.
    ///
    /// The squared norm of the reconstructed state is checked at every sample;
    /// a deviation from 1 beyond [`NORM_TOLERANCE`] is an internal defect that
    /// panics in debug builds and is returned as
    /// [`SimError::NormalizationDrift`] otherwise.
    pub fn positions<S>(&self, grid: &TimeGrid, X: &Arr2<S>)
        -> SimResult<nd::Array1<f64>>
    where S: nd::Data<Elem = f64>
    {
        LengthError::check_square(X, self.len())?;
        grid.iter()
            .map(|t| {
                let c = self.state_at(t);
                let norm = norm_sqr(&c);
                let drift = (norm - 1.0).abs();
                debug_assert!(
                    drift <= NORM_TOLERANCE,
                    "propagate::positions: state norm drifted to {} at t = {}",
                    norm, t,
                );
                if drift > NORM_TOLERANCE {
                    return Err(SimError::NormalizationDrift { t, norm });
                }
                Ok(expectation_sym(X, &c))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use crate::{
        basis::BoxBasis,
        eigen::{ jacobi, Spectrum },
        hamiltonian::box_hamiltonian,
        packet::Wavepacket,
    };

    fn setup(f: f64, k: usize, x_0: f64) -> (BoxBasis, nd::Array2<f64>, Propagator) {
        let basis = BoxBasis::new(1.0, 1.0, k).unwrap();
        let X = basis.position_matrix();
        let H = box_hamiltonian(&basis, &X, f).unwrap();
        let spec = jacobi(&H, 1e-14, 100).unwrap();
        let proj = Wavepacket::new(x_0, 0.08).project(&basis).unwrap();
        let prop = Propagator::new(&spec, &proj.coeffs).unwrap();
        (basis, X, prop)
    }

    #[test]
    fn dressed_norm_is_conserved() {
        let (_, _, prop) = setup(3.0, 16, 0.3);
        for t in [0.0, 0.1, 1.7, 25.0, 1e4] {
            let d = prop.dressed_at(t);
            assert!((norm_sqr(&d) - 1.0).abs() < 1e-12);
            let c = prop.state_at(t);
            assert!((norm_sqr(&c) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn initial_state_is_recovered() {
        let basis = BoxBasis::new(1.0, 1.0, 12).unwrap();
        let X = basis.position_matrix();
        let H = box_hamiltonian(&basis, &X, -2.0).unwrap();
        let spec = jacobi(&H, 1e-14, 100).unwrap();
        let proj = Wavepacket::new(0.6, 0.1).project(&basis).unwrap();
        let prop = Propagator::new(&spec, &proj.coeffs).unwrap();
        let c0 = prop.state_at(0.0);
        for (a, b) in c0.iter().zip(&proj.coeffs) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    #[test]
    fn stationary_state_does_not_move() {
        let basis = BoxBasis::new(1.0, 1.0, 10).unwrap();
        let X = basis.position_matrix();
        let H = box_hamiltonian(&basis, &X, 5.0).unwrap();
        let spec = jacobi(&H, 1e-14, 100).unwrap();
        let c0: nd::Array1<C64> = spec.states.column(2).mapv(C64::from);
        let prop = Propagator::new(&spec, &c0).unwrap();
        let x0 = prop.position_at(&X, 0.0).unwrap();
        for t in [0.3, 2.0, 11.0] {
            assert!((prop.position_at(&X, t).unwrap() - x0).abs() < 1e-12);
        }
        assert!((prop.energy() - spec.energies[2]).abs() < 1e-10);
    }

    #[test]
    fn two_level_beat() {
        // equal superposition of the first two box modes oscillates at
        // (E₂ - E₁)/ħ about l/2
        let basis = BoxBasis::new(1.0, 1.0, 2).unwrap();
        let X = basis.position_matrix();
        let spec = Spectrum {
            energies: basis.get_energies().clone(),
            states: nd::Array2::eye(2),
        };
        let s = 0.5_f64.sqrt();
        let c0 = nd::array![C64::from(s), C64::from(s)];
        let prop = Propagator::new(&spec, &c0).unwrap();
        let w = (basis.get_energies()[1] - basis.get_energies()[0]) / HBAR;
        let x12 = X[[0, 1]];
        for t in [0.0, 0.05, 0.2, 0.37] {
            let expected = 0.5 + x12 * (w * t).cos();
            assert!((prop.position_at(&X, t).unwrap() - expected).abs() < 1e-12);
        }
        let period = 2.0 * PI / w;
        let half = prop.position_at(&X, period / 2.0).unwrap();
        assert!((half - (0.5 - x12)).abs() < 1e-12);
    }

    #[test]
    fn positions_over_grid() {
        let (_, X, prop) = setup(1.0, 12, 0.5);
        let grid = TimeGrid::new(1.0, 50).unwrap();
        let xs = prop.positions(&grid, &X).unwrap();
        assert_eq!(xs.len(), 50);
        assert!(xs.iter().all(|x| (0.0..=1.0).contains(x)));
    }

    #[test]
    fn mismatched_initial_state() {
        let basis = BoxBasis::new(1.0, 1.0, 4).unwrap();
        let X = basis.position_matrix();
        let spec = jacobi(&X, 1e-14, 100).unwrap();
        let c0 = nd::Array1::<C64>::zeros(3);
        assert!(Propagator::new(&spec, &c0).is_err());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn drift_is_fatal_in_debug_builds() {
        let spec = Spectrum {
            energies: nd::array![1.0, 2.0],
            states: nd::Array2::eye(2) * 2.0,
        };
        let c0 = nd::array![C64::from(1.0), C64::from(0.0)];
        let prop = Propagator::new(&spec, &c0).unwrap();
        let X = nd::Array2::<f64>::eye(2);
        let grid = TimeGrid::new(1.0, 3).unwrap();
        let _ = prop.positions(&grid, &X);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn drift_is_reported_in_release_builds() {
        let spec = Spectrum {
            energies: nd::array![1.0, 2.0],
            states: nd::Array2::eye(2) * 2.0,
        };
        let c0 = nd::array![C64::from(1.0), C64::from(0.0)];
        let prop = Propagator::new(&spec, &c0).unwrap();
        let X = nd::Array2::<f64>::eye(2);
        let grid = TimeGrid::new(1.0, 3).unwrap();
        let err = prop.positions(&grid, &X).unwrap_err();
        assert!(matches!(err, SimError::NormalizationDrift { .. }));
    }
}
