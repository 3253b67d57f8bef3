//! The initial Gaussian wavepacket and its projection onto the box basis.

use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    basis::BoxBasis,
    error::{ SimError, SimResult },
    units::HBAR,
    utils::{ renormalize, simpson },
};

// half-width of the quadrature window in units of sigma; the Gaussian is below
// e^-72 beyond it
const WINDOW_SIGMAS: f64 = 12.0;

// quadrature resolution controls
const QUAD_MIN_INTERVALS: usize = 2048;
const QUAD_PER_OSCILLATION: f64 = 32.0;
const QUAD_PER_SIGMA: f64 = 16.0;

/// Projections capturing less than this fraction of the packet's norm log a
/// warning.
pub const CAPTURE_WARN: f64 = 0.9;

/// A Gaussian wavepacket
/// ```text
/// ψ₀(x) = (π σ²)^(-1/4) exp(-(x - x₀)² / (2 σ²)) exp(i p₀ x / ħ)
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Wavepacket {
    /// Center.
    pub x_0: f64,
    /// Amplitude width.
    pub sigma: f64,
    /// Mean momentum.
    pub p_0: f64,
}

/// Coefficients of a [`Wavepacket`] over a [`BoxBasis`].
#[derive(Clone, Debug)]
pub struct Projection {
    /// Unit-norm coefficients, indexed by `n - 1`.
    pub coeffs: nd::Array1<C64>,
    /// Squared norm of the coefficients before renormalization, i.e. the
    /// fraction of the packet represented by the truncated basis.
    pub captured: f64,
}

impl Wavepacket {
    /// Create a new wavepacket at rest.
    pub fn new(x_0: f64, sigma: f64) -> Self {
        Self { x_0, sigma, p_0: 0.0 }
    }

    /// Give the wavepacket a mean momentum.
    pub fn with_momentum(mut self, p_0: f64) -> Self {
        self.p_0 = p_0;
        self
    }

    /// Evaluate ψ₀(*x*) on the whole real line.
    pub fn amplitude(&self, x: f64) -> C64 {
        let norm = (PI * self.sigma.powi(2)).powf(-0.25);
        let envelope = (-(x - self.x_0).powi(2) / (2.0 * self.sigma.powi(2))).exp();
        norm * envelope * C64::cis(self.p_0 * x / HBAR)
    }

    // quadrature window and interval count for a basis
    fn quadrature(&self, basis: &BoxBasis) -> (f64, f64, usize) {
        let l = basis.get_l();
        let a = (self.x_0 - WINDOW_SIGMAS * self.sigma).max(0.0);
        let b = (self.x_0 + WINDOW_SIGMAS * self.sigma).min(l);
        let k_max = basis.len() as f64 * PI / l + (self.p_0 / HBAR).abs();
        let oscillations = (b - a) * k_max / (2.0 * PI);
        let n_osc = (QUAD_PER_OSCILLATION * oscillations).ceil() as usize;
        let n_sig = (QUAD_PER_SIGMA * (b - a) / self.sigma).ceil() as usize;
        (a, b, QUAD_MIN_INTERVALS.max(n_osc).max(n_sig))
    }

    /// Compute *c*ₙ = ∫ φₙ(*x*) ψ₀(*x*) d*x* over the box for every mode in
    /// `basis` and renormalize the result to unit norm.
    ///
    /// Integrals are evaluated with composite Simpson quadrature over the part
    /// of the box where the packet is non-negligible. Fails if the packet has
    /// no overlap with the basis.
    pub fn project(&self, basis: &BoxBasis) -> SimResult<Projection> {
        let (a, b, n) = self.quadrature(basis);
        let mut coeffs: nd::Array1<C64>
            = basis.modes()
            .map(|mode| simpson(|x| mode.eval(x) * self.amplitude(x), a, b, n))
            .collect();
        let captured = renormalize(&mut coeffs);
        if !captured.is_finite() || captured <= f64::MIN_POSITIVE {
            return Err(SimError::invalid(format!(
                "wavepacket at x_0 = {} with sigma = {} has no overlap with the basis",
                self.x_0, self.sigma,
            )));
        }
        if captured < CAPTURE_WARN {
            log::warn!(
                "packet::project: basis of {} modes captures only {:.1}% of the wavepacket; consider increasing k",
                basis.len(), 100.0 * captured,
            );
        }
        Ok(Projection { coeffs, captured })
    }
}
