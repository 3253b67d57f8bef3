//! Top-level driver: parameter validation, assembly of both branches on a
//! shared time grid, and the process-wide [`setup`] hook.

use std::sync::Once;
use ndarray as nd;
use crate::{
    analysis::max_deviation,
    basis::BoxBasis,
    classical::{ ClassicalIntegrator, ClassicalState },
    config::Config,
    eigen::{ self, Spectrum },
    error::{ SimError, SimResult },
    grid::TimeGrid,
    hamiltonian::box_hamiltonian,
    packet::Wavepacket,
    propagate::Propagator,
};

static SETUP: Once = Once::new();

/// Install a panic hook that forwards panic messages to the [`log`] facade
/// before running the previously installed hook.
///
/// Only the first call has any effect.
pub fn setup() {
    SETUP.call_once(|| {
        let prev = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            log::error!("{}", info);
            prev(info);
        }));
        log::debug!("sim::setup: panic hook installed");
    });
}

/// Physical inputs to a simulation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimulationParams {
    /// Box width.
    pub l: f64,
    /// Particle mass.
    pub m: f64,
    /// Number of box eigenmodes in the basis.
    pub k: u32,
    /// Initial position; also the center of the initial wavepacket.
    pub x_0: f64,
    /// Slope of the linear potential *V*(*x*) = *f* *x*.
    pub f: f64,
    /// Amplitude width of the initial wavepacket.
    pub sigma: f64,
    /// Initial momentum; the classical particle starts with velocity
    /// `p_0 / m`.
    pub p_0: f64,
}

impl SimulationParams {
    /// Create a new set of parameters for a particle starting at rest.
    pub fn new(l: f64, m: f64, k: u32, x_0: f64, f: f64, sigma: f64) -> Self {
        Self { l, m, k, x_0, f, sigma, p_0: 0.0 }
    }

    /// Give the particle an initial momentum.
    pub fn with_momentum(mut self, p_0: f64) -> Self {
        self.p_0 = p_0;
        self
    }

    /// Check all parameters against their domains, reporting the first
    /// failure in the order `l`, `m`, `k`, `x_0`, `f`, `sigma`, `p_0`.
    pub fn validate(&self, config: &Config) -> SimResult<()> {
        if !self.l.is_finite() || self.l <= 0.0 {
            return Err(SimError::invalid(
                format!("l must be finite and positive; got {}", self.l)));
        }
        if !self.m.is_finite() || self.m <= 0.0 {
            return Err(SimError::invalid(
                format!("m must be finite and positive; got {}", self.m)));
        }
        if self.k < 1 || self.k as usize > config.max_basis {
            return Err(SimError::invalid(format!(
                "k must lie in 1..={}; got {}", config.max_basis, self.k)));
        }
        if !self.x_0.is_finite() || self.x_0 <= 0.0 || self.x_0 >= self.l {
            return Err(SimError::invalid(format!(
                "x_0 must lie strictly inside (0, {}); got {}", self.l, self.x_0)));
        }
        if !self.f.is_finite() {
            return Err(SimError::invalid(
                format!("f must be finite; got {}", self.f)));
        }
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(SimError::invalid(
                format!("sigma must be finite and positive; got {}", self.sigma)));
        }
        if !self.p_0.is_finite() {
            return Err(SimError::invalid(
                format!("p_0 must be finite; got {}", self.p_0)));
        }
        Ok(())
    }
}

/// Quantum and classical trajectories sampled on a common time grid.
///
/// All three arrays have the same length, and `time_points` is strictly
/// increasing with uniform spacing.
#[derive(Clone, Debug, PartialEq)]
pub struct Results {
    /// Sample times.
    pub time_points: nd::Array1<f64>,
    /// ⟨x̂⟩ at each sample time.
    pub quantum_positions: nd::Array1<f64>,
    /// Classical position at each sample time.
    pub classical_positions: nd::Array1<f64>,
}

impl Results {
    /// Number of samples.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.time_points.len() }

    /// Largest absolute difference between the quantum and classical
    /// trajectories.
    pub fn max_deviation(&self) -> f64 {
        max_deviation(&self.quantum_positions, &self.classical_positions)
            .unwrap_or(f64::NAN)
    }
}

/// Every component of a single simulation, built and ready to sample.
///
/// Nothing here is shared between instances; building the same parameters
/// twice gives identical results.
#[derive(Clone, Debug)]
pub struct Simulation {
    params: SimulationParams,
    grid: TimeGrid,
    basis: BoxBasis,
    X: nd::Array2<f64>,
    spectrum: Spectrum,
    propagator: Propagator,
    captured: f64,
    integrator: ClassicalIntegrator,
}

impl Simulation {
    /// Validate `params` and build the time grid, basis, dressed spectrum,
    /// initial state, and classical integrator.
    pub fn build(params: &SimulationParams, config: &Config) -> SimResult<Self> {
        params.validate(config)?;
        let grid = TimeGrid::from_policy(params.l, params.m, config)?;
        let basis = BoxBasis::new(params.l, params.m, params.k as usize)?;
        let X = basis.position_matrix();
        let H = box_hamiltonian(&basis, &X, params.f)?;
        let spectrum = eigen::solve(&H, &config.method)?;
        let projection
            = Wavepacket::new(params.x_0, params.sigma)
            .with_momentum(params.p_0)
            .project(&basis)?;
        let propagator = Propagator::new(&spectrum, &projection.coeffs)?;
        let integrator = ClassicalIntegrator::new(params.l, params.m, params.f)?;
        log::debug!(
            "sim::build: k = {}, N = {}, t_final = {:.6e}, captured = {:.9}, orthonormality error = {:.3e}",
            basis.len(), grid.len(), grid.t_final(), projection.captured,
            spectrum.orthonormality_error(),
        );
        Ok(Self {
            params: *params,
            grid,
            basis,
            X,
            spectrum,
            propagator,
            captured: projection.captured,
            integrator,
        })
    }

    /// Get the parameters.
    pub fn get_params(&self) -> &SimulationParams { &self.params }

    /// Get a reference to the time grid.
    pub fn get_grid(&self) -> &TimeGrid { &self.grid }

    /// Get a reference to the box basis.
    pub fn get_basis(&self) -> &BoxBasis { &self.basis }

    /// Get a reference to the position matrix.
    pub fn get_position_matrix(&self) -> &nd::Array2<f64> { &self.X }

    /// Get a reference to the dressed spectrum of the Hamiltonian.
    pub fn get_spectrum(&self) -> &Spectrum { &self.spectrum }

    /// Get a reference to the quantum propagator.
    pub fn get_propagator(&self) -> &Propagator { &self.propagator }

    /// Get the classical integrator.
    pub fn get_integrator(&self) -> &ClassicalIntegrator { &self.integrator }

    /// Fraction of the initial wavepacket's norm represented in the basis
    /// before renormalization.
    pub fn captured(&self) -> f64 { self.captured }

    /// Initial classical state.
    pub fn initial_classical(&self) -> ClassicalState {
        ClassicalState::new(self.params.x_0, self.params.p_0 / self.params.m)
    }

    /// ⟨x̂⟩ over the time grid.
    pub fn quantum_positions(&self) -> SimResult<nd::Array1<f64>> {
        self.propagator.positions(&self.grid, &self.X)
    }

    /// ⟨p̂⟩ over the time grid.
    pub fn quantum_momenta(&self) -> SimResult<nd::Array1<f64>> {
        let D = self.basis.derivative_matrix();
        self.grid.iter()
            .map(|t| self.propagator.momentum_at(&D, t))
            .collect()
    }

    /// Classical position over the time grid.
    pub fn classical_positions(&self) -> SimResult<nd::Array1<f64>> {
        self.integrator.positions(self.initial_classical(), &self.grid)
    }

    /// Sample both branches.
    pub fn results(&self) -> SimResult<Results> {
        let quantum_positions = self.quantum_positions()?;
        let classical_positions = self.classical_positions()?;
        let results = Results {
            time_points: self.grid.get_t().clone(),
            quantum_positions,
            classical_positions,
        };
        log::debug!(
            "sim::results: {} samples, <H> = {:.6e}, max |<x> - x| = {:.3e}",
            results.len(), self.propagator.energy(), results.max_deviation(),
        );
        Ok(results)
    }
}

/// Run a simulation with full control over parameters and configuration.
pub fn run_with(params: &SimulationParams, config: &Config)
    -> SimResult<Results>
{
    Simulation::build(params, config)?.results()
}

/// Run a simulation of a particle of mass `m` released from rest at `x_0` in
/// a box of width `l` under the linear potential *V*(*x*) = `f` *x*, with the
/// quantum state expanded in `k` box eigenmodes and starting as a Gaussian of
/// width `sigma`.
///
/// Uses [`Config::default`]. Fails with [`SimError::InvalidParameter`] for
/// inputs outside their domains and [`SimError::NumericalNonConvergence`] if
/// the Hamiltonian cannot be diagonalized.
///
/// ```
/// let res = ehrenfest::run(1.0, 1.0, 12, 0.5, 0.0, 0.05).unwrap();
/// assert_eq!(res.len(), 1000);
/// assert!(res.classical_positions.iter().all(|&x| x == 0.5));
///
/// let err = ehrenfest::run(0.0, 1.0, 12, 0.5, 0.0, 0.05).unwrap_err();
/// assert!(err.is_invalid_parameter());
/// ```
pub fn run(l: f64, m: f64, k: u32, x_0: f64, f: f64, sigma: f64)
    -> SimResult<Results>
{
    run_with(&SimulationParams::new(l, m, k, x_0, f, sigma), &Config::default())
}
