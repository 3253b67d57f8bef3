#![allow(dead_code, non_snake_case)]

//! Numerical comparison of quantum and classical motion for a particle
//! confined to a finite interval under a constant external force.
//!
//! The quantum branch expands an initial Gaussian wavepacket in the
//! eigenstates of an infinite square well, diagonalizes the full (forced)
//! Hamiltonian in that truncated basis, and evolves the state exactly by phase
//! rotation of the dressed-state coefficients. The classical branch integrates
//! Newton's equations for the same force with exact, elastic reflections at
//! the walls. Both are sampled on a shared time grid so that the expectation
//! value ⟨x̂⟩(*t*) can be compared directly against *x*(*t*) in the spirit of
//! Ehrenfest's theorem.
//!
//! The top-level entry points are [`run`] and [`run_with`]; lower-level
//! components are available from their respective modules:
//! - [`basis`]: box eigenmodes and analytic position/momentum matrices
//! - [`hamiltonian`]: assembly of the forced Hamiltonian
//! - [`eigen`]: symmetric eigensolvers (cyclic Jacobi and LAPACK)
//! - [`packet`]: projection of the initial wavepacket onto the box basis
//! - [`propagate`]: time evolution in the dressed basis
//! - [`classical`]: reflecting classical integrator
//! - [`analysis`]: tools to compare sampled trajectories
//!
//! See [`docs`] for theoretical background.
//!
//! ```
//! let res = ehrenfest::run(1.0, 1.0, 20, 0.5, 0.0, 0.05).unwrap();
//! assert_eq!(res.time_points.len(), res.quantum_positions.len());
//! assert_eq!(res.time_points.len(), res.classical_positions.len());
//! ```

pub mod error;
pub mod units;
pub mod utils;
pub mod config;
pub mod grid;
pub mod basis;
pub mod hamiltonian;
pub mod eigen;
pub mod packet;
pub mod propagate;
pub mod classical;
pub mod analysis;
pub mod sim;

pub mod docs;

pub use config::{ Config, Horizon };
pub use eigen::SpectralMethod;
pub use error::{ SimError, SimResult };
pub use sim::{ Results, SimulationParams, run, run_with, setup };

pub(crate) const DEF_EPSILON: f64 = 1e-14;
pub(crate) const DEF_MAXSWEEPS: usize = 100;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
