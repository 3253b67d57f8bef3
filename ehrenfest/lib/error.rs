//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use ndarray_linalg::error::LinalgError;
use thiserror::Error;

/// Returned when an operation requiring arrays of equal length (or a matrix
/// whose dimension matches a vector) encounters mismatched sizes.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }

    pub(crate) fn check_square<S, A>(
        a: &nd::ArrayBase<S, nd::Ix2>,
        n: usize,
    ) -> Result<(), Self>
    where S: nd::Data<Elem = A>
    {
        let (nr, nc) = a.dim();
        if nr != nc {
            Err(Self(nr, nc))
        } else if nr != n {
            Err(Self(nr, n))
        } else {
            Ok(())
        }
    }
}

/// Returned when a sampled trajectory is too short for a finite-difference
/// stencil.
#[derive(Debug, Error)]
#[error("sampled arrays must have at least {1} elements; got {0}")]
pub struct StencilError(pub usize, pub usize);

impl StencilError {
    pub(crate) fn check<S, A>(a: &nd::ArrayBase<S, nd::Ix1>, min: usize)
        -> Result<(), Self>
    where S: nd::Data<Elem = A>
    {
        let n = a.len();
        (n >= min).then_some(()).ok_or(Self(n, min))
    }
}

/// Returned from functions in [`analysis`][crate::analysis].
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// [`LengthError`]
    #[error("length error: {0}")]
    Length(#[from] LengthError),

    /// [`StencilError`]
    #[error("stencil error: {0}")]
    Stencil(#[from] StencilError),
}

/// Returned from the symmetric eigensolvers in [`eigen`][crate::eigen].
#[derive(Debug, Error)]
pub enum EigenError {
    /// Returned when a non-positive `epsilon` value is encountered.
    #[error("epsilon values must be greater than 0; got {0}")]
    BadEpsilon(f64),

    /// Returned when a zero `maxsweeps` value is encountered.
    #[error("maxsweeps must be greater than 0; got {0}")]
    BadMaxsweeps(usize),

    /// Returned when the input matrix is not square.
    #[error("matrix must be square; got shape ({0}, {1})")]
    NotSquare(usize, usize),

    /// Returned when the Jacobi iteration fails to reduce the off-diagonal
    /// norm below tolerance within the allowed number of sweeps.
    #[error("jacobi iteration did not converge after {sweeps} sweeps; residual off-diagonal norm {residual:.3e}")]
    NonConvergence { sweeps: usize, residual: f64 },

    /// [`LinalgError`].
    #[error("linalg error: {0}")]
    Linalg(#[from] LinalgError),
}

impl EigenError {
    pub(crate) fn check_epsilon(epsilon: f64) -> Result<(), Self> {
        (epsilon > 0.0).then_some(()).ok_or(Self::BadEpsilon(epsilon))
    }

    pub(crate) fn check_maxsweeps(maxsweeps: usize) -> Result<(), Self> {
        (maxsweeps != 0).then_some(()).ok_or(Self::BadMaxsweeps(maxsweeps))
    }
}

/// Returned from the simulation driver and the quantum propagator.
#[derive(Debug, Error)]
pub enum SimError {
    /// Returned when a simulation parameter is non-finite or out of its
    /// domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Returned when diagonalization of the Hamiltonian does not converge.
    #[error("diagonalization did not converge after {sweeps} sweeps; residual off-diagonal norm {residual:.3e}")]
    NumericalNonConvergence { sweeps: usize, residual: f64 },

    /// Returned when the norm of the evolved state departs from 1 beyond
    /// tolerance. This indicates an internal defect rather than bad input.
    #[error("state normalization drifted to {norm:.12} at t = {t:.6e}")]
    NormalizationDrift { t: f64, norm: f64 },

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),

    /// [`LinalgError`].
    #[error("linalg error: {0}")]
    Linalg(#[from] LinalgError),
}

impl From<EigenError> for SimError {
    fn from(err: EigenError) -> Self {
        match err {
            EigenError::NonConvergence { sweeps, residual }
                => Self::NumericalNonConvergence { sweeps, residual },
            EigenError::Linalg(err) => Self::Linalg(err),
            EigenError::NotSquare(a, b) => Self::Length(LengthError(a, b)),
            bad @ (EigenError::BadEpsilon(_) | EigenError::BadMaxsweeps(_))
                => Self::InvalidParameter(bad.to_string()),
        }
    }
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Return `true` if `self` is `InvalidParameter`.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter(_))
    }

    /// Return `true` if `self` is `NumericalNonConvergence`.
    pub fn is_non_convergence(&self) -> bool {
        matches!(self, Self::NumericalNonConvergence { .. })
    }
}

pub type SimResult<T> = Result<T, SimError>;
