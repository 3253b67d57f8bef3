//! Eigendecomposition of real symmetric matrices.
//!
//! The default solver is the cyclic Jacobi method, which is simple, needs no
//! external backend, and produces eigenvectors that are orthonormal to machine
//! precision for the moderate matrix sizes used here. A LAPACK-backed solver
//! (via [`ndarray_linalg`]) is available as an alternative.

use std::cmp;
use ndarray as nd;
use ndarray_linalg::{ self as la, EighInto };
use crate::{
    Arr2,
    error::EigenError,
    utils::orthonormality_error,
    DEF_EPSILON,
    DEF_MAXSWEEPS,
};

pub type EigenResult<T> = Result<T, EigenError>;

/// Eigenpairs of a real symmetric matrix.
///
/// Eigenvalues are sorted in ascending order and `states.column(j)` is the
/// normalized eigenvector belonging to `energies[j]`. The sign of each
/// eigenvector is fixed so that its largest-magnitude component is positive.
#[derive(Clone, Debug)]
pub struct Spectrum {
    /// Eigenvalues, ascending.
    pub energies: nd::Array1<f64>,
    /// Eigenvectors as columns.
    pub states: nd::Array2<f64>,
}

impl Spectrum {
    /// Dimension of the decomposed space.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.energies.len() }

    /// Largest absolute deviation of `V^T V` from the identity.
    pub fn orthonormality_error(&self) -> f64 {
        orthonormality_error(&self.states)
    }

    /// Reassemble `V diag(E) V^T`.
    pub fn reconstruct(&self) -> nd::Array2<f64> {
        let scaled = &self.states * &self.energies;
        scaled.dot(&self.states.t())
    }

    /// Smallest gap between adjacent eigenvalues, or `None` for a
    /// one-dimensional space.
    pub fn min_gap(&self) -> Option<f64> {
        self.energies.iter().zip(self.energies.iter().skip(1))
            .map(|(ek, ekp1)| ekp1 - ek)
            .min_by(|l, r| l.partial_cmp(r).unwrap_or(cmp::Ordering::Less))
    }

    // sort ascending and fix eigenvector signs
    fn canonicalize(energies: nd::Array1<f64>, states: nd::Array2<f64>)
        -> Self
    {
        let n = energies.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            energies[a].partial_cmp(&energies[b])
                .unwrap_or(cmp::Ordering::Equal)
        });
        let energies_sorted: nd::Array1<f64>
            = order.iter().map(|&j| energies[j]).collect();
        let mut states_sorted: nd::Array2<f64> = nd::Array2::zeros((n, n));
        let iter = order.iter().zip(states_sorted.columns_mut());
        for (&j, mut col) in iter {
            let src = states.column(j);
            let pivot
                = src.iter()
                .fold(0.0_f64, |acc, &v| if v.abs() > acc.abs() { v } else { acc });
            let sign = if pivot < 0.0 { -1.0 } else { 1.0 };
            col.assign(&src.mapv(|v| sign * v));
        }
        Self { energies: energies_sorted, states: states_sorted }
    }
}

/// Eigensolver selector and parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum SpectralMethod {
    /// Use the [cyclic Jacobi method][jacobi].
    Jacobi {
        /// Convergence threshold on the off-diagonal Frobenius norm relative
        /// to the full norm (default: `1e-14`).
        epsilon: Option<f64>,
        /// Maximum number of full sweeps (default: `100`).
        maxsweeps: Option<usize>,
    },
    /// Use the [LAPACK driver][lapack] for dense symmetric matrices.
    Lapack,
}

impl Default for SpectralMethod {
    fn default() -> Self { Self::Jacobi { epsilon: None, maxsweeps: None } }
}

impl SpectralMethod {
    /// Return `true` if `self` is `Jacobi`.
    pub fn is_jacobi(&self) -> bool {
        matches!(self, Self::Jacobi { .. })
    }

    /// Return `true` if `self` is `Lapack`.
    pub fn is_lapack(&self) -> bool {
        matches!(self, Self::Lapack)
    }
}

fn off_norm_sqr<S>(a: &Arr2<S>) -> f64
where S: nd::Data<Elem = f64>
{
    a.indexed_iter()
        .filter(|((i, j), _)| i != j)
        .map(|(_, aij)| aij * aij)
        .sum()
}

// apply a single Jacobi rotation annihilating a[p, q]
//
// the rotation angle is computed in the numerically stable form
//   θ = (a[q, q] - a[p, p]) / (2 a[p, q])
//   t = sgn(θ) / (|θ| + √(θ² + 1))
// so that |t| ≤ 1 and the rotated diagonal absorbs ±t a[p, q]
fn rotate(a: &mut nd::Array2<f64>, v: &mut nd::Array2<f64>, p: usize, q: usize) {
    let apq = a[[p, q]];
    if apq == 0.0 { return; }
    let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
    let t
        = if theta.is_infinite() {
            0.5 / theta
        } else {
            theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt())
        };
    let c = (t * t + 1.0).sqrt().recip();
    let s = t * c;
    let n = a.nrows();
    for k in 0..n {
        let akp = a[[k, p]];
        let akq = a[[k, q]];
        a[[k, p]] = c * akp - s * akq;
        a[[k, q]] = s * akp + c * akq;
    }
    for k in 0..n {
        let apk = a[[p, k]];
        let aqk = a[[q, k]];
        a[[p, k]] = c * apk - s * aqk;
        a[[q, k]] = s * apk + c * aqk;
    }
    a[[p, q]] = 0.0;
    a[[q, p]] = 0.0;
    for k in 0..n {
        let vkp = v[[k, p]];
        let vkq = v[[k, q]];
        v[[k, p]] = c * vkp - s * vkq;
        v[[k, q]] = s * vkp + c * vkq;
    }
}

/// Diagonalize a real symmetric matrix with the cyclic Jacobi method.
///
/// Sweeps over all upper-triangular elements are repeated until the
/// off-diagonal Frobenius norm falls below `epsilon` times the full norm (or
/// the matrix is exactly diagonal), failing with
/// [`EigenError::NonConvergence`] after `maxsweeps` sweeps. Only the symmetric
/// part of `a` is used.
///
/// ```
/// use ndarray as nd;
/// use ehrenfest::eigen::jacobi;
///
/// let a = nd::array![[2.0, 1.0], [1.0, 2.0]];
/// let spec = jacobi(&a, 1e-14, 100).unwrap();
/// assert!((spec.energies[0] - 1.0).abs() < 1e-12);
/// assert!((spec.energies[1] - 3.0).abs() < 1e-12);
/// assert!(spec.orthonormality_error() < 1e-12);
/// ```
pub fn jacobi<S>(a: &Arr2<S>, epsilon: f64, maxsweeps: usize)
    -> EigenResult<Spectrum>
where S: nd::Data<Elem = f64>
{
    EigenError::check_epsilon(epsilon)?;
    EigenError::check_maxsweeps(maxsweeps)?;
    let (nr, nc) = a.dim();
    if nr != nc { return Err(EigenError::NotSquare(nr, nc)); }
    let n = nr;

    // symmetrize so that rounding asymmetries in the input cannot bias the
    // rotations
    let mut w: nd::Array2<f64> = (a + &a.t()) / 2.0;
    let mut v: nd::Array2<f64> = nd::Array2::eye(n);
    let total: f64 = w.iter().map(|x| x * x).sum();
    let threshold = epsilon.powi(2) * total;
    let mut off = off_norm_sqr(&w);
    let mut sweeps: usize = 0;
    while off > threshold && off > 0.0 {
        if sweeps >= maxsweeps {
            return Err(EigenError::NonConvergence {
                sweeps,
                residual: off.sqrt(),
            });
        }
        for p in 0..n.saturating_sub(1) {
            for q in p + 1..n {
                rotate(&mut w, &mut v, p, q);
            }
        }
        sweeps += 1;
        off = off_norm_sqr(&w);
    }
    log::debug!(
        "eigen::jacobi: converged in {} sweeps for n = {} (off-diagonal norm {:.3e})",
        sweeps, n, off.sqrt(),
    );
    Ok(Spectrum::canonicalize(w.diag().to_owned(), v))
}

/// Diagonalize a real symmetric matrix with LAPACK's dense symmetric driver.
///
/// Only the lower triangle of `a` is referenced.
pub fn lapack<S>(a: &Arr2<S>) -> EigenResult<Spectrum>
where S: nd::Data<Elem = f64>
{
    let (nr, nc) = a.dim();
    if nr != nc { return Err(EigenError::NotSquare(nr, nc)); }
    let (evals, evecs): (nd::Array1<f64>, nd::Array2<f64>)
        = a.to_owned().eigh_into(la::UPLO::Lower)?;
    Ok(Spectrum::canonicalize(evals, evecs))
}

/// Master solving function for all [methods][SpectralMethod].
pub fn solve<S>(a: &Arr2<S>, method: &SpectralMethod) -> EigenResult<Spectrum>
where S: nd::Data<Elem = f64>
{
    match method {
        SpectralMethod::Jacobi { epsilon, maxsweeps } => {
            jacobi(
                a,
                epsilon.unwrap_or(DEF_EPSILON),
                maxsweeps.unwrap_or(DEF_MAXSWEEPS),
            )
        },
        SpectralMethod::Lapack => lapack(a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_matrix(n: usize) -> nd::Array2<f64> {
        nd::Array2::from_shape_fn((n, n), |(i, j)| {
            if i == j {
                (i + 1) as f64
            } else {
                1.0 / (1.0 + (i as f64 - j as f64).abs())
            }
        })
    }

    #[test]
    fn jacobi_diagonal_input_needs_no_sweeps() {
        let a = nd::Array2::from_diag(&nd::array![3.0, 1.0, 2.0]);
        let spec = jacobi(&a, 1e-14, 1).unwrap();
        assert_eq!(spec.energies, nd::array![1.0, 2.0, 3.0]);
        assert!(spec.orthonormality_error() < 1e-15);
        assert_eq!(spec.states.column(0), nd::array![0.0, 1.0, 0.0]);
    }

    #[test]
    fn jacobi_reconstructs_input() {
        let a = test_matrix(12);
        let spec = jacobi(&a, 1e-14, 100).unwrap();
        assert!(spec.orthonormality_error() < 1e-10);
        let r = spec.reconstruct();
        let err = (&r - &a).iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
        assert!(err < 1e-10);
        assert!(spec.energies.iter().zip(spec.energies.iter().skip(1))
            .all(|(a, b)| a <= b));
    }

    #[test]
    fn jacobi_matches_lapack() {
        let a = test_matrix(16);
        let sj = jacobi(&a, 1e-14, 100).unwrap();
        let sl = lapack(&a).unwrap();
        for (ej, el) in sj.energies.iter().zip(&sl.energies) {
            assert!((ej - el).abs() < 1e-10);
        }
        for (cj, cl) in sj.states.columns().into_iter().zip(sl.states.columns()) {
            assert!((cj.dot(&cl).abs() - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn jacobi_non_convergence_is_reported() {
        let a = test_matrix(10);
        let err = jacobi(&a, 1e-14, 1).unwrap_err();
        assert!(matches!(err, EigenError::NonConvergence { sweeps: 1, .. }));
    }

    #[test]
    fn bad_settings() {
        let a = test_matrix(3);
        assert!(matches!(jacobi(&a, 0.0, 10), Err(EigenError::BadEpsilon(_))));
        assert!(matches!(jacobi(&a, 1e-12, 0), Err(EigenError::BadMaxsweeps(0))));
        let r = nd::Array2::<f64>::zeros((2, 3));
        assert!(matches!(jacobi(&r, 1e-12, 10), Err(EigenError::NotSquare(2, 3))));
    }

    #[test]
    fn single_element() {
        let a = nd::array![[4.5]];
        let spec = solve(&a, &SpectralMethod::default()).unwrap();
        assert_eq!(spec.energies, nd::array![4.5]);
        assert_eq!(spec.states, nd::array![[1.0]]);
        assert!(spec.min_gap().is_none());
    }
}
