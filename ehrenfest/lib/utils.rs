//! Miscellaneous tools.

use std::ops::Add;
use ndarray::{ self as nd, Ix1 };
use ndarray_linalg::Scalar;
use num_traits::{ One, Zero };
use num_complex::Complex64 as C64;
use crate::Arr2;

/// Integrate using the trapezoidal rule.
///
/// *Panics if `y` has length less than 2*.
pub fn trapz<S, A>(y: &nd::ArrayBase<S, Ix1>, dx: A) -> A
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    let n: usize = y.len();
    let two = A::one() + A::one();
    (dx / two) * (y[0] + two * y.slice(nd::s![1..n - 1]).sum() + y[n - 1])
}

/// Integrate a function over `[a, b]` using the composite Simpson rule on
/// `n` subintervals.
///
/// `n` is rounded up to the nearest even number (and at least 2).
pub fn simpson<F, A>(mut f: F, a: f64, b: f64, n: usize) -> A
where
    F: FnMut(f64) -> A,
    A: Scalar<Real = f64>,
{
    let n = if n < 2 { 2 } else { n + n % 2 };
    let dx = (b - a) / n as f64;
    let two = A::one() + A::one();
    let four = two + two;
    let interior: A
        = (1..n)
        .map(|i| {
            let fi = f(a + i as f64 * dx);
            if i % 2 == 1 { four * fi } else { two * fi }
        })
        .fold(A::zero(), |acc, term| acc + term);
    A::from_real(dx / 3.0) * (f(a) + interior + f(b))
}

/// Calculate the squared norm of a coefficient vector.
pub fn norm_sqr<S, A>(q: &nd::ArrayBase<S, Ix1>) -> A::Real
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    q.iter()
        .map(|qk| qk.square())
        .fold(<A as Scalar>::Real::zero(), <A as Scalar>::Real::add)
}

/// Renormalize a coefficient vector to unit norm in place, returning the
/// squared norm it had beforehand.
pub fn renormalize<S, A>(q: &mut nd::ArrayBase<S, Ix1>) -> A::Real
where
    S: nd::DataMut<Elem = A>,
    A: Scalar,
{
    let nsq = norm_sqr(q);
    let norm = A::from_real(nsq.sqrt());
    q.iter_mut().for_each(|qk| { *qk /= norm; });
    nsq
}

/// Compute the expectation value `c† M c` of a real symmetric matrix `M` in
/// the (complex) state `c`.
///
/// Only the real part is returned; the imaginary part vanishes identically for
/// symmetric `M`.
pub fn expectation_sym<S, T>(M: &Arr2<S>, c: &nd::ArrayBase<T, Ix1>) -> f64
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = C64>,
{
    M.outer_iter().zip(c)
        .map(|(row, ci)| {
            let mc: C64
                = row.iter().zip(c)
                .map(|(&mij, &cj)| mij * cj)
                .sum();
            (ci.conj() * mc).re
        })
        .sum()
}

/// Compute `c† (-i D) c` for a real antisymmetric matrix `D`, which is the
/// expectation value of the Hermitian operator `-i D` in the state `c`.
pub fn expectation_antisym<S, T>(D: &Arr2<S>, c: &nd::ArrayBase<T, Ix1>) -> f64
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = C64>,
{
    let cdc: C64
        = D.outer_iter().zip(c)
        .map(|(row, ci)| {
            let dc: C64
                = row.iter().zip(c)
                .map(|(&dij, &cj)| dij * cj)
                .sum();
            ci.conj() * dc
        })
        .sum();
    (-C64::i() * cdc).re
}

/// Return an array of differences between adjacent elements of a source
/// array.
pub fn array_diff<S, A>(a: &nd::ArrayBase<S, Ix1>) -> nd::Array1<A>
where
    S: nd::Data<Elem = A>,
    A: std::ops::Sub<A, Output = A> + Copy,
{
    a.iter().zip(a.iter().skip(1))
        .map(|(ak, akp1)| *akp1 - *ak)
        .collect()
}

/// Return the largest absolute deviation of `V^T V` from the identity.
pub fn orthonormality_error<S>(V: &Arr2<S>) -> f64
where S: nd::Data<Elem = f64>
{
    let g = V.t().dot(V);
    g.indexed_iter()
        .map(|((i, j), gij)| {
            let target = if i == j { f64::one() } else { f64::zero() };
            (gij - target).abs()
        })
        .fold(0.0, f64::max)
}
