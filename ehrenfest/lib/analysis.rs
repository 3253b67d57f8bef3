//! Tools to compare sampled trajectories: local Lagrange interpolation,
//! numerical time derivatives, level crossings, and deviation norms.
//!
//! ```
//! use ndarray as nd;
//! use ehrenfest::analysis::{ Crossing, crossings };
//!
//! let t: nd::Array1<f64> = nd::Array::linspace(0.0, 10.0, 1000);
//! let y = t.mapv(f64::cos);
//! let down = crossings(&t, &y, 0.0, Crossing::Falling).unwrap();
//! let expected = [std::f64::consts::FRAC_PI_2, 5.0 * std::f64::consts::FRAC_PI_2];
//! assert_eq!(down.len(), 2);
//! assert!(
//!     expected.into_iter()
//!         .zip(down)
//!         .all(|(e, c)| (c - e).abs() < 1e-6)
//! );
//! ```

use std::cmp;
use ndarray as nd;
use num_traits::Num;
use crate::{
    error::{ AnalysisError, LengthError, StencilError },
    utils::trapz,
};

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Number of points in the derivative stencil.
pub const STENCIL: usize = 5;

/// Specifies a set of level crossings to look for in [`crossings`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Crossing {
    /// Points at which a signal passes the level from above.
    Falling,
    /// Points at which a signal passes the level from below.
    Rising,
    /// Either/both of the above.
    All,
}

impl Crossing {
    // whether the interval from a to b (relative to the level) is a crossing
    // of this kind; intervals are half-open on the left so that a sample lying
    // exactly on the level is counted once
    fn matches(&self, a: f64, b: f64) -> bool {
        let falling = a > 0.0 && b <= 0.0;
        let rising = a < 0.0 && b >= 0.0;
        match self {
            Self::Falling => falling,
            Self::Rising => rising,
            Self::All => falling || rising,
        }
    }
}

/// Compute the value of a sampled function at `x` via a Lagrange polynomial
/// through all given points.
pub fn lagrange<S, T, A>(
    data_x: &nd::ArrayBase<S, nd::Ix1>,
    data_y: &nd::ArrayBase<T, nd::Ix1>,
    x: A,
) -> Result<A, LengthError>
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Num + Copy,
{
    LengthError::check(data_x, data_y)?;
    let res: A
        = data_x.iter().zip(data_y).enumerate()
        .map(|(j, (&xj, &yj))| {
            let inner
                = data_x.iter().enumerate()
                .filter(|(m, _)| *m != j)
                .map(|(_, &xm)| (x - xm) / (xj - xm))
                .fold(A::one(), A::mul);
            yj * inner
        })
        .fold(A::zero(), A::add);
    Ok(res)
}

/// Compute the derivative at `x` of the Lagrange polynomial through all given
/// points.
pub fn dlagrange<S, T, A>(
    data_x: &nd::ArrayBase<S, nd::Ix1>,
    data_y: &nd::ArrayBase<T, nd::Ix1>,
    x: A,
) -> Result<A, LengthError>
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Num + Copy,
{
    LengthError::check(data_x, data_y)?;
    let res: A
        = data_x.iter().zip(data_y).enumerate()
        .map(|(j, (&xj, &yj))| {
            let inner
                = data_x.iter().enumerate()
                .filter(|(i, _)| *i != j)
                .map(|(i, &xi)| {
                    data_x.iter().enumerate()
                        .filter(|(m, _)| *m != j && *m != i)
                        .map(|(_, &xm)| (x - xm) / (xj - xm))
                        .fold(A::one(), A::mul)
                        / (xj - xi)
                })
                .fold(A::zero(), A::add);
            yj * inner
        })
        .fold(A::zero(), A::add);
    Ok(res)
}

/// Differentiate a sampled signal `y(t)` at every sample using five-point
/// Lagrange stencils.
///
/// Stencils are centered where possible and shifted inward near the ends of
/// the data, so the result has the same length as the input. Requires at
/// least five samples.
pub fn derivative<S, T>(t: &nd::ArrayBase<S, nd::Ix1>, y: &nd::ArrayBase<T, nd::Ix1>)
    -> AnalysisResult<nd::Array1<f64>>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    LengthError::check(t, y)?;
    StencilError::check(t, STENCIL)?;
    let n = t.len();
    let half = STENCIL / 2;
    let dy: nd::Array1<f64>
        = t.iter().enumerate()
        .map(|(i, &ti)| {
            let il = cmp::min(i.saturating_sub(half), n - STENCIL);
            let ir = il + STENCIL;
            dlagrange(&t.slice(nd::s![il..ir]), &y.slice(nd::s![il..ir]), ti)
        })
        .collect::<Result<_, LengthError>>()?;
    Ok(dy)
}

/// Return the times at which a sampled signal crosses `level`, in the
/// direction(s) given by `kind`.
///
/// Each crossing is located by inverse Lagrange interpolation over the four
/// samples surrounding it, falling back to linear interpolation where the
/// signal is not monotonic over those samples. The signal should be resolved
/// on the scale of a few samples.
pub fn crossings<S, T>(
    t: &nd::ArrayBase<S, nd::Ix1>,
    y: &nd::ArrayBase<T, nd::Ix1>,
    level: f64,
    kind: Crossing,
) -> AnalysisResult<Vec<f64>>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    LengthError::check(t, y)?;
    StencilError::check(t, 2)?;
    let n = t.len();
    let shifted: nd::Array1<f64> = y.mapv(|yk| yk - level);
    let mut found: Vec<f64> = Vec::new();
    for i in 0..n - 1 {
        let (a, b) = (shifted[i], shifted[i + 1]);
        if !kind.matches(a, b) { continue; }
        if b == 0.0 {
            found.push(t[i + 1]);
            continue;
        }
        let il = i.saturating_sub(1);
        let ir = cmp::min(n, i + 3);
        let window = shifted.slice(nd::s![il..ir]);
        let monotonic
            = window.iter().zip(window.iter().skip(1))
            .all(|(u, v)| if a < b { u < v } else { u > v });
        let tc
            = if monotonic && ir - il > 2 {
                lagrange(&window, &t.slice(nd::s![il..ir]), 0.0)?
            } else {
                t[i] + (t[i + 1] - t[i]) * a / (a - b)
            };
        found.push(tc.clamp(t[i], t[i + 1]));
    }
    Ok(found)
}

/// Return the largest absolute difference between two equal-length signals.
pub fn max_deviation<S, T>(a: &nd::ArrayBase<S, nd::Ix1>, b: &nd::ArrayBase<T, nd::Ix1>)
    -> Result<f64, LengthError>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    LengthError::check(a, b)?;
    Ok(a.iter().zip(b).map(|(ak, bk)| (ak - bk).abs()).fold(0.0, f64::max))
}

/// Return the root-mean-square difference between two equal-length signals.
pub fn rms_deviation<S, T>(a: &nd::ArrayBase<S, nd::Ix1>, b: &nd::ArrayBase<T, nd::Ix1>)
    -> Result<f64, LengthError>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    LengthError::check(a, b)?;
    if a.is_empty() { return Ok(0.0); }
    let ssq: f64 = a.iter().zip(b).map(|(ak, bk)| (ak - bk).powi(2)).sum();
    Ok((ssq / a.len() as f64).sqrt())
}

/// Time average of a signal sampled with uniform spacing `dt`, via the
/// trapezoidal rule.
pub fn time_average<S>(y: &nd::ArrayBase<S, nd::Ix1>, dt: f64)
    -> AnalysisResult<f64>
where S: nd::Data<Elem = f64>
{
    StencilError::check(y, 2)?;
    Ok(trapz(y, dt) / (dt * (y.len() - 1) as f64))
}
