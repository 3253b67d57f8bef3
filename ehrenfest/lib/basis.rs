//! Eigenmodes of the infinite square well on `[0, l]` and the analytic matrix
//! elements of position and momentum between them.
//!
//! All matrix elements are computed in closed form; no quadrature is involved,
//! so the parity selection rule (⟨*n*|x̂|*n'*⟩ = 0 for *n* ≠ *n'* with *n* + *n'*
//! even) holds exactly.

use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    error::{ LengthError, SimError, SimResult },
    units::HBAR,
};

/// Energy *E*ₙ = *n*²π²ħ²/(2 *m* *l*²) of the `n`-th box eigenmode (`n ≥ 1`).
pub fn box_energy(n: usize, l: f64, m: f64) -> f64 {
    (n as f64 * PI * HBAR / l).powi(2) / (2.0 * m)
}

/// Position matrix element ⟨*n*|x̂|*n'*⟩ for a box of width `l`.
///
/// ```text
/// ⟨n|x|n⟩  = l / 2
/// ⟨n|x|n'⟩ = -8 l n n' / (π² (n² - n'²)²)   (n + n' odd)
/// ⟨n|x|n'⟩ = 0                              (n + n' even, n ≠ n')
/// ```
pub fn position_element(n: usize, np: usize, l: f64) -> f64 {
    if n == np {
        l / 2.0
    } else if (n + np) % 2 == 0 {
        0.0
    } else {
        let (a, b) = (n as f64, np as f64);
        -8.0 * l * a * b / (PI * PI * (a * a - b * b).powi(2))
    }
}

/// Matrix element ⟨*n*|∂/∂x|*n'*⟩ for a box of width `l`.
///
/// ```text
/// ⟨n|∂ₓ|n'⟩ = 4 n n' / (l (n² - n'²))   (n + n' odd)
/// ⟨n|∂ₓ|n'⟩ = 0                         (otherwise)
/// ```
pub fn derivative_element(n: usize, np: usize, l: f64) -> f64 {
    if (n + np) % 2 == 0 {
        0.0
    } else {
        let (a, b) = (n as f64, np as f64);
        4.0 * a * b / (l * (a * a - b * b))
    }
}

/// A single eigenmode of the box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mode {
    /// Quantum number, starting from 1.
    pub n: usize,
    /// Eigenenergy.
    pub energy: f64,
    /// Box width.
    pub l: f64,
}

impl Mode {
    /// Evaluate the eigenfunction √(2/*l*) sin(*n*π*x*/*l*) at `x`.
    ///
    /// Returns zero outside `[0, l]`.
    pub fn eval(&self, x: f64) -> f64 {
        if !(0.0..=self.l).contains(&x) { return 0.0; }
        (2.0 / self.l).sqrt() * (self.n as f64 * PI * x / self.l).sin()
    }
}

/// The first `k` eigenmodes of a particle of mass `m` in a box of width `l`.
///
/// Immutable once built. Vector and matrix indices `i` correspond to quantum
/// numbers `n = i + 1`.
#[derive(Clone, Debug)]
pub struct BoxBasis {
    l: f64,
    m: f64,
    energies: nd::Array1<f64>,
}

impl BoxBasis {
    /// Build the basis.
    ///
    /// Fails with [`SimError::InvalidParameter`] if `l` or `m` is not finite
    /// and positive, or if `k` is zero.
    pub fn new(l: f64, m: f64, k: usize) -> SimResult<Self> {
        if !l.is_finite() || l <= 0.0 {
            return Err(SimError::invalid(
                format!("box width must be finite and positive; got {}", l)));
        }
        if !m.is_finite() || m <= 0.0 {
            return Err(SimError::invalid(
                format!("mass must be finite and positive; got {}", m)));
        }
        if k < 1 {
            return Err(SimError::invalid("basis size must be at least 1"));
        }
        let energies: nd::Array1<f64>
            = (1..=k).map(|n| box_energy(n, l, m)).collect();
        Ok(Self { l, m, energies })
    }

    /// Number of modes.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.energies.len() }

    /// Box width.
    pub fn get_l(&self) -> f64 { self.l }

    /// Particle mass.
    pub fn get_m(&self) -> f64 { self.m }

    /// Get a reference to the mode energies, ordered by quantum number.
    pub fn get_energies(&self) -> &nd::Array1<f64> { &self.energies }

    /// Get the mode with quantum number `n`, if it is part of the basis.
    pub fn mode(&self, n: usize) -> Option<Mode> {
        (1..=self.len()).contains(&n)
            .then(|| Mode { n, energy: self.energies[n - 1], l: self.l })
    }

    /// Iterate over all modes in order of increasing quantum number.
    pub fn modes(&self) -> impl Iterator<Item = Mode> + '_ {
        let l = self.l;
        self.energies.iter().enumerate()
            .map(move |(i, &energy)| Mode { n: i + 1, energy, l })
    }

    /// Matrix of ⟨*n*|x̂|*n'*⟩.
    ///
    /// Symmetric, with every diagonal element equal to `l / 2`.
    pub fn position_matrix(&self) -> nd::Array2<f64> {
        let k = self.len();
        nd::Array2::from_shape_fn(
            (k, k), |(i, j)| position_element(i + 1, j + 1, self.l))
    }

    /// Matrix `D` of ⟨*n*|∂/∂x|*n'*⟩, so that p̂ = -iħD.
    ///
    /// Real and antisymmetric.
    pub fn derivative_matrix(&self) -> nd::Array2<f64> {
        let k = self.len();
        nd::Array2::from_shape_fn(
            (k, k), |(i, j)| derivative_element(i + 1, j + 1, self.l))
    }

    /// Reconstruct the wavefunction ψ(*x*) = Σₙ *c*ₙ φₙ(*x*) from coefficients
    /// over this basis.
    pub fn wavefunction<S>(&self, c: &Arr1<S>, x: f64) -> SimResult<C64>
    where S: nd::Data<Elem = C64>
    {
        LengthError::check(c, &self.energies)?;
        let psi: C64
            = self.modes().zip(c)
            .map(|(mode, &cn)| cn * mode.eval(x))
            .sum();
        Ok(psi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::simpson;

    #[test]
    fn energies_scale_quadratically() {
        let basis = BoxBasis::new(2.0, 0.5, 6).unwrap();
        let e1 = basis.get_energies()[0];
        assert!((e1 - PI * PI / 4.0).abs() < 1e-12);
        for (i, &en) in basis.get_energies().iter().enumerate() {
            let n = (i + 1) as f64;
            assert!((en - n * n * e1).abs() < 1e-10 * en);
        }
    }

    #[test]
    fn modes_are_orthonormal() {
        let basis = BoxBasis::new(1.5, 1.0, 5).unwrap();
        for a in basis.modes() {
            for b in basis.modes() {
                let overlap: f64
                    = simpson(|x| a.eval(x) * b.eval(x), 0.0, 1.5, 4000);
                let expected = if a.n == b.n { 1.0 } else { 0.0 };
                assert!((overlap - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn position_matrix_matches_quadrature() {
        let l = 1.7;
        let basis = BoxBasis::new(l, 1.0, 6).unwrap();
        let X = basis.position_matrix();
        for a in basis.modes() {
            for b in basis.modes() {
                let xab: f64
                    = simpson(|x| a.eval(x) * x * b.eval(x), 0.0, l, 8000);
                assert!((X[[a.n - 1, b.n - 1]] - xab).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn position_matrix_parity_rule() {
        let l = 1.0;
        let basis = BoxBasis::new(l, 1.0, 12).unwrap();
        let X = basis.position_matrix();
        for ((i, j), &xij) in X.indexed_iter() {
            assert_eq!(xij, X[[j, i]]);
            if i == j {
                assert_eq!(xij, l / 2.0);
            } else if (i + j) % 2 == 0 {
                assert_eq!(xij, 0.0);
            } else {
                assert!(xij != 0.0);
            }
        }
    }

    #[test]
    fn derivative_matrix_matches_quadrature() {
        let l = 0.8;
        let basis = BoxBasis::new(l, 1.0, 5).unwrap();
        let D = basis.derivative_matrix();
        for a in basis.modes() {
            for b in basis.modes() {
                let kb = b.n as f64 * PI / l;
                let dphi_b = |x: f64| (2.0 / l).sqrt() * kb * (kb * x).cos();
                let dab: f64
                    = simpson(|x| a.eval(x) * dphi_b(x), 0.0, l, 8000);
                assert!((D[[a.n - 1, b.n - 1]] - dab).abs() < 1e-8);
                assert_eq!(D[[a.n - 1, b.n - 1]], -D[[b.n - 1, a.n - 1]]);
            }
        }
    }

    #[test]
    fn mode_lookup() {
        let basis = BoxBasis::new(1.0, 1.0, 3).unwrap();
        assert!(basis.mode(0).is_none());
        assert!(basis.mode(4).is_none());
        let m2 = basis.mode(2).unwrap();
        assert_eq!(m2.n, 2);
        assert!(m2.eval(0.5).abs() < 1e-12);
        assert_eq!(m2.eval(-0.1), 0.0);
        assert_eq!(basis.modes().count(), 3);
    }

    #[test]
    fn wavefunction_reconstruction() {
        let basis = BoxBasis::new(1.0, 1.0, 2).unwrap();
        let c = nd::array![C64::new(1.0, 0.0), C64::new(0.0, 0.0)];
        let psi = basis.wavefunction(&c, 0.5).unwrap();
        assert!((psi.re - 2.0_f64.sqrt()).abs() < 1e-12);
        let bad = nd::array![C64::new(1.0, 0.0)];
        assert!(basis.wavefunction(&bad, 0.5).is_err());
    }

    #[test]
    fn invalid_inputs() {
        assert!(BoxBasis::new(0.0, 1.0, 3).unwrap_err().is_invalid_parameter());
        assert!(BoxBasis::new(1.0, -1.0, 3).unwrap_err().is_invalid_parameter());
        assert!(BoxBasis::new(1.0, 1.0, 0).unwrap_err().is_invalid_parameter());
        assert!(BoxBasis::new(f64::INFINITY, 1.0, 3).is_err());
    }
}
