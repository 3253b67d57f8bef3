//! Assembly of the forced Hamiltonian in the box basis.
//!
//! For a linear potential *V*(*x*) = *f* *x*, the Hamiltonian in the truncated
//! box basis is
//! ```text
//! H = diag(E) + f X
//! ```
//! where *E* are the unperturbed box energies and *X* is the position matrix.

use ndarray as nd;
use crate::{
    Arr1,
    Arr2,
    basis::BoxBasis,
    error::LengthError,
};

/// Form `diag(energies) + f * X`.
///
/// Fails if `X` is not a square matrix matching the length of `energies`.
pub fn assemble<S, T>(energies: &Arr1<S>, X: &Arr2<T>, f: f64)
    -> Result<nd::Array2<f64>, LengthError>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    LengthError::check_square(X, energies.len())?;
    let mut H: nd::Array2<f64> = X.mapv(|xij| f * xij);
    H.diag_mut().iter_mut().zip(energies)
        .for_each(|(hii, ei)| { *hii += ei; });
    Ok(H)
}

/// Thin interface to [`assemble`] for a [`BoxBasis`] and a pre-computed
/// position matrix.
pub fn box_hamiltonian<S>(basis: &BoxBasis, X: &Arr2<S>, f: f64)
    -> Result<nd::Array2<f64>, LengthError>
where S: nd::Data<Elem = f64>
{
    assemble(basis.get_energies(), X, f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_force_is_diagonal() {
        let basis = BoxBasis::new(1.0, 1.0, 5).unwrap();
        let X = basis.position_matrix();
        let H = box_hamiltonian(&basis, &X, 0.0).unwrap();
        let expected = nd::Array2::from_diag(basis.get_energies());
        assert_eq!(H, expected);
    }

    #[test]
    fn forced_is_symmetric_with_shifted_diagonal() {
        let l = 2.0;
        let f = -0.75;
        let basis = BoxBasis::new(l, 1.0, 7).unwrap();
        let X = basis.position_matrix();
        let H = box_hamiltonian(&basis, &X, f).unwrap();
        for ((i, j), &hij) in H.indexed_iter() {
            assert_eq!(hij, H[[j, i]]);
            if i == j {
                let expected = basis.get_energies()[i] + f * l / 2.0;
                assert!((hij - expected).abs() < 1e-12);
            } else {
                assert_eq!(hij, f * X[[i, j]]);
            }
        }
    }

    #[test]
    fn mismatched_sizes() {
        let e = nd::array![1.0, 2.0, 3.0];
        let X = nd::Array2::<f64>::zeros((2, 2));
        assert!(assemble(&e, &X, 1.0).is_err());
    }
}
