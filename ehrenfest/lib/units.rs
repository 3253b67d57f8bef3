#![allow(non_upper_case_globals)]

//! Physical constants and the scale factors that map a concrete problem onto
//! the engine's natural units.
//!
//! Every routine in this crate takes and returns quantities in units where
//! [`HBAR`] `= 1`, the particle mass is the unit of mass, and some chosen
//! length is the unit of length. Constants are CODATA 2018 values as published
//! by NIST.

use std::f64::consts::TAU;

/// ħ in the engine's natural units.
pub const HBAR: f64 = 1.0;

/// Planck constant (J s); exact
pub const h: f64 = 6.62607015e-34;

/// reduced Planck constant (J s); exact
pub const hbar: f64 = h / TAU;

/// elementary charge (C); exact
pub const e: f64 = 1.602176634e-19;

/// electron mass (kg); ± 2.8e-40
pub const me: f64 = 9.1093837015e-31;

/// proton mass (kg); ± 5.1e-37
pub const mp: f64 = 1.67262192369e-27;

/// Scale factors for a particle of mass `m` with length unit `a`, each
/// expressed in the base unit system it was built from.
///
/// The derived scales are
/// ```text
/// energy    e = ħ² / (m a²)
/// time      t = ħ / e
/// force     f = e / a
/// momentum  p = ħ / a
/// velocity  v = a / t
/// ```
/// so that a box of natural width *L* has energies *n*²π²/(2 *L*²).
///
/// See [`docs/units`][crate::docs#units] for more information.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Units {
    /// Mass unit.
    pub m: f64,
    /// Length unit.
    pub a: f64,
    /// Energy unit.
    pub e: f64,
    /// Time unit.
    pub t: f64,
    /// Force unit.
    pub f: f64,
    /// Momentum unit.
    pub p: f64,
    /// Velocity unit.
    pub v: f64,
}

// conversions in both directions for one scale field
macro_rules! conversions {
    ( $( $field:ident : $to:ident, $from:ident, $what:literal );* $(;)? ) => {
        $(
            #[doc = concat!("Express a ", $what, " given in the base unit system in natural units.")]
            pub fn $to<T, U>(&self, x: T) -> U
            where T: std::ops::Mul<f64, Output = U>
            {
                x * self.$field.recip()
            }

            #[doc = concat!("Express a ", $what, " given in natural units in the base unit system.")]
            pub fn $from<T, U>(&self, x: T) -> U
            where T: std::ops::Mul<f64, Output = U>
            {
                x * self.$field
            }
        )*
    }
}

impl Units {
    fn with_hbar(hbar_base: f64, mass: f64, a: f64) -> Self {
        let energy = hbar_base.powi(2) / (mass * a.powi(2));
        let time = hbar_base / energy;
        Self {
            m: mass,
            a,
            e: energy,
            t: time,
            f: energy / a,
            p: hbar_base / a,
            v: a / time,
        }
    }

    /// Scales for a mass in kilograms and a length in meters.
    pub fn from_mks(mass: f64, a: f64) -> Self {
        Self::with_hbar(hbar, mass, a)
    }

    /// Scales for a mass in electron masses and a length in Bohr radii. The
    /// base system is then atomic units, where ħ = 1 already.
    pub fn from_au(mass: f64, a: f64) -> Self {
        Self::with_hbar(1.0, mass, a)
    }

    conversions!(
        a: to_nat_length, from_nat_length, "length";
        m: to_nat_mass, from_nat_mass, "mass";
        e: to_nat_energy, from_nat_energy, "energy";
        t: to_nat_time, from_nat_time, "time";
        f: to_nat_force, from_nat_force, "force";
        p: to_nat_momentum, from_nat_momentum, "momentum";
        v: to_nat_velocity, from_nat_velocity, "velocity";
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mks_scales_are_consistent() {
        let uu = Units::from_mks(me, 1e-9);
        assert!((uu.e * uu.t / hbar - 1.0).abs() < 1e-12);
        assert!((uu.f * uu.a / uu.e - 1.0).abs() < 1e-12);
        assert!((uu.p / (uu.m * uu.v) - 1.0).abs() < 1e-12);
        let m: f64 = uu.to_nat_mass(me);
        assert!((m - 1.0).abs() < 1e-12);
    }

    #[test]
    fn atomic_units_for_electron_at_bohr_scale() {
        let uu = Units::from_au(1.0, 1.0);
        assert_eq!(uu.e, 1.0);
        assert_eq!(uu.t, 1.0);
        assert_eq!(uu.f, 1.0);
        assert_eq!(uu.p, 1.0);
        assert_eq!(uu.v, 1.0);
    }

    #[test]
    fn time_conversion_inverts() {
        let uu = Units::from_mks(mp, 1e-10);
        let t: f64 = uu.from_nat_time(uu.to_nat_time(3.5e-13));
        assert!((t / 3.5e-13 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn box_ground_state_in_electron_volts() {
        // an electron in a 1 nm box has E₁ ≈ 0.376 eV
        let uu = Units::from_mks(me, 1e-9);
        let e1_nat = std::f64::consts::PI.powi(2) / 2.0;
        let e1_ev: f64 = uu.from_nat_energy(e1_nat) / e;
        assert!((e1_ev - 0.376).abs() < 1e-3);
    }
}
