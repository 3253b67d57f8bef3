//! Classical motion of a point particle in `[0, l]` under the constant force of
//! a linear potential *V*(*x*) = *f* *x*, with elastic reflections at both
//! walls.
//!
//! Between reflections, the motion is advanced with a velocity-Verlet step,
//! which is exact for constant acceleration. Whenever the particle would cross
//! a wall within a step, the crossing time is found from the quadratic
//! trajectory, the particle is placed exactly on the wall with its velocity
//! reversed, and integration resumes for the remainder of the step.

use ndarray as nd;
use crate::{
    error::{ SimError, SimResult },
    grid::TimeGrid,
};

/// Maximum number of wall reflections handled within a single step before the
/// remainder of the step is abandoned.
pub const MAX_REFLECTIONS: usize = 1_000_000;

/// Position and velocity of the particle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClassicalState {
    /// Position.
    pub x: f64,
    /// Velocity.
    pub v: f64,
}

impl ClassicalState {
    /// Create a new state.
    pub fn new(x: f64, v: f64) -> Self { Self { x, v } }

    /// Total energy *m* *v*²/2 + *f* *x*.
    pub fn energy(&self, m: f64, f: f64) -> f64 {
        0.5 * m * self.v.powi(2) + f * self.x
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Wall { Lower, Upper }

// roots of a t² + b t + c = 0, computed without catastrophic cancellation
fn quadratic_roots(a: f64, b: f64, c: f64) -> [Option<f64>; 2] {
    if a == 0.0 {
        return if b == 0.0 { [None, None] } else { [Some(-c / b), None] };
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 { return [None, None]; }
    let sgn = if b < 0.0 { -1.0 } else { 1.0 };
    let q = -0.5 * (b + sgn * disc.sqrt());
    let r1 = q / a;
    let r2 = if q == 0.0 { None } else { Some(c / q) };
    [Some(r1), r2]
}

/// Integrates classical motion in a box under a constant force.
#[derive(Copy, Clone, Debug)]
pub struct ClassicalIntegrator {
    l: f64,
    m: f64,
    f: f64,
}

impl ClassicalIntegrator {
    /// Create a new integrator for a box of width `l`, mass `m`, and linear
    /// potential slope `f`.
    pub fn new(l: f64, m: f64, f: f64) -> SimResult<Self> {
        if !l.is_finite() || l <= 0.0 {
            return Err(SimError::invalid(
                format!("box width must be finite and positive; got {}", l)));
        }
        if !m.is_finite() || m <= 0.0 {
            return Err(SimError::invalid(
                format!("mass must be finite and positive; got {}", m)));
        }
        if !f.is_finite() {
            return Err(SimError::invalid(
                format!("force must be finite; got {}", f)));
        }
        Ok(Self { l, m, f })
    }

    /// Constant acceleration -*f*/*m*.
    pub fn acceleration(&self) -> f64 { -self.f / self.m }

    /// Total energy of a state.
    pub fn energy(&self, state: &ClassicalState) -> f64 {
        state.energy(self.m, self.f)
    }

    fn wall_position(&self, wall: Wall) -> f64 {
        match wall {
            Wall::Lower => 0.0,
            Wall::Upper => self.l,
        }
    }

    // earliest time in (0, horizon] at which the particle leaves through
    // `wall`
    fn crossing(&self, state: &ClassicalState, wall: Wall, horizon: f64)
        -> Option<f64>
    {
        let a = self.acceleration();
        let c = state.x - self.wall_position(wall);
        quadratic_roots(0.5 * a, state.v, c).into_iter()
            .flatten()
            .filter(|&tau| tau > 0.0 && tau <= horizon)
            .filter(|&tau| {
                let v = state.v + a * tau;
                match wall {
                    Wall::Lower => v < 0.0,
                    Wall::Upper => v > 0.0,
                }
            })
            .min_by(|l, r| l.total_cmp(r))
    }

    fn verlet(&self, state: &mut ClassicalState, dt: f64) {
        let a = self.acceleration();
        let v_half = state.v + 0.5 * a * dt;
        state.x += v_half * dt;
        state.v = v_half + 0.5 * a * dt;
    }

    /// Advance `state` by `dt` in place, returning the number of wall
    /// reflections that occurred.
    pub fn advance(&self, state: &mut ClassicalState, dt: f64) -> usize {
        let mut remaining = dt;
        let mut reflections: usize = 0;
        while remaining > 0.0 {
            let hit
                = [Wall::Lower, Wall::Upper].into_iter()
                .filter_map(|wall| {
                    self.crossing(state, wall, remaining).map(|tau| (tau, wall))
                })
                .min_by(|l, r| l.0.total_cmp(&r.0));
            match hit {
                Some((tau, wall)) => {
                    self.verlet(state, tau);
                    state.x = self.wall_position(wall);
                    state.v = -state.v;
                    remaining -= tau;
                    reflections += 1;
                    if reflections >= MAX_REFLECTIONS {
                        log::warn!(
                            "classical::advance: reached {} reflections within a single step; abandoning the remaining {:.3e}",
                            MAX_REFLECTIONS, remaining,
                        );
                        break;
                    }
                },
                None => {
                    self.verlet(state, remaining);
                    remaining = 0.0;
                },
            }
        }
        // guard against rounding placing the particle outside the box
        if state.x < 0.0 {
            state.x = 0.0;
            state.v = state.v.abs();
        } else if state.x > self.l {
            state.x = self.l;
            state.v = -state.v.abs();
        }
        reflections
    }

    /// Compute the state of the particle at every point of `grid`, starting
    /// from `initial` at `t = 0`.
    ///
    /// Fails if the initial state lies outside the box or is not finite.
    pub fn states(&self, initial: ClassicalState, grid: &TimeGrid)
        -> SimResult<Vec<ClassicalState>>
    {
        if !(0.0..=self.l).contains(&initial.x) {
            return Err(SimError::invalid(format!(
                "initial position must lie within [0, {}]; got {}",
                self.l, initial.x,
            )));
        }
        if !initial.v.is_finite() {
            return Err(SimError::invalid(
                format!("initial velocity must be finite; got {}", initial.v)));
        }
        let mut state = initial;
        let mut t_prev = grid.get_t()[0];
        let mut reflections: usize = 0;
        let states: Vec<ClassicalState>
            = grid.iter()
            .map(|t| {
                reflections += self.advance(&mut state, t - t_prev);
                t_prev = t;
                state
            })
            .collect();
        log::debug!(
            "classical::states: {} samples, {} reflections",
            states.len(), reflections,
        );
        Ok(states)
    }

    /// Compute the position of the particle at every point of `grid`.
    pub fn positions(&self, initial: ClassicalState, grid: &TimeGrid)
        -> SimResult<nd::Array1<f64>>
    {
        let states = self.states(initial, grid)?;
        Ok(states.into_iter().map(|s| s.x).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // position of a free particle bouncing in [0, l], by unfolding
    fn triangle(x0: f64, v: f64, l: f64, t: f64) -> f64 {
        let u = (x0 + v * t).rem_euclid(2.0 * l);
        if u <= l { u } else { 2.0 * l - u }
    }

    #[test]
    fn quadratic_roots_stable() {
        let mut r: Vec<f64>
            = quadratic_roots(1.0, -3.0, 2.0).into_iter().flatten().collect();
        r.sort_by(f64::total_cmp);
        assert_eq!(r, vec![1.0, 2.0]);
        assert_eq!(quadratic_roots(0.0, 2.0, -4.0), [Some(2.0), None]);
        assert_eq!(quadratic_roots(1.0, 0.0, 1.0), [None, None]);
    }

    #[test]
    fn at_rest_without_force() {
        let integ = ClassicalIntegrator::new(1.0, 1.0, 0.0).unwrap();
        let grid = TimeGrid::new(10.0, 101).unwrap();
        let xs = integ.positions(ClassicalState::new(0.5, 0.0), &grid).unwrap();
        assert!(xs.iter().all(|&x| x == 0.5));
    }

    #[test]
    fn free_bouncing_is_periodic() {
        let (l, x0, v0) = (1.0, 0.25, 1.3);
        let integ = ClassicalIntegrator::new(l, 2.0, 0.0).unwrap();
        let grid = TimeGrid::new(20.0, 777).unwrap();
        let states = integ.states(ClassicalState::new(x0, v0), &grid).unwrap();
        for (t, s) in grid.iter().zip(&states) {
            assert!((s.x - triangle(x0, v0, l, t)).abs() < 1e-10);
            assert!((s.v.abs() - v0).abs() < 1e-12);
        }
    }

    #[test]
    fn counts_reflections() {
        let integ = ClassicalIntegrator::new(1.0, 1.0, 0.0).unwrap();
        let mut state = ClassicalState::new(0.5, 10.0);
        let n = integ.advance(&mut state, 1.0);
        assert_eq!(n, 10);
        assert!((state.x - 0.5).abs() < 1e-12);
        assert!((state.v - 10.0).abs() < 1e-12);
    }

    #[test]
    fn uniform_acceleration_before_contact() {
        // V = f x with f < 0 pushes toward the upper wall
        let integ = ClassicalIntegrator::new(1.0, 1.0, -1.0).unwrap();
        assert_eq!(integ.acceleration(), 1.0);
        let grid = TimeGrid::new(1.0, 11).unwrap();
        let xs = integ.positions(ClassicalState::new(0.1, 0.0), &grid).unwrap();
        for (t, x) in grid.iter().zip(&xs) {
            assert!((x - (0.1 + 0.5 * t * t)).abs() < 1e-12);
        }
    }

    #[test]
    fn bouncing_ball_conserves_energy() {
        let (m, f) = (1.0, 2.0);
        let integ = ClassicalIntegrator::new(1.0, m, f).unwrap();
        let initial = ClassicalState::new(0.8, 0.0);
        let e0 = integ.energy(&initial);
        let grid = TimeGrid::new(50.0, 1000).unwrap();
        let states = integ.states(initial, &grid).unwrap();
        for s in states.iter() {
            assert!((integ.energy(s) - e0).abs() < 1e-9);
            assert!(s.x <= 0.8 + 1e-9);
            assert!(s.x >= 0.0);
        }
        // first contact with the floor at t = √(2 x₀ / |a|)
        let t_hit = (2.0 * 0.8 / 2.0_f64).sqrt();
        let mut probe = initial;
        integ.advance(&mut probe, t_hit * 0.999);
        assert!(probe.v < 0.0);
        integ.advance(&mut probe, t_hit * 0.002);
        assert!(probe.v > 0.0);
    }

    #[test]
    fn never_leaves_the_box_under_strong_force() {
        let integ = ClassicalIntegrator::new(1.0, 0.1, 500.0).unwrap();
        let grid = TimeGrid::new(3.0, 300).unwrap();
        let xs = integ.positions(ClassicalState::new(0.999, 40.0), &grid).unwrap();
        assert!(xs.iter().all(|x| (0.0..=1.0).contains(x)));
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(ClassicalIntegrator::new(0.0, 1.0, 0.0).is_err());
        assert!(ClassicalIntegrator::new(1.0, 0.0, 0.0).is_err());
        assert!(ClassicalIntegrator::new(1.0, 1.0, f64::NAN).is_err());
        let integ = ClassicalIntegrator::new(1.0, 1.0, 0.0).unwrap();
        let grid = TimeGrid::new(1.0, 3).unwrap();
        assert!(integ.positions(ClassicalState::new(1.5, 0.0), &grid).is_err());
        assert!(integ.positions(ClassicalState::new(0.5, f64::INFINITY), &grid).is_err());
    }
}
