//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Units](#units)
//! - [Matrix elements](#matrix-elements)
//! - [Dressed-state propagation](#dressed-state-propagation)
//! - [Classical motion](#classical-motion)
//!
//! # Background
//! Ehrenfest's theorem states that the expectation values of position and
//! momentum of a quantum particle obey
//! ```text
//! d⟨x⟩   ⟨p⟩        d⟨p⟩
//! ---- = ---   ,    ---- = -⟨V'(x)⟩
//!  dt     m          dt
//! ```
//! which coincides with Newton's equations for the classical particle only when
//! ⟨*V*'(*x*)⟩ = *V*'(⟨*x*⟩), i.e. when the force is (effectively) constant over
//! the extent of the wavepacket. This crate compares the two for a particle of
//! mass *m* confined to the interval \[0, *l*\] by infinitely high walls and
//! subject to the linear potential
//! ```text
//! V(x) = f x
//! ```
//! Inside the box the force −*f* is uniform, so the two descriptions agree
//! until the packet reaches a wall. There, the quantum packet reflects off the
//! wall while being spread out over a finite width, and interference between
//! incident and reflected parts eventually separates ⟨*x*⟩ from the classical
//! trajectory. The agreement is best for narrow packets made of many highly
//! excited modes, which is the classical limit.
//!
//! The quantum state is represented in the eigenbasis of the unforced box,
//! ```text
//!           ⎛ 2 ⎞½     ⎛ n π x ⎞          n² π² ħ²
//! φₙ(x) =   ⎜---⎟   sin⎜-------⎟  ,  Eₙ = --------  ,  n = 1, 2, ...
//!           ⎝ l ⎠      ⎝   l   ⎠          2 m l²
//! ```
//! truncated to the first *k* modes, which turns the Schrödinger equation into
//! a finite linear system with the Hamiltonian
//! ```text
//! H[n, n'] = δ[n, n'] Eₙ + f ⟨n|x|n'⟩
//! ```
//! No spatial grid is involved except when the initial state is projected onto
//! the basis.
//!
//! # Units
//! All functions in this crate work in natural units with ħ = 1. Given a
//! particle mass *m* and a characteristic length *a*, lengths are measured in
//! units of *a*, masses in units of *m*, and
//! ```text
//!      ħ²           ħ          ε
//! ε = ----  ,  τ = ---  ,  F = -
//!     m a²          ε          a
//! ```
//! serve as the units of energy, time, and force, respectively. With these,
//! the Schrödinger equation
//! ```text
//!    ħ² ∂²                        ∂
//! - --- --- ψ + f x ψ = i ħ -- ψ
//!   2 m ∂x²                       ∂t
//! ```
//! becomes
//! ```text
//!    1  ∂²                        ∂
//! - --- ---- ψ + f' x' ψ = i --- ψ
//!    2  ∂x'²                      ∂t'
//! ```
//! with *x'* = *x* / *a*, *t'* = *t* / *τ*, and *f'* = *f* / *F*. Note that
//! *ε* here lacks the factor of 1/2 that is sometimes included, so that the
//! box energies in natural units are simply *n*²π²/(2 *l'*²).
//!
//! Items in [`units`][crate::units] are provided to handle conversion to and
//! from natural units.
//!
//! # Matrix elements
//! Both position and momentum have closed-form matrix elements in the box
//! basis[^1]. For position,
//! ```text
//! ⟨n|x|n⟩  = l / 2
//!
//!               8 l n n'
//! ⟨n|x|n'⟩ = - ------------     (n + n' odd)
//!              π² (n² - n'²)²
//!
//! ⟨n|x|n'⟩ = 0                  (n + n' even, n ≠ n')
//! ```
//! The vanishing of elements with *n* + *n'* even is the parity selection rule
//! of the box about its midpoint, and is reproduced exactly rather than by
//! quadrature. For momentum, p̂ = −*i*ħ ∂/∂*x* with
//! ```text
//!                   4 n n'
//! ⟨n|∂/∂x|n'⟩ = ------------     (n + n' odd; 0 otherwise)
//!               l (n² - n'²)
//! ```
//! which is real and antisymmetric, so that p̂ is Hermitian. These satisfy
//! *m* \[*H*, *X*\] = −*i*ħ *D* exactly within any truncated basis, so the first
//! Ehrenfest relation d⟨*x*⟩/d*t* = ⟨*p*⟩/*m* holds to rounding error for any
//! *k*. The second relation does not survive truncation, which is the source
//! of basis-size dependence in the results.
//!
//! # Dressed-state propagation
//! For a time-independent Hamiltonian, the evolution operator is diagonal in
//! the basis of eigenstates of *H* itself. With
//! ```text
//! H = V diag(λ) Vᵀ
//! ```
//! (*V* real orthogonal since *H* is real symmetric), the state at time *t* is
//! ```text
//! d(0) = Vᵀ c(0)
//!
//!           -i λⱼ t / ħ
//! dⱼ(t) = e            dⱼ(0)
//!
//! c(t) = V d(t)
//! ```
//! and
//! ```text
//! ⟨x⟩(t) = c(t)† X c(t)
//! ```
//! Every time sample is computed directly from *d*(0), so no error accumulates
//! across the time grid and the norm of the state is preserved to the
//! orthonormality of *V*. Phases are measured relative to the lowest dressed
//! energy to keep their arguments small over long horizons.
//!
//! Diagonalization uses the cyclic Jacobi method[^2]: every off-diagonal
//! element is in turn annihilated by a plane rotation, and full sweeps over
//! the matrix are repeated until the off-diagonal Frobenius norm falls below a
//! relative threshold. Convergence is ultimately quadratic and the accumulated
//! rotations are orthogonal to machine precision.
//!
//! The initial state is a Gaussian
//! ```text
//!                    -¼     (x - x₀)²
//! ψ₀(x) = (π σ²)   exp(- ---------) exp(i p₀ x / ħ)
//!                           2 σ²
//! ```
//! projected onto each mode with composite Simpson quadrature over the part of
//! the box where it is non-negligible. The part of the packet carried by modes
//! above *k* (or lying outside the box) is lost in projection; the resulting
//! coefficients are renormalized to unit norm.
//!
//! # Classical motion
//! The classical particle feels the constant acceleration *a* = −*f* / *m*
//! between collisions with the walls, where it reflects elastically. A
//! velocity-Verlet step
//! ```text
//! v(t + dt/2) = v(t) + a dt/2
//! x(t + dt)   = x(t) + v(t + dt/2) dt
//! v(t + dt)   = v(t + dt/2) + a dt/2
//! ```
//! is exact for constant acceleration, but would carry the particle through a
//! wall if applied blindly. Instead, each step first solves
//! ```text
//! x + v τ + a τ² / 2 = w
//! ```
//! for the earliest positive time *τ* at which the particle reaches a wall *w*
//! ∊ {0, *l*} while moving outward. If this falls within the step, the particle
//! is advanced to the wall, its velocity is reversed, and the rest of the step
//! is integrated in the same way. Roots are computed in the cancellation-free
//! form
//! ```text
//! q = -(b + sgn(b) √(b² - 4 a c)) / 2
//! τ₁ = q / a  ,  τ₂ = c / q
//! ```
//! so that the trivial root τ = 0 immediately after a reflection is recovered
//! exactly and discarded.
//!
//! [^1]: D. J. Griffiths and D. F. Schroeter, *Introduction to Quantum
//! Mechanics*, 3rd ed., Cambridge University Press (2018), problem 2.4 ff.
//!
//! [^2]: G. H. Golub and C. F. Van Loan, *Matrix Computations*, 4th ed., Johns
//! Hopkins University Press (2013), §8.5.
