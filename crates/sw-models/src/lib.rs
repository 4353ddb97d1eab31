//! State derivative models for stepwise.
//!
//! Provides:
//! - `OdeModel` trait: pure `x_dot = f(t, x)` over `DVector<f64>`
//! - Damped mass-spring oscillator under an external force
//! - Buck DC-DC converter as a second-order RLC circuit
//! - Closure-backed models for test ODEs
//! - Forcing functions

pub mod buck;
pub mod forcing;
pub mod model;
pub mod spring_mass;

pub use buck::{BuckConverter, BuckParams};
pub use forcing::{ConstantForce, Forcing};
pub use model::{FnModel, OdeModel};
pub use spring_mass::{SpringMass, SpringMassParams, SpringMassState};
