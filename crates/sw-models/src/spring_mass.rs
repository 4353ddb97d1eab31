//! Damped mass-spring oscillator `m x'' + b x' + k x = F(t)`.
//!
//! Reduced to the first-order pair `(x, v)`:
//!
//! ```text
//! dx/dt = v
//! dv/dt = (F(t) - k x - b v) / m
//! ```

use crate::forcing::Forcing;
use crate::model::OdeModel;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use sw_core::units::{Force, Mass};

/// State index of the position.
pub const POSITION: usize = 0;
/// State index of the velocity.
pub const VELOCITY: usize = 1;

/// Physical constants of the oscillator (SI).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringMassParams {
    /// Mass (kg)
    pub mass: f64,
    /// Spring stiffness (N/m)
    pub stiffness: f64,
    /// Viscous damping (N·s/m)
    pub damping: f64,
}

impl Default for SpringMassParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 1.0,
            damping: 1.0,
        }
    }
}

impl SpringMassParams {
    pub fn new(mass: f64, stiffness: f64, damping: f64) -> Self {
        Self {
            mass,
            stiffness,
            damping,
        }
    }

    /// Build from a typed mass; stiffness and damping stay in N/m and N·s/m.
    pub fn from_quantities(mass: Mass, stiffness: f64, damping: f64) -> Self {
        use uom::si::mass::kilogram;
        Self::new(mass.get::<kilogram>(), stiffness, damping)
    }

    /// Acceleration `(F - k x - b v) / m`.
    ///
    /// `m = 0` yields NaN/Inf; callers see it in the trajectory.
    #[inline]
    pub fn acceleration(&self, x: f64, v: f64, force: f64) -> f64 {
        (force - self.stiffness * x - self.damping * v) / self.mass
    }

    /// Static deflection `F / k` under a constant force.
    pub fn static_deflection(&self, force: Force) -> f64 {
        use uom::si::force::newton;
        force.get::<newton>() / self.stiffness
    }

    /// Undamped natural frequency `sqrt(k / m)` (rad/s).
    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }
}

/// Position and velocity of the mass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringMassState {
    pub x: f64,
    pub v: f64,
}

impl SpringMassState {
    pub fn new(x: f64, v: f64) -> Self {
        Self { x, v }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.v.is_finite()
    }

    pub fn to_vector(self) -> DVector<f64> {
        DVector::from_column_slice(&[self.x, self.v])
    }

    /// Read `(x, v)` back from a state vector. Returns `None` unless `len == 2`.
    pub fn from_vector(x: &DVector<f64>) -> Option<Self> {
        (x.len() == 2).then(|| Self::new(x[POSITION], x[VELOCITY]))
    }
}

/// Spring-mass model with its forcing function.
#[derive(Clone, Debug)]
pub struct SpringMass<F> {
    pub params: SpringMassParams,
    pub forcing: F,
}

impl<F> SpringMass<F> {
    pub const POSITION: usize = POSITION;
    pub const VELOCITY: usize = VELOCITY;
}

impl<F: Forcing> SpringMass<F> {
    pub fn new(params: SpringMassParams, forcing: F) -> Self {
        Self { params, forcing }
    }
}

impl<F: Forcing> OdeModel for SpringMass<F> {
    fn dim(&self) -> usize {
        2
    }

    fn derivative(&self, t: f64, x: &DVector<f64>) -> DVector<f64> {
        let pos = x[Self::POSITION];
        let vel = x[Self::VELOCITY];
        let acc = self.params.acceleration(pos, vel, self.forcing.force(t));
        DVector::from_column_slice(&[vel, acc])
    }

    fn name(&self) -> &str {
        "spring-mass"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forcing::ConstantForce;
    use sw_core::units::{kg, newton};

    #[test]
    fn derivative_at_rest_is_force_over_mass() {
        let model = SpringMass::new(SpringMassParams::new(2.0, 1.0, 1.0), ConstantForce(1.0));
        let dx = model.derivative(0.0, &SpringMassState::default().to_vector());
        assert_eq!(dx[SpringMass::<ConstantForce>::POSITION], 0.0);
        assert_eq!(dx[SpringMass::<ConstantForce>::VELOCITY], 0.5);
    }

    #[test]
    fn derivative_includes_spring_and_damper() {
        let model = SpringMass::new(SpringMassParams::new(1.0, 4.0, 0.5), ConstantForce(1.0));
        let dx = model.derivative(0.0, &SpringMassState::new(0.25, 2.0).to_vector());
        assert_eq!(dx[0], 2.0);
        // 1 - 4*0.25 - 0.5*2
        assert_eq!(dx[1], -1.0);
    }

    #[test]
    fn forcing_is_evaluated_at_t() {
        let model = SpringMass::new(SpringMassParams::default(), |t: f64| t);
        let dx = model.derivative(3.0, &SpringMassState::default().to_vector());
        assert_eq!(dx[1], 3.0);
    }

    #[test]
    fn zero_mass_is_not_guarded() {
        let params = SpringMassParams::new(0.0, 1.0, 1.0);
        assert!(!params.acceleration(0.0, 0.0, 1.0).is_finite());
    }

    #[test]
    fn typed_constructors() {
        let params = SpringMassParams::from_quantities(kg(2.0), 8.0, 0.0);
        assert_eq!(params.mass, 2.0);
        assert_eq!(params.natural_frequency(), 2.0);
        assert_eq!(params.static_deflection(newton(4.0)), 0.5);
    }

    #[test]
    fn vector_roundtrip_checks_len() {
        let s = SpringMassState::new(1.5, -0.5);
        assert_eq!(SpringMassState::from_vector(&s.to_vector()), Some(s));
        assert_eq!(SpringMassState::from_vector(&DVector::zeros(3)), None);
    }
}
