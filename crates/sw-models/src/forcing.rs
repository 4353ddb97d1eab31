//! External forcing functions `t -> F(t)`.

use serde::{Deserialize, Serialize};

/// Pure function of time supplying the external force.
pub trait Forcing {
    fn force(&self, t: f64) -> f64;
}

impl<F> Forcing for F
where
    F: Fn(f64) -> f64,
{
    fn force(&self, t: f64) -> f64 {
        self(t)
    }
}

/// Time-invariant force (N).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstantForce(pub f64);

impl Default for ConstantForce {
    fn default() -> Self {
        Self(1.0)
    }
}

impl Forcing for ConstantForce {
    fn force(&self, _t: f64) -> f64 {
        self.0
    }
}
