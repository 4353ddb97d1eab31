//! OdeModel trait for pluggable derivative models.

use nalgebra::DVector;

/// Trait for first-order ODE systems `x_dot = f(t, x)`.
///
/// Implementations are pure: no side effects, no internal state, and the
/// parameters they carry are never mutated during integration. Invalid
/// physical parameters (zero mass, inductance or capacitance) are not
/// guarded here and surface as NaN/Inf in the returned derivative.
pub trait OdeModel {
    /// State dimension. Fixed for the lifetime of the model.
    fn dim(&self) -> usize;

    /// Compute the state derivative at time `t`.
    fn derivative(&self, t: f64, x: &DVector<f64>) -> DVector<f64>;

    /// Short human-readable name, used in logs.
    fn name(&self) -> &str {
        "ode"
    }
}

impl<M: OdeModel + ?Sized> OdeModel for &M {
    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn derivative(&self, t: f64, x: &DVector<f64>) -> DVector<f64> {
        (**self).derivative(t, x)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Model backed by a closure with a declared dimension.
pub struct FnModel<F> {
    name: String,
    dim: usize,
    f: F,
}

impl<F> FnModel<F>
where
    F: Fn(f64, &DVector<f64>) -> DVector<f64>,
{
    pub fn new(name: impl Into<String>, dim: usize, f: F) -> Self {
        Self {
            name: name.into(),
            dim,
            f,
        }
    }
}

impl<F> OdeModel for FnModel<F>
where
    F: Fn(f64, &DVector<f64>) -> DVector<f64>,
{
    fn dim(&self) -> usize {
        self.dim
    }

    fn derivative(&self, t: f64, x: &DVector<f64>) -> DVector<f64> {
        (self.f)(t, x)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
