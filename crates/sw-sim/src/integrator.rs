//! Fixed-step time integrators over `DVector<f64>` states.

use crate::error::{SimError, SimResult};
use nalgebra::DVector;
use sw_models::OdeModel;

/// Trait for time integrators.
pub trait Integrator {
    /// Advance state by one time step of size `dt` starting at `t`.
    fn step<M: OdeModel + ?Sized>(
        &self,
        model: &M,
        t: f64,
        x: &DVector<f64>,
        dt: f64,
    ) -> SimResult<DVector<f64>>;
}

/// Evaluate the model and reject derivatives whose length differs from the state.
pub(crate) fn eval<M: OdeModel + ?Sized>(
    model: &M,
    t: f64,
    x: &DVector<f64>,
) -> SimResult<DVector<f64>> {
    let dx = model.derivative(t, x);
    if dx.len() != x.len() {
        return Err(SimError::DimensionMismatch {
            expected: x.len(),
            found: dx.len(),
        });
    }
    Ok(dx)
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
///
/// Slopes are pre-scaled by `dt`:
///
/// ```text
/// k1 = dt f(t,        x)
/// k2 = dt f(t + dt/2, x + k1/2)
/// k3 = dt f(t + dt/2, x + k2/2)
/// k4 = dt f(t + dt,   x + k3)
/// x' = x + (k1 + 2 k2 + 2 k3 + k4) / 6
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Rk4;

impl Integrator for Rk4 {
    fn step<M: OdeModel + ?Sized>(
        &self,
        model: &M,
        t: f64,
        x: &DVector<f64>,
        dt: f64,
    ) -> SimResult<DVector<f64>> {
        let k1 = eval(model, t, x)? * dt;
        let k2 = eval(model, t + 0.5 * dt, &(x + &k1 * 0.5))? * dt;
        let k3 = eval(model, t + 0.5 * dt, &(x + &k2 * 0.5))? * dt;
        let k4 = eval(model, t + dt, &(x + &k3))? * dt;

        let k_sum = k1 + k2 * 2.0 + k3 * 2.0 + k4;
        Ok(x + k_sum * (1.0 / 6.0))
    }
}

/// Forward Euler (explicit, 1st order): `x' = x + dt f(t, x)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: OdeModel + ?Sized>(
        &self,
        model: &M,
        t: f64,
        x: &DVector<f64>,
        dt: f64,
    ) -> SimResult<DVector<f64>> {
        let xdot = eval(model, t, x)?;
        Ok(x + xdot * dt)
    }
}
