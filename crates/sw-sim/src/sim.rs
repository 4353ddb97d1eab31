//! Grid-driven simulation runner.

use crate::error::{SimError, SimResult};
use crate::grid::TimeGrid;
use crate::integrator::{ForwardEuler, Integrator, Rk4};
use crate::trajectory::Trajectory;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use sw_models::OdeModel;

/// Integrator selection for grid runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, 4 derivative calls per step).
    #[default]
    Rk4,
    /// Forward Euler (1st-order, 1 derivative call per step).
    ForwardEuler,
}

/// Integrate `model` from `x0` across every point of `grid`.
///
/// The step size is recomputed for each interval, so non-uniform grids are
/// handled as-is. The first sample is `x0` at `grid.start()`.
pub fn integrate_on_grid<I, M>(
    integrator: &I,
    model: &M,
    x0: &DVector<f64>,
    grid: &TimeGrid,
) -> SimResult<Trajectory>
where
    I: Integrator,
    M: OdeModel + ?Sized,
{
    if x0.len() != model.dim() {
        return Err(SimError::DimensionMismatch {
            expected: model.dim(),
            found: x0.len(),
        });
    }

    tracing::debug!(
        model = model.name(),
        points = grid.len(),
        t_start = grid.start(),
        t_end = grid.end(),
        "grid integration start"
    );

    let mut traj = Trajectory::with_capacity(grid.len());
    traj.push(grid.start(), x0.clone());

    let mut x = x0.clone();
    for (i, (t_prev, dt)) in grid.intervals().enumerate() {
        x = integrator.step(model, t_prev, &x, dt)?;
        traj.push(grid.as_slice()[i + 1], x.clone());
    }

    tracing::debug!(model = model.name(), samples = traj.len(), "grid integration done");
    Ok(traj)
}

/// RK4 across a time grid.
pub fn rk4_integration<M: OdeModel + ?Sized>(
    model: &M,
    x0: &DVector<f64>,
    grid: &TimeGrid,
) -> SimResult<Trajectory> {
    integrate_on_grid(&Rk4, model, x0, grid)
}

/// Grid run with the integrator picked at run time.
pub fn run_on_grid<M: OdeModel + ?Sized>(
    model: &M,
    x0: &DVector<f64>,
    grid: &TimeGrid,
    integrator: IntegratorType,
) -> SimResult<Trajectory> {
    match integrator {
        IntegratorType::Rk4 => integrate_on_grid(&Rk4, model, x0, grid),
        IntegratorType::ForwardEuler => integrate_on_grid(&ForwardEuler, model, x0, grid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_models::FnModel;

    fn decay() -> FnModel<impl Fn(f64, &DVector<f64>) -> DVector<f64>> {
        FnModel::new("decay", 1, |_t, x: &DVector<f64>| -x)
    }

    #[test]
    fn first_sample_is_initial_condition() {
        let grid = TimeGrid::from_points(vec![0.5, 0.6, 0.9]).unwrap();
        let x0 = DVector::from_element(1, 2.0);
        let traj = rk4_integration(&decay(), &x0, &grid).unwrap();
        assert_eq!(traj.len(), 3);
        assert_eq!(traj.t, vec![0.5, 0.6, 0.9]);
        assert_eq!(traj.x[0], x0);
    }

    #[test]
    fn initial_condition_length_is_checked() {
        let grid = TimeGrid::uniform_steps(0.1, 3).unwrap();
        let err = rk4_integration(&decay(), &DVector::zeros(2), &grid).unwrap_err();
        assert_eq!(
            err,
            SimError::DimensionMismatch {
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn single_point_grid_returns_initial_condition() {
        let grid = TimeGrid::from_points(vec![0.0]).unwrap();
        let traj = run_on_grid(
            &decay(),
            &DVector::from_element(1, 1.0),
            &grid,
            IntegratorType::ForwardEuler,
        )
        .unwrap();
        assert_eq!(traj.len(), 1);
    }
}
