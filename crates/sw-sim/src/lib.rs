//! Fixed-step ODE integration for stepwise.
//!
//! Provides:
//! - Dedicated spring-mass steppers: Forward Euler and Backward Euler with a
//!   fixed-count correction loop
//! - Generic `Integrator` trait with RK4 and Forward Euler over `DVector<f64>`
//! - Time grids (uniform or non-uniform)
//! - Spring-mass simulation driver (buffer fill or step iterator)
//! - Trajectories with a non-finite guard for downstream consumers

pub mod driver;
pub mod error;
pub mod grid;
pub mod integrator;
pub mod newton;
pub mod sim;
pub mod stepper;
pub mod trajectory;

pub use driver::{
    EulerMethod, SpringMassOptions, SpringMassRecord, SpringMassSample, SpringMassSteps,
    simulate_spring_mass,
};
pub use error::{SimError, SimResult};
pub use grid::TimeGrid;
pub use integrator::{ForwardEuler, Integrator, Rk4};
pub use newton::{BackwardEulerConfig, Correction, CorrectionReport};
pub use sim::{IntegratorType, integrate_on_grid, rk4_integration, run_on_grid};
pub use stepper::{backward_euler_step, backward_euler_step_with_report, forward_euler_step};
pub use trajectory::Trajectory;
