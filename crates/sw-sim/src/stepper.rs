//! Dedicated single-step schemes for the spring-mass oscillator.
//!
//! Forward Euler advances the position with the *old* velocity; Backward
//! Euler advances it with the *new* one. The two couplings reflect the
//! explicit and implicit character of each scheme and are not unified.

use crate::newton::{BackwardEulerConfig, CorrectionReport, correct};
use nalgebra::{Matrix2, Vector2};
use sw_models::{SpringMassParams, SpringMassState};

/// One explicit Euler step.
///
/// `force` is the external force at the previous time. Zero mass yields
/// NaN/Inf, which is left for the caller to detect.
pub fn forward_euler_step(
    prev: SpringMassState,
    params: &SpringMassParams,
    force: f64,
    h: f64,
) -> SpringMassState {
    let a = params.acceleration(prev.x, prev.v, force);

    let v_next = prev.v + a * h;
    let x_next = prev.x + prev.v * h;

    SpringMassState::new(x_next, v_next)
}

/// One implicit Euler step, refined by the correction loop in `config`.
///
/// `force` is the external force at the new time.
pub fn backward_euler_step(
    prev: SpringMassState,
    params: &SpringMassParams,
    force: f64,
    h: f64,
    config: &BackwardEulerConfig,
) -> SpringMassState {
    backward_euler_step_with_report(prev, params, force, h, config).0
}

/// Same as [`backward_euler_step`], also returning the loop report.
pub fn backward_euler_step_with_report(
    prev: SpringMassState,
    params: &SpringMassParams,
    force: f64,
    h: f64,
    config: &BackwardEulerConfig,
) -> (SpringMassState, CorrectionReport) {
    // Explicit guess: position from the old velocity, velocity from the
    // guessed position and the old velocity.
    let x_guess = prev.x + h * prev.v;
    let v_guess = prev.v + params.acceleration(x_guess, prev.v, force) * h;

    let residual = |z: &Vector2<f64>| {
        let (x_next, v_next) = (z[0], z[1]);
        Vector2::new(
            x_next - prev.x - h * v_next,
            v_next - prev.v - params.acceleration(x_next, v_next, force) * h,
        )
    };

    let jacobian = |_z: &Vector2<f64>| {
        Matrix2::new(
            1.0,
            -h,
            h * params.stiffness / params.mass,
            1.0 + h * params.damping / params.mass,
        )
    };

    let (z, report) = correct(Vector2::new(x_guess, v_guess), residual, jacobian, config);
    (SpringMassState::new(z[0], z[1]), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newton::Correction;

    fn unit() -> SpringMassParams {
        SpringMassParams::new(1.0, 1.0, 1.0)
    }

    #[test]
    fn forward_step_uses_old_velocity_for_position() {
        let next = forward_euler_step(SpringMassState::new(0.0, 2.0), &unit(), 1.0, 0.5);
        // x advances with v_prev = 2, not with v_next
        assert_eq!(next.x, 1.0);
        // a = (1 - 0 - 2) / 1 = -1
        assert_eq!(next.v, 1.5);
    }

    #[test]
    fn forward_step_from_rest_moves_velocity_only() {
        let next = forward_euler_step(SpringMassState::default(), &unit(), 1.0, 0.1);
        assert_eq!(next.x, 0.0);
        assert!((next.v - 0.1).abs() < 1e-15);
    }

    #[test]
    fn backward_step_matches_hand_iteration() {
        let (prev, p, f, h) = (SpringMassState::new(0.2, -0.1), unit(), 1.0, 0.25);

        let mut x = prev.x + h * prev.v;
        let mut v = prev.v + (f - p.stiffness * x - p.damping * prev.v) / p.mass * h;
        for _ in 0..10 {
            let dx = x - prev.x - h * v;
            let dv = v - prev.v - (f - p.stiffness * x - p.damping * v) / p.mass * h;
            x -= dx;
            v -= dv;
        }

        let next = backward_euler_step(prev, &p, f, h, &BackwardEulerConfig::default());
        assert_eq!(next, SpringMassState::new(x, v));
    }

    #[test]
    fn newton_step_satisfies_implicit_equations() {
        let (prev, p, f, h) = (SpringMassState::new(0.3, 0.4), unit(), 1.0, 1.0);
        let cfg = BackwardEulerConfig::newton();
        let (next, report) = backward_euler_step_with_report(prev, &p, f, h, &cfg);

        assert!(report.residual_max < 1e-12);
        assert!((next.x - prev.x - h * next.v).abs() < 1e-12);
        let a = (f - p.stiffness * next.x - p.damping * next.v) / p.mass;
        assert!((next.v - prev.v - h * a).abs() < 1e-12);
    }

    #[test]
    fn residual_loop_reports_every_pass() {
        let (_, report) = backward_euler_step_with_report(
            SpringMassState::default(),
            &unit(),
            1.0,
            0.1,
            &BackwardEulerConfig::default(),
        );
        assert_eq!(report.iterations, 10);
        assert!(!report.converged);
    }

    #[test]
    fn zero_mass_propagates_non_finite() {
        let p = SpringMassParams::new(0.0, 1.0, 1.0);
        let fe = forward_euler_step(SpringMassState::default(), &p, 1.0, 0.1);
        let be = backward_euler_step(
            SpringMassState::default(),
            &p,
            1.0,
            0.1,
            &BackwardEulerConfig {
                correction: Correction::Residual,
                ..Default::default()
            },
        );
        assert!(!fe.is_finite());
        assert!(!be.is_finite());
    }
}
