//! Fixed-count correction loop for implicit steps.

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

/// How each pass of the correction loop turns a residual into an update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correction {
    /// Subtract the residual itself (`x -= r`).
    ///
    /// Equivalent to Newton with an identity Jacobian. This is the reference
    /// behavior and is kept as-is, even though the residual Jacobian of the
    /// Backward Euler equations is not the identity.
    #[default]
    Residual,
    /// True Newton-Raphson: solve `J d = r` and subtract `d`.
    Newton,
}

/// Backward Euler correction loop configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackwardEulerConfig {
    /// Number of correction passes
    pub iterations: usize,
    /// Update rule
    pub correction: Correction,
    /// Optional early exit once `max(|r|) <= tolerance`.
    /// `None` runs every pass unconditionally.
    pub tolerance: Option<f64>,
}

impl Default for BackwardEulerConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            correction: Correction::Residual,
            tolerance: None,
        }
    }
}

impl BackwardEulerConfig {
    pub fn newton() -> Self {
        Self {
            correction: Correction::Newton,
            ..Self::default()
        }
    }
}

/// Outcome of one correction loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CorrectionReport {
    /// Passes that updated the estimate
    pub iterations: usize,
    /// `max(|r|)` at the returned estimate
    pub residual_max: f64,
    /// Set when the early-exit tolerance was reached
    pub converged: bool,
}

/// Refine `guess` by repeatedly correcting against `residual_fn`.
///
/// All residual components are computed from the current estimate before
/// any of them is applied. There is no divergence detection.
pub fn correct<F, J>(
    guess: Vector2<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &BackwardEulerConfig,
) -> (Vector2<f64>, CorrectionReport)
where
    F: Fn(&Vector2<f64>) -> Vector2<f64>,
    J: Fn(&Vector2<f64>) -> Matrix2<f64>,
{
    let mut z = guess;
    let mut iterations = 0;
    let mut converged = false;

    for iter in 0..config.iterations {
        let r = residual_fn(&z);
        tracing::trace!(iter, r0 = r[0], r1 = r[1], "correction pass");

        if let Some(tol) = config.tolerance {
            if r.amax() <= tol {
                converged = true;
                break;
            }
        }

        match config.correction {
            Correction::Residual => z -= r,
            Correction::Newton => match jacobian_fn(&z).lu().solve(&r) {
                Some(d) => z -= d,
                None => {
                    tracing::warn!(iter, "singular Jacobian, skipping Newton update");
                    continue;
                }
            },
        }
        iterations += 1;
    }

    let residual_max = residual_fn(&z).amax();
    (
        z,
        CorrectionReport {
            iterations,
            residual_max,
            converged,
        },
    )
}
