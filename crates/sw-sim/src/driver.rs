//! Spring-mass simulation driver and result recording.

use crate::error::{SimError, SimResult};
use crate::newton::BackwardEulerConfig;
use crate::stepper::{backward_euler_step, forward_euler_step};
use crate::trajectory::Trajectory;
use serde::{Deserialize, Serialize};
use sw_core::{ensure_finite, ensure_positive, max_abs, step_count};
use sw_models::{Forcing, SpringMassParams, SpringMassState};

/// Euler variant used by the driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EulerMethod {
    /// Implicit Euler with the correction loop (default).
    #[default]
    Backward,
    /// Explicit Euler.
    Forward,
}

impl EulerMethod {
    pub const ALL: [EulerMethod; 2] = [EulerMethod::Backward, EulerMethod::Forward];

    pub fn label(self) -> &'static str {
        match self {
            EulerMethod::Backward => "Backward Euler",
            EulerMethod::Forward => "Forward Euler",
        }
    }
}

/// Options for a spring-mass run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringMassOptions {
    /// Fixed time step (seconds)
    pub h: f64,
    /// Simulated span (seconds); the run holds `floor(total_time / h)` samples
    pub total_time: f64,
    /// Euler variant
    pub method: EulerMethod,
    /// Backward Euler correction loop
    pub backward: BackwardEulerConfig,
    /// State at t = 0
    pub initial: SpringMassState,
}

impl Default for SpringMassOptions {
    fn default() -> Self {
        Self {
            h: 0.01,
            total_time: 13.0,
            method: EulerMethod::default(),
            backward: BackwardEulerConfig::default(),
            initial: SpringMassState::default(),
        }
    }
}

impl SpringMassOptions {
    pub fn new(h: f64, total_time: f64, method: EulerMethod) -> Self {
        Self {
            h,
            total_time,
            method,
            ..Self::default()
        }
    }

    /// Validated sample count.
    pub fn steps(&self) -> SimResult<usize> {
        ensure_positive(self.h, "h")?;
        let total = ensure_finite(self.total_time, "total_time")?;
        if total < 0.0 {
            return Err(SimError::InvalidArg {
                what: "total_time must be non-negative",
            });
        }
        match step_count(total, self.h)? {
            0 => Err(SimError::InvalidArg {
                what: "total_time shorter than one step",
            }),
            n => Ok(n),
        }
    }
}

/// One driver output sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringMassSample {
    pub index: usize,
    pub t: f64,
    pub state: SpringMassState,
}

/// Lazy spring-mass run, one sample per step.
///
/// Yields exactly `floor(total_time / h)` samples: the initial condition at
/// `t = 0`, then one stepper application per index with `t = i * h`.
/// Restart by constructing a new iterator.
pub struct SpringMassSteps<'a, F: ?Sized> {
    params: &'a SpringMassParams,
    forcing: &'a F,
    opts: SpringMassOptions,
    n: usize,
    next_index: usize,
    prev: SpringMassState,
}

impl<'a, F: Forcing + ?Sized> SpringMassSteps<'a, F> {
    pub fn new(
        params: &'a SpringMassParams,
        forcing: &'a F,
        opts: SpringMassOptions,
    ) -> SimResult<Self> {
        let n = opts.steps()?;
        Ok(Self {
            params,
            forcing,
            opts,
            n,
            next_index: 0,
            prev: opts.initial,
        })
    }

    /// Total number of samples the run produces.
    pub fn total(&self) -> usize {
        self.n
    }
}

impl<F: Forcing + ?Sized> Iterator for SpringMassSteps<'_, F> {
    type Item = SpringMassSample;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.next_index;
        if i >= self.n {
            return None;
        }
        self.next_index += 1;

        if i == 0 {
            return Some(SpringMassSample {
                index: 0,
                t: 0.0,
                state: self.prev,
            });
        }

        // Recomputed, not accumulated, so the time axis does not drift.
        let t = i as f64 * self.opts.h;
        let force = self.forcing.force(t);

        let state = match self.opts.method {
            EulerMethod::Backward => backward_euler_step(
                self.prev,
                self.params,
                force,
                self.opts.h,
                &self.opts.backward,
            ),
            EulerMethod::Forward => forward_euler_step(self.prev, self.params, force, self.opts.h),
        };
        self.prev = state;

        Some(SpringMassSample { index: i, t, state })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.n - self.next_index;
        (left, Some(left))
    }
}

impl<F: Forcing + ?Sized> ExactSizeIterator for SpringMassSteps<'_, F> {}

/// Record of a spring-mass run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpringMassRecord {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// Positions (m)
    pub x: Vec<f64>,
    /// Velocities (m/s)
    pub v: Vec<f64>,
}

impl SpringMassRecord {
    fn with_capacity(n: usize) -> Self {
        Self {
            t: Vec::with_capacity(n),
            x: Vec::with_capacity(n),
            v: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn state(&self, i: usize) -> SpringMassState {
        SpringMassState::new(self.x[i], self.v[i])
    }

    /// Largest position excursion, NaN if any position is NaN.
    pub fn max_abs_x(&self) -> f64 {
        max_abs(&self.x)
    }

    pub fn ensure_finite(&self) -> SimResult<()> {
        match (0..self.len()).find(|&i| !self.state(i).is_finite()) {
            Some(index) => Err(SimError::NonFinite {
                index,
                t: self.t[index],
            }),
            None => Ok(()),
        }
    }

    /// Same samples as a generic `(x, v)` trajectory.
    pub fn to_trajectory(&self) -> Trajectory {
        let mut traj = Trajectory::with_capacity(self.len());
        for i in 0..self.len() {
            traj.push(self.t[i], self.state(i).to_vector());
        }
        traj
    }
}

impl FromIterator<SpringMassSample> for SpringMassRecord {
    fn from_iter<I: IntoIterator<Item = SpringMassSample>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut record = Self::with_capacity(iter.size_hint().0);
        for sample in iter {
            record.t.push(sample.t);
            record.x.push(sample.state.x);
            record.v.push(sample.state.v);
        }
        record
    }
}

/// Run the spring-mass oscillator with the Euler variant in `opts`.
pub fn simulate_spring_mass<F: Forcing + ?Sized>(
    params: &SpringMassParams,
    forcing: &F,
    opts: &SpringMassOptions,
) -> SimResult<SpringMassRecord> {
    let steps = SpringMassSteps::new(params, forcing, *opts)?;
    tracing::debug!(
        method = opts.method.label(),
        h = opts.h,
        samples = steps.total(),
        "spring-mass run start"
    );

    let record: SpringMassRecord = steps.collect();

    tracing::debug!(
        method = opts.method.label(),
        h = opts.h,
        max_abs_x = record.max_abs_x(),
        "spring-mass run done"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_models::ConstantForce;

    #[test]
    fn options_defaults() {
        let opts = SpringMassOptions::default();
        assert_eq!(opts.h, 0.01);
        assert_eq!(opts.total_time, 13.0);
        assert_eq!(opts.method, EulerMethod::Backward);
        assert_eq!(opts.initial, SpringMassState::default());
    }

    #[test]
    fn options_invalid() {
        let bad = [
            SpringMassOptions::new(0.0, 1.0, EulerMethod::Forward),
            SpringMassOptions::new(-0.1, 1.0, EulerMethod::Forward),
            SpringMassOptions::new(f64::NAN, 1.0, EulerMethod::Forward),
            SpringMassOptions::new(0.1, -1.0, EulerMethod::Forward),
            SpringMassOptions::new(0.1, f64::INFINITY, EulerMethod::Forward),
            SpringMassOptions::new(1.0, 0.5, EulerMethod::Forward),
            SpringMassOptions::new(1e-300, 13.0, EulerMethod::Forward),
        ];
        for opts in bad {
            assert!(opts.steps().is_err(), "{opts:?} should be rejected");
        }
    }

    #[test]
    fn iterator_time_axis_is_index_times_h() {
        let params = SpringMassParams::default();
        let opts = SpringMassOptions::new(0.1, 1.0, EulerMethod::Forward);
        let steps = SpringMassSteps::new(&params, &ConstantForce(1.0), opts).unwrap();
        assert_eq!(steps.len(), 10);
        for sample in steps {
            assert_eq!(sample.t, sample.index as f64 * 0.1);
        }
    }

    #[test]
    fn first_sample_is_initial_condition() {
        let params = SpringMassParams::default();
        let opts = SpringMassOptions {
            initial: SpringMassState::new(0.5, -1.0),
            ..SpringMassOptions::new(0.1, 1.0, EulerMethod::Backward)
        };
        let record = simulate_spring_mass(&params, &ConstantForce(1.0), &opts).unwrap();
        assert_eq!(record.t[0], 0.0);
        assert_eq!(record.state(0), SpringMassState::new(0.5, -1.0));
    }

    #[test]
    fn forcing_sees_step_time() {
        let params = SpringMassParams::new(1.0, 0.0, 0.0);
        let opts = SpringMassOptions::new(0.5, 2.0, EulerMethod::Forward);
        // Force equals time, so v_i = sum over j in 1..=i of (j * h) * h
        let record = simulate_spring_mass(&params, &|t: f64| t, &opts).unwrap();
        assert_eq!(record.v, vec![0.0, 0.25, 0.75, 1.5]);
    }

    #[test]
    fn record_converts_to_trajectory() {
        let params = SpringMassParams::default();
        let opts = SpringMassOptions::new(0.25, 1.0, EulerMethod::Backward);
        let record = simulate_spring_mass(&params, &ConstantForce(1.0), &opts).unwrap();
        let traj = record.to_trajectory();
        assert_eq!(traj.len(), record.len());
        assert_eq!(traj.component(0), record.x);
        assert_eq!(traj.component(1), record.v);
    }

    #[test]
    fn zero_mass_surfaces_at_boundary() {
        let params = SpringMassParams::new(0.0, 1.0, 1.0);
        let opts = SpringMassOptions::new(0.1, 1.0, EulerMethod::Forward);
        let record = simulate_spring_mass(&params, &ConstantForce(1.0), &opts).unwrap();
        assert_eq!(record.len(), 10);
        assert!(matches!(
            record.ensure_finite(),
            Err(SimError::NonFinite { index: 1, .. })
        ));
    }
}
