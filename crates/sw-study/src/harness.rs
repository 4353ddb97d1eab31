//! Comparative harness: every step size against both Euler variants, and the
//! buck converter once with RK4.

use crate::config::{BuckStudy, StudyConfig};
use crate::error::StudyResult;
use nalgebra::DVector;
use rayon::prelude::*;
use sw_core::max_abs;
use sw_models::{BuckConverter, ConstantForce, Forcing};
use sw_sim::{
    EulerMethod, SimResult, SpringMassRecord, TimeGrid, Trajectory, rk4_integration,
    simulate_spring_mass,
};

/// One (h, method) combination of the spring-mass study.
#[derive(Clone, Debug, PartialEq)]
pub struct SpringMassRun {
    pub h: f64,
    pub method: EulerMethod,
    pub record: SpringMassRecord,
}

impl SpringMassRun {
    pub fn summary(&self) -> RunSummary {
        let record = &self.record;
        let (final_t, final_values) = match (record.t.last(), record.x.last(), record.v.last()) {
            (Some(&t), Some(&x), Some(&v)) => (t, vec![x, v]),
            _ => (0.0, Vec::new()),
        };
        RunSummary {
            label: format!("{} h = {}", self.method.label(), self.h),
            samples: record.len(),
            max_abs: record.max_abs_x(),
            final_t,
            final_values,
            finite: record.ensure_finite().is_ok(),
        }
    }
}

/// RK4 run of the buck converter.
#[derive(Clone, Debug, PartialEq)]
pub struct BuckRun {
    pub grid: TimeGrid,
    pub trajectory: Trajectory,
    /// `(iL, uC)` equilibrium of the configured circuit
    pub steady_state: (f64, f64),
}

impl BuckRun {
    pub fn summary(&self) -> RunSummary {
        let traj = &self.trajectory;
        let (final_t, final_x) = match traj.last() {
            Some((t, x)) => (t, x.iter().copied().collect()),
            None => (self.grid.start(), Vec::new()),
        };
        RunSummary {
            label: "Buck RK4".to_string(),
            samples: traj.len(),
            max_abs: max_abs(&traj.component(BuckConverter::VOLTAGE)),
            final_t,
            final_values: final_x,
            finite: traj.ensure_finite().is_ok(),
        }
    }
}

/// Printable digest of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub label: String,
    pub samples: usize,
    /// Largest excursion of the plotted quantity (position, or capacitor voltage)
    pub max_abs: f64,
    pub final_t: f64,
    pub final_values: Vec<f64>,
    pub finite: bool,
}

/// Spring-mass study with the configured constant force.
pub fn run_spring_mass_study(config: &StudyConfig) -> StudyResult<Vec<SpringMassRun>> {
    let force = ConstantForce(config.spring_mass.force);
    run_spring_mass_study_with(config, &force)
}

/// Spring-mass study with a caller-supplied forcing function.
///
/// Runs are returned ordered by configured step size, Backward before
/// Forward for each size, whether or not they executed in parallel.
pub fn run_spring_mass_study_with<F>(
    config: &StudyConfig,
    forcing: &F,
) -> StudyResult<Vec<SpringMassRun>>
where
    F: Forcing + Sync + ?Sized,
{
    crate::config::validate_config(config)?;
    let study = &config.spring_mass;

    let jobs: Vec<(f64, EulerMethod)> = study
        .step_sizes
        .iter()
        .flat_map(|&h| EulerMethod::ALL.map(|method| (h, method)))
        .collect();

    let run_one = |&(h, method): &(f64, EulerMethod)| -> SimResult<SpringMassRun> {
        let record = simulate_spring_mass(&study.params, forcing, &study.options(h, method))?;
        Ok(SpringMassRun { h, method, record })
    };

    let runs: Vec<SpringMassRun> = if config.parallel {
        jobs.par_iter().map(run_one).collect::<SimResult<_>>()?
    } else {
        jobs.iter().map(run_one).collect::<SimResult<_>>()?
    };

    for run in &runs {
        let s = run.summary();
        tracing::info!(
            run = %s.label,
            samples = s.samples,
            max_abs_x = s.max_abs,
            finite = s.finite,
            "spring-mass run finished"
        );
    }
    Ok(runs)
}

/// Buck converter over the configured grid with RK4.
pub fn run_buck_study(config: &StudyConfig) -> StudyResult<BuckRun> {
    crate::config::validate_config(config)?;
    let BuckStudy {
        params,
        t_start,
        t_end,
        dt,
        initial,
    } = &config.buck;

    let model = BuckConverter::new(*params);
    let grid = TimeGrid::arange(*t_start, *t_end, *dt)?;
    let x0 = DVector::from_column_slice(initial);
    let trajectory = rk4_integration(&model, &x0, &grid)?;

    let run = BuckRun {
        grid,
        trajectory,
        steady_state: model.steady_state(),
    };
    let s = run.summary();
    tracing::info!(
        samples = s.samples,
        final_t = s.final_t,
        finite = s.finite,
        "buck run finished"
    );
    Ok(run)
}
