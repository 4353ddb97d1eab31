//! Comparative study layer for stepwise.
//!
//! This crate sits between the integrators and the front ends: it owns the
//! study configuration, drives every (step size, method) combination and
//! hands finished trajectories to the visualization boundary.

pub mod config;
pub mod error;
pub mod harness;
pub mod plot;

pub use config::{
    BuckStudy, ConfigError, LATEST_VERSION, SpringMassStudy, StudyConfig, load_json, load_yaml,
    save_yaml, validate_config,
};
pub use error::{StudyError, StudyResult};
pub use harness::{
    BuckRun, RunSummary, SpringMassRun, run_buck_study, run_spring_mass_study,
    run_spring_mass_study_with,
};
pub use plot::{Figure, Panel, PlotSeries, buck_figure, spring_mass_figure, study_figures};
