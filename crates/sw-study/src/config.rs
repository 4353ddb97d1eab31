//! Study configuration: file format, defaults and validation.
//!
//! Every field defaults to the constants of the reference experiment, so an
//! empty document (or no document at all) reproduces it.

use serde::{Deserialize, Serialize};
use std::path::Path;
use sw_models::{BuckParams, SpringMassParams, SpringMassState};
use sw_sim::{BackwardEulerConfig, EulerMethod, SpringMassOptions};

use crate::error::StudyResult;

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StudyConfig {
    pub version: u32,
    /// Run independent (h, method) combinations on the rayon pool
    pub parallel: bool,
    pub spring_mass: SpringMassStudy,
    pub buck: BuckStudy,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            version: LATEST_VERSION,
            parallel: true,
            spring_mass: SpringMassStudy::default(),
            buck: BuckStudy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpringMassStudy {
    #[serde(flatten)]
    pub params: SpringMassParams,
    /// Constant external force (N)
    pub force: f64,
    /// Simulated span per run (s)
    pub total_time: f64,
    /// Step sizes to compare (s), in plotting order
    pub step_sizes: Vec<f64>,
    pub initial: SpringMassState,
    pub backward: BackwardEulerConfig,
}

impl Default for SpringMassStudy {
    fn default() -> Self {
        Self {
            params: SpringMassParams::default(),
            force: 1.0,
            total_time: 13.0,
            step_sizes: vec![0.01, 0.1, 0.25, 0.5, 0.75, 1.0],
            initial: SpringMassState::default(),
            backward: BackwardEulerConfig::default(),
        }
    }
}

impl SpringMassStudy {
    /// Driver options for one (h, method) combination.
    pub fn options(&self, h: f64, method: EulerMethod) -> SpringMassOptions {
        SpringMassOptions {
            h,
            total_time: self.total_time,
            method,
            backward: self.backward,
            initial: self.initial,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BuckStudy {
    #[serde(flatten)]
    pub params: BuckParams,
    /// Grid start (s)
    pub t_start: f64,
    /// Grid end, exclusive (s)
    pub t_end: f64,
    /// Grid spacing (s)
    pub dt: f64,
    /// `[iL, uC]` at `t_start`
    pub initial: Vec<f64>,
}

impl Default for BuckStudy {
    fn default() -> Self {
        Self {
            params: BuckParams::default(),
            t_start: 0.0,
            t_end: 0.01,
            dt: 1e-5,
            initial: vec![0.0, 0.0],
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive and finite"))
    }
}

/// Check a configuration before any run is started.
///
/// Zero mass, inductance or capacitance pass: they are degenerate physics,
/// reported later as non-finite trajectories.
pub fn validate_config(config: &StudyConfig) -> Result<(), ConfigError> {
    if config.version == 0 || config.version > LATEST_VERSION {
        return Err(ConfigError::UnsupportedVersion {
            version: config.version,
        });
    }

    let sm = &config.spring_mass;
    if sm.step_sizes.is_empty() {
        return Err(invalid("spring_mass.step_sizes", "[]", "at least one step size"));
    }
    for &h in &sm.step_sizes {
        require_positive("spring_mass.step_sizes", h)?;
    }
    if !sm.total_time.is_finite() || sm.total_time < 0.0 {
        return Err(invalid(
            "spring_mass.total_time",
            sm.total_time,
            "must be non-negative and finite",
        ));
    }
    for &h in &sm.step_sizes {
        let reason = match sw_core::step_count(sm.total_time, h) {
            Ok(0) => "longer than total_time",
            Err(_) => "too many samples",
            Ok(_) => continue,
        };
        return Err(invalid("spring_mass.step_sizes", h, reason));
    }
    if sm.backward.iterations == 0 {
        return Err(invalid("spring_mass.backward.iterations", 0, "must be at least 1"));
    }
    if let Some(tol) = sm.backward.tolerance {
        require_positive("spring_mass.backward.tolerance", tol)?;
    }

    let buck = &config.buck;
    require_positive("buck.dt", buck.dt)?;
    if !buck.t_start.is_finite() || !buck.t_end.is_finite() || buck.t_end <= buck.t_start {
        return Err(invalid("buck.t_end", buck.t_end, "must be after t_start"));
    }
    if sw_core::interval_count(buck.t_end - buck.t_start, buck.dt).is_err() {
        return Err(invalid("buck.dt", buck.dt, "too many samples"));
    }
    if buck.initial.len() != 2 {
        return Err(invalid(
            "buck.initial",
            buck.initial.len(),
            "needs exactly [iL, uC]",
        ));
    }

    Ok(())
}

pub fn load_yaml(path: &Path) -> StudyResult<StudyConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: StudyConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &StudyConfig) -> StudyResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> StudyResult<StudyConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: StudyConfig = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}
