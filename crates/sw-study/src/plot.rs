//! Visualization boundary.
//!
//! Renderers receive plain `(t, y)` sequences grouped into panels. Nothing
//! non-finite crosses this boundary: building a series fails with
//! [`StudyError::NonFinite`] on the first NaN or infinity.

use crate::error::{StudyError, StudyResult};
use crate::harness::{BuckRun, SpringMassRun};
use serde::Serialize;
use sw_models::BuckConverter;
use sw_sim::EulerMethod;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlotSeries {
    pub group: String,
    pub label: String,
    pub t: Vec<f64>,
    pub y: Vec<f64>,
}

impl PlotSeries {
    pub fn new(
        group: impl Into<String>,
        label: impl Into<String>,
        t: Vec<f64>,
        y: Vec<f64>,
    ) -> StudyResult<Self> {
        let series = Self {
            group: group.into(),
            label: label.into(),
            t,
            y,
        };
        series.check()?;
        Ok(series)
    }

    fn name(&self) -> String {
        format!("{}: {}", self.group, self.label)
    }

    fn check(&self) -> StudyResult<()> {
        if self.t.len() != self.y.len() {
            return Err(StudyError::RaggedSeries {
                series: self.name(),
                times: self.t.len(),
                values: self.y.len(),
            });
        }
        let bad = self
            .t
            .iter()
            .zip(&self.y)
            .position(|(t, y)| !t.is_finite() || !y.is_finite());
        match bad {
            Some(index) => {
                tracing::warn!(
                    group = %self.group,
                    series = %self.label,
                    index,
                    "non-finite sample withheld from plotting"
                );
                Err(StudyError::NonFinite {
                    series: self.name(),
                    index,
                    t: self.t[index],
                })
            }
            None => Ok(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub series: Vec<PlotSeries>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub panels: Vec<Panel>,
}

/// Position traces, one panel per Euler variant, one line per step size.
pub fn spring_mass_figure(runs: &[SpringMassRun]) -> StudyResult<Figure> {
    let mut panels = Vec::with_capacity(EulerMethod::ALL.len());
    for method in EulerMethod::ALL {
        let series = runs
            .iter()
            .filter(|run| run.method == method)
            .map(|run| {
                PlotSeries::new(
                    method.label(),
                    format!("h = {}", run.h),
                    run.record.t.clone(),
                    run.record.x.clone(),
                )
            })
            .collect::<StudyResult<Vec<_>>>()?;
        panels.push(Panel {
            title: format!("Using {} Step", method.label()),
            series,
        });
    }

    Ok(Figure {
        title: "Mass-spring system under constant external force".to_string(),
        panels,
    })
}

/// Inductor current and capacitor voltage of the RK4 run.
pub fn buck_figure(run: &BuckRun) -> StudyResult<Figure> {
    let traj = &run.trajectory;
    let series = vec![
        PlotSeries::new(
            "Buck RK4",
            "iL",
            traj.t.clone(),
            traj.component(BuckConverter::CURRENT),
        )?,
        PlotSeries::new(
            "Buck RK4",
            "uC",
            traj.t.clone(),
            traj.component(BuckConverter::VOLTAGE),
        )?,
    ];

    Ok(Figure {
        title: "Numerical solution - RK4".to_string(),
        panels: vec![Panel {
            title: "Buck converter - RK4".to_string(),
            series,
        }],
    })
}

/// Every figure of a study, or the first boundary error.
///
/// Nothing is returned unless all runs pass, so callers never hand a partial
/// set of figures to a renderer or a file.
pub fn study_figures(
    spring_mass: &[SpringMassRun],
    buck: Option<&BuckRun>,
) -> StudyResult<Vec<Figure>> {
    let mut figures = Vec::with_capacity(2);
    if !spring_mass.is_empty() {
        figures.push(spring_mass_figure(spring_mass)?);
    }
    if let Some(run) = buck {
        figures.push(buck_figure(run)?);
    }
    Ok(figures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_rejects_nan() {
        let err = PlotSeries::new("g", "s", vec![0.0, 1.0, 2.0], vec![0.0, f64::NAN, 1.0])
            .unwrap_err();
        match err {
            StudyError::NonFinite { series, index, t } => {
                assert_eq!(series, "g: s");
                assert_eq!(index, 1);
                assert_eq!(t, 1.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn series_rejects_length_mismatch() {
        let err = PlotSeries::new("g", "s", vec![0.0, 1.0, 2.0], vec![0.0, 1.0]).unwrap_err();
        assert!(matches!(
            err,
            StudyError::RaggedSeries {
                times: 3,
                values: 2,
                ..
            }
        ));
    }

    #[test]
    fn series_accepts_finite_values() {
        let s = PlotSeries::new("g", "s", vec![0.0, 1.0], vec![2.0, 3.0]).unwrap();
        assert_eq!(s.y, vec![2.0, 3.0]);
    }
}
