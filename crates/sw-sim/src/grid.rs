//! Time grids for grid-driven integration.

use crate::error::{SimError, SimResult};
use sw_core::{MAX_SAMPLES, ensure_positive, interval_count};

/// Strictly increasing, finite sequence of sample times.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeGrid {
    points: Vec<f64>,
}

impl TimeGrid {
    /// Arbitrary (possibly non-uniform) grid.
    pub fn from_points(points: Vec<f64>) -> SimResult<Self> {
        if points.is_empty() {
            return Err(SimError::InvalidArg {
                what: "time grid must contain at least one point",
            });
        }
        if points.iter().any(|t| !t.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "time grid points must be finite",
            });
        }
        if points.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SimError::InvalidArg {
                what: "time grid must be strictly increasing",
            });
        }
        Ok(Self { points })
    }

    /// Half-open uniform grid `[start, end)` with spacing `dt`.
    ///
    /// Holds `ceil((end - start) / dt)` points, `t_i = start + i * dt`.
    pub fn arange(start: f64, end: f64, dt: f64) -> SimResult<Self> {
        let dt = ensure_positive(dt, "dt")?;
        if !start.is_finite() || !end.is_finite() {
            return Err(SimError::InvalidArg {
                what: "grid bounds must be finite",
            });
        }
        if end <= start {
            return Err(SimError::InvalidArg {
                what: "grid end must be after start",
            });
        }
        let n = interval_count(end - start, dt)?;
        let points = (0..n).map(|i| start + i as f64 * dt).collect();
        Self::from_points(points)
    }

    /// `n` points `t_i = i * h` starting at zero.
    pub fn uniform_steps(h: f64, n: usize) -> SimResult<Self> {
        let h = ensure_positive(h, "h")?;
        if n > MAX_SAMPLES {
            return Err(SimError::InvalidArg {
                what: "sample count exceeds MAX_SAMPLES",
            });
        }
        Self::from_points((0..n).map(|i| i as f64 * h).collect())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> f64 {
        self.points[0]
    }

    pub fn end(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().copied()
    }

    /// Consecutive `(t_prev, dt)` pairs.
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1] - w[0]))
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_core::CoreError;

    #[test]
    fn arange_matches_half_open_count() {
        let grid = TimeGrid::arange(0.0, 0.01, 1e-5).unwrap();
        assert_eq!(grid.len(), 1000);
        assert_eq!(grid.start(), 0.0);
        assert!((grid.end() - 0.00999).abs() < 1e-15);
    }

    #[test]
    fn arange_rejects_bad_bounds() {
        assert!(TimeGrid::arange(0.0, 0.0, 1e-3).is_err());
        assert!(TimeGrid::arange(1.0, 0.0, 1e-3).is_err());
        assert!(TimeGrid::arange(0.0, 1.0, 0.0).is_err());
        assert!(TimeGrid::arange(0.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn oversized_grids_are_refused() {
        assert!(matches!(
            TimeGrid::arange(0.0, 0.01, 1e-300),
            Err(SimError::Core(CoreError::InvalidArg { .. }))
        ));
        assert!(matches!(
            TimeGrid::uniform_steps(1.0, MAX_SAMPLES + 1),
            Err(SimError::InvalidArg { .. })
        ));
    }

    #[test]
    fn from_points_requires_strict_increase() {
        assert!(TimeGrid::from_points(vec![]).is_err());
        assert!(TimeGrid::from_points(vec![0.0, 1.0, 1.0]).is_err());
        assert!(TimeGrid::from_points(vec![0.0, f64::NAN]).is_err());
        assert!(TimeGrid::from_points(vec![0.0, 0.1, 0.5, 0.6]).is_ok());
    }

    #[test]
    fn intervals_follow_non_uniform_spacing() {
        let grid = TimeGrid::from_points(vec![0.0, 0.5, 2.0]).unwrap();
        let dts: Vec<_> = grid.intervals().collect();
        assert_eq!(dts, vec![(0.0, 0.5), (0.5, 1.5)]);
    }

    #[test]
    fn uniform_steps_recompute_time() {
        let grid = TimeGrid::uniform_steps(0.1, 4).unwrap();
        assert_eq!(grid.as_slice(), &[0.0, 0.1, 0.2, 0.30000000000000004]);
    }
}
