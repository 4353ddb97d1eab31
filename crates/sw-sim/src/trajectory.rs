//! Materialized simulation output.

use crate::error::{SimError, SimResult};
use nalgebra::{DMatrix, DVector};

/// Ordered `(t, x)` samples, one per grid point.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<DVector<f64>>,
}

impl Trajectory {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            t: Vec::with_capacity(n),
            x: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, t: f64, x: DVector<f64>) {
        self.t.push(t);
        self.x.push(x);
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn last(&self) -> Option<(f64, &DVector<f64>)> {
        self.t.last().copied().zip(self.x.last())
    }

    /// Time series of state component `i`.
    pub fn component(&self, i: usize) -> Vec<f64> {
        self.x.iter().map(|x| x[i]).collect()
    }

    /// States as columns of an `n x N` matrix.
    pub fn to_matrix(&self) -> DMatrix<f64> {
        let rows = self.x.first().map_or(0, |x| x.len());
        DMatrix::from_fn(rows, self.len(), |r, c| self.x[c][r])
    }

    /// First sample holding a NaN or infinity, as an error.
    pub fn ensure_finite(&self) -> SimResult<()> {
        match self.x.iter().position(|x| x.iter().any(|v| !v.is_finite())) {
            Some(index) => Err(SimError::NonFinite {
                index,
                t: self.t[index],
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trajectory {
        let mut traj = Trajectory::with_capacity(2);
        traj.push(0.0, DVector::from_column_slice(&[1.0, 2.0]));
        traj.push(0.5, DVector::from_column_slice(&[3.0, 4.0]));
        traj
    }

    #[test]
    fn components_and_matrix_layout() {
        let traj = sample();
        assert_eq!(traj.component(1), vec![2.0, 4.0]);
        let m = traj.to_matrix();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m[(0, 1)], 3.0);
        assert_eq!(traj.last().map(|(t, _)| t), Some(0.5));
    }

    #[test]
    fn ensure_finite_reports_first_bad_sample() {
        let mut traj = sample();
        traj.push(1.0, DVector::from_column_slice(&[f64::NAN, 0.0]));
        traj.push(1.5, DVector::from_column_slice(&[f64::INFINITY, 0.0]));
        assert_eq!(
            traj.ensure_finite(),
            Err(SimError::NonFinite { index: 2, t: 1.0 })
        );
        assert!(sample().ensure_finite().is_ok());
    }
}
