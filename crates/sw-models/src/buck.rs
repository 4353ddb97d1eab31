//! Buck (step-down) DC-DC converter as a second-order RLC circuit.
//!
//! States are the inductor current `iL` and capacitor voltage `uC`:
//!
//! ```text
//! diL/dt = (U - uC) / L
//! duC/dt = (iL - uC / R) / C
//! ```

use crate::model::OdeModel;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use sw_core::units::{Capacitance, Inductance, Resistance, Voltage};

/// Circuit constants (SI).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuckParams {
    /// Inductance (H)
    pub inductance: f64,
    /// Output capacitance (F)
    pub capacitance: f64,
    /// Load resistance (Ω)
    pub resistance: f64,
    /// Source voltage (V)
    pub source_voltage: f64,
}

impl Default for BuckParams {
    fn default() -> Self {
        Self {
            inductance: 1e-4,
            capacitance: 1e-4,
            resistance: 10.0,
            source_voltage: 12.0,
        }
    }
}

impl BuckParams {
    pub fn from_quantities(
        inductance: Inductance,
        capacitance: Capacitance,
        resistance: Resistance,
        source_voltage: Voltage,
    ) -> Self {
        use uom::si::capacitance::farad;
        use uom::si::electric_potential::volt;
        use uom::si::electrical_resistance::ohm;
        use uom::si::inductance::henry;

        Self {
            inductance: inductance.get::<henry>(),
            capacitance: capacitance.get::<farad>(),
            resistance: resistance.get::<ohm>(),
            source_voltage: source_voltage.get::<volt>(),
        }
    }
}

/// Buck converter model.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuckConverter {
    pub params: BuckParams,
}

impl BuckConverter {
    pub const CURRENT: usize = 0;
    pub const VOLTAGE: usize = 1;

    pub fn new(params: BuckParams) -> Self {
        Self { params }
    }

    /// Equilibrium `(iL, uC) = (U / R, U)`.
    pub fn steady_state(&self) -> (f64, f64) {
        let p = &self.params;
        (p.source_voltage / p.resistance, p.source_voltage)
    }
}

impl OdeModel for BuckConverter {
    fn dim(&self) -> usize {
        2
    }

    fn derivative(&self, _t: f64, x: &DVector<f64>) -> DVector<f64> {
        let p = &self.params;
        let i_l = x[Self::CURRENT];
        let u_c = x[Self::VOLTAGE];
        let di = (p.source_voltage - u_c) / p.inductance;
        let du = (i_l - u_c / p.resistance) / p.capacitance;
        DVector::from_column_slice(&[di, du])
    }

    fn name(&self) -> &str {
        "buck"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_core::units::{farad, henry, ohm, volt};

    #[test]
    fn derivative_from_rest() {
        let model = BuckConverter::default();
        let dx = model.derivative(0.0, &DVector::zeros(2));
        assert!((dx[BuckConverter::CURRENT] - 12.0 / 1e-4).abs() < 1e-6);
        assert_eq!(dx[BuckConverter::VOLTAGE], 0.0);
    }

    #[test]
    fn steady_state_is_an_equilibrium() {
        let model = BuckConverter::default();
        let (i, u) = model.steady_state();
        assert!((i - 1.2).abs() < 1e-12);
        assert_eq!(u, 12.0);
        let dx = model.derivative(0.0, &DVector::from_column_slice(&[i, u]));
        assert!(dx.amax() < 1e-9);
    }

    #[test]
    fn zero_capacitance_is_not_guarded() {
        let model = BuckConverter::new(BuckParams {
            capacitance: 0.0,
            ..BuckParams::default()
        });
        let dx = model.derivative(0.0, &DVector::from_column_slice(&[1.0, 0.0]));
        assert!(!dx[BuckConverter::VOLTAGE].is_finite());
    }

    #[test]
    fn typed_constructor_matches_defaults() {
        let params =
            BuckParams::from_quantities(henry(1e-4), farad(1e-4), ohm(10.0), volt(12.0));
        assert_eq!(params, BuckParams::default());
    }
}
