//! Rate-of-flow estimation from water levels
//!
//! Manual entries only carry the initial and final water levels; the rate of
//! flow is derived by a [`FlowRateEstimator`]. The store itself only checks that
//! the resulting value is finite, so a calibrated physical model can replace
//! the level-difference estimator without touching the core.

use crate::{Error, Result};

/// Derives a rate of flow (m³/s) from initial and final water levels (m)
pub trait FlowRateEstimator {
    fn estimate(&self, initial_level: f64, final_level: f64) -> Result<f64>;
}

/// `(final_level - initial_level) * factor`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelDifferenceEstimator {
    factor: f64,
}

impl LevelDifferenceEstimator {
    pub fn new(factor: f64) -> Result<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(Error::configuration(format!(
                "Flow factor must be a positive finite number, got {}",
                factor
            )));
        }
        Ok(Self { factor })
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl FlowRateEstimator for LevelDifferenceEstimator {
    fn estimate(&self, initial_level: f64, final_level: f64) -> Result<f64> {
        for (name, level) in [("initial", initial_level), ("final", final_level)] {
            if !level.is_finite() || level < 0.0 {
                return Err(Error::validation(format!(
                    "Invalid {} water level {}: must be a non-negative number",
                    name, level
                )));
            }
        }

        let rate = (final_level - initial_level) * self.factor;
        if !rate.is_finite() {
            return Err(Error::validation(format!(
                "Estimated rate of flow is not finite for levels {} -> {}",
                initial_level, final_level
            )));
        }

        Ok(rate)
    }
}
