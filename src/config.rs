//! Bounds applied during the resistor search.

use crate::error::TimerError;

/// Lowest comparator threshold, as a fraction of supply, considered usable.
pub const DEFAULT_RATIO_MIN: f64 = 0.01;
/// Highest comparator threshold, as a fraction of supply, considered usable.
pub const DEFAULT_RATIO_MAX: f64 = 0.99;
/// Smallest upper divider resistor tried.
pub const DEFAULT_DIVIDER_MIN: f64 = 1_000.0;
/// Largest upper divider resistor tried.
pub const DEFAULT_DIVIDER_MAX: f64 = 10_000.0;

/// Search bounds.
///
/// A seed ratio must lie strictly inside `(ratio_min, ratio_max)`, and R1 is drawn from the
/// table values in the inclusive range `[divider_min, divider_max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub ratio_min: f64,
    pub ratio_max: f64,
    pub divider_min: f64,
    pub divider_max: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            ratio_min: DEFAULT_RATIO_MIN,
            ratio_max: DEFAULT_RATIO_MAX,
            divider_min: DEFAULT_DIVIDER_MIN,
            divider_max: DEFAULT_DIVIDER_MAX,
        }
    }
}

impl SearchConfig {
    pub fn ratio_band(mut self, min: f64, max: f64) -> Self {
        self.ratio_min = min;
        self.ratio_max = max;
        self
    }

    pub fn divider_range(mut self, min: f64, max: f64) -> Self {
        self.divider_min = min;
        self.divider_max = max;
        self
    }

    /// Checks the bounds describe a non-empty search space.
    pub fn validate(&self) -> Result<(), TimerError> {
        let SearchConfig {
            ratio_min,
            ratio_max,
            divider_min,
            divider_max,
        } = *self;
        if !(0.0 <= ratio_min && ratio_min < ratio_max && ratio_max <= 1.0) {
            return Err(TimerError::InvalidConfig(format!(
                "ratio band ({}, {}) must satisfy 0 <= min < max <= 1",
                ratio_min, ratio_max
            )));
        }
        if !(divider_min > 0.0 && divider_min <= divider_max && divider_max.is_finite()) {
            return Err(TimerError::InvalidConfig(format!(
                "R1 range [{}, {}] must be positive and ordered",
                divider_min, divider_max
            )));
        }
        Ok(())
    }
}
