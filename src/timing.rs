//! Charge-time relations for a comparator-thresholded RC timer.
//!
//! A capacitor `C` charges towards the supply through `R3`. The comparator trips once the
//! capacitor voltage crosses a threshold set by the divider `R1`/`R2`. Working in fractions of
//! the supply, the whole circuit reduces to `ratio = exp(-T / (R3 * C))`, where `ratio` is the
//! divider's `R2 / (R1 + R2)`.

use crate::config::SearchConfig;

/// Threshold fraction at which a capacitor charging through `r3` trips after `duration` seconds.
pub fn charge_ratio(r3: f64, capacitance: f64, duration: f64) -> f64 {
    (-duration / (r3 * capacitance)).exp()
}

/// Fraction of the supply at the junction of a divider with `r1` on top and `r2` below.
pub fn divider_ratio(r1: f64, r2: f64) -> f64 {
    r2 / (r1 + r2)
}

/// Lower divider resistor that pairs with `r1` to give `ratio` exactly.
pub fn ideal_lower_resistor(r1: f64, ratio: f64) -> f64 {
    r1 * (1.0 - ratio) / ratio
}

/// Timing resistor that realises `duration` for a given divider ratio.
pub fn timing_resistor(ratio: f64, capacitance: f64, duration: f64) -> f64 {
    -duration / (capacitance * ratio.ln())
}

/// Delay produced by timing resistor `r3` with a divider ratio of `ratio`.
pub fn charge_time(ratio: f64, r3: f64, capacitance: f64) -> f64 {
    -ratio.ln() * r3 * capacitance
}

/// Whether `ratio` lies strictly inside the configured usable band.
pub fn ratio_in_band(ratio: f64, cfg: &SearchConfig) -> bool {
    cfg.ratio_min < ratio && ratio < cfg.ratio_max
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn half_supply_is_ln2_time_constants() {
        let t = charge_time(0.5, 10_000.0, 10e-6);
        assert!((t - 0.1 * 2f64.ln()).abs() < EPS, "t = {}", t);
    }

    #[test]
    fn timing_resistor_inverts_charge_time() {
        let r3 = timing_resistor(0.3, 4.7e-6, 0.25);
        let t = charge_time(0.3, r3, 4.7e-6);
        assert!((t - 0.25).abs() < EPS, "t = {}", t);
    }

    #[test]
    fn charge_ratio_matches_charge_time() {
        let ratio = charge_ratio(22_000.0, 1e-6, 0.01);
        let t = charge_time(ratio, 22_000.0, 1e-6);
        assert!((t - 0.01).abs() < EPS, "t = {}", t);
    }

    #[test]
    fn ideal_lower_resistor_hits_ratio() {
        let r2 = ideal_lower_resistor(3300.0, 0.25);
        assert!((divider_ratio(3300.0, r2) - 0.25).abs() < EPS);
    }

    #[test]
    fn band_is_exclusive() {
        let cfg = SearchConfig::default();
        assert!(!ratio_in_band(0.01, &cfg));
        assert!(!ratio_in_band(0.99, &cfg));
        assert!(ratio_in_band(0.5, &cfg));
        assert!(!ratio_in_band(1.0, &cfg));
        assert!(!ratio_in_band(0.0, &cfg));
    }
}
