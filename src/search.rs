//! The resistor search and its result.

use std::fmt;

use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, trace};

use crate::config::SearchConfig;
use crate::error::TimerError;
use crate::timing::{
    charge_ratio, charge_time, divider_ratio, ideal_lower_resistor, ratio_in_band,
    timing_resistor,
};
use crate::{format_resistance, format_si, RSeries, E24};

/// A chosen set of timer resistors along with how well they hit the requested delay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSolution {
    /// Upper divider resistor, ohms.
    pub r1: f64,
    /// Lower divider resistor, ohms.
    pub r2: f64,
    /// Timing resistor, ohms.
    pub r3: f64,
    /// `R2 / (R1 + R2)` for the chosen divider.
    pub achieved_ratio: f64,
    /// Delay these parts actually produce, seconds.
    pub achieved_time: f64,
    /// `|achieved_time - duration|`, seconds.
    pub deviation: f64,
    /// Requested delay, seconds.
    pub duration: f64,
    /// Timing capacitor, farads.
    pub capacitance: f64,
}

impl TimerSolution {
    /// Evaluates a resistor triple against the requested delay.
    pub fn from_triple(r1: f64, r2: f64, r3: f64, duration: f64, capacitance: f64) -> Self {
        let achieved_ratio = divider_ratio(r1, r2);
        let achieved_time = charge_time(achieved_ratio, r3, capacitance);
        TimerSolution {
            r1,
            r2,
            r3,
            achieved_ratio,
            achieved_time,
            deviation: (achieved_time - duration).abs(),
            duration,
            capacitance,
        }
    }

    /// Deviation as a fraction of the requested delay.
    pub fn relative_error(&self) -> f64 {
        self.deviation / self.duration
    }

    pub fn triple(&self) -> (f64, f64, f64) {
        (self.r1, self.r2, self.r3)
    }
}

impl fmt::Display for TimerSolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            write!(
                f,
                "R1: {}, R2: {}, R3: {}, Ratio: {:.6}, Time: {}, Deviation: {}",
                format_resistance(self.r1),
                format_resistance(self.r2),
                format_resistance(self.r3),
                self.achieved_ratio,
                format_si(self.achieved_time, "s"),
                format_si(self.deviation, "s"),
            )
        } else {
            write!(
                f,
                "R1 = {}\nR2 = {}\nR3 = {}\nTime Deviation = {}",
                format_resistance(self.r1),
                format_resistance(self.r2),
                format_resistance(self.r3),
                format_si(self.deviation, "s"),
            )
        }
    }
}

/// What a search produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Solved(TimerSolution),
    /// No candidate ever put the threshold inside the usable band.
    NoFeasibleConfiguration { duration: f64, capacitance: f64 },
}

impl SearchOutcome {
    pub fn solution(&self) -> Option<&TimerSolution> {
        match self {
            SearchOutcome::Solved(sol) => Some(sol),
            SearchOutcome::NoFeasibleConfiguration { .. } => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.solution().is_some()
    }

    pub fn into_result(self) -> Result<TimerSolution, TimerError> {
        match self {
            SearchOutcome::Solved(sol) => Ok(sol),
            SearchOutcome::NoFeasibleConfiguration {
                duration,
                capacitance,
            } => Err(TimerError::NoFeasibleConfiguration {
                duration,
                capacitance,
            }),
        }
    }
}

/// Best triple seen so far during a search. Starts empty with an infinite deviation and only
/// ever moves to strictly smaller deviations.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    best: Option<(f64, f64, f64)>,
    min_deviation: f64,
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState {
            best: None,
            min_deviation: f64::INFINITY,
        }
    }
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `triple` if it beats the current best. Equal deviations keep the earlier triple.
    pub fn offer(&mut self, triple: (f64, f64, f64), deviation: f64) -> bool {
        if deviation < self.min_deviation {
            self.min_deviation = deviation;
            self.best = Some(triple);
            true
        } else {
            false
        }
    }

    pub fn best(&self) -> Option<(f64, f64, f64)> {
        self.best
    }

    pub fn min_deviation(&self) -> f64 {
        self.min_deviation
    }

    /// Builds the reported outcome, re-evaluating the stored triple.
    pub fn finish(self, duration: f64, capacitance: f64) -> SearchOutcome {
        match self.best {
            Some((r1, r2, r3)) => SearchOutcome::Solved(TimerSolution::from_triple(
                r1,
                r2,
                r3,
                duration,
                capacitance,
            )),
            None => SearchOutcome::NoFeasibleConfiguration {
                duration,
                capacitance,
            },
        }
    }
}

/// Searches a resistor series for the timer triple closest to a requested delay.
#[derive(Debug, Clone)]
pub struct TimerCalc<'a> {
    series: &'a RSeries,
    config: SearchConfig,
}

impl<'a> TimerCalc<'a> {
    /// Creates a calculator drawing every resistor from `series`, with default bounds.
    /// # Examples
    /// ```
    ///     # use rc_timer_calc::*;
    ///     let calc = TimerCalc::new(&E24)
    ///         .with_config(SearchConfig::default().ratio_band(0.1, 0.9));
    ///     let sol = calc.search(0.5, 47.0 * 1e-6).into_result().unwrap();
    ///     assert_eq!(sol.triple(), (3300.0, 4700.0, 20_000.0));
    /// ```
    pub fn new(series: &'a RSeries) -> Self {
        TimerCalc {
            series,
            config: SearchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Number of (seed, R1) pairs a search would walk if every seed were in band.
    pub fn combinations(&self) -> usize {
        self.series.len()
            * self
                .series
                .within(self.config.divider_min, self.config.divider_max)
                .count()
    }

    /// Like [`TimerCalc::search`], but first rejects a configuration with an empty search space.
    pub fn try_search(&self, duration: f64, capacitance: f64) -> Result<TimerSolution, TimerError> {
        self.config.validate()?;
        self.search(duration, capacitance).into_result()
    }

    /// Finds the triple whose delay is closest to `duration` seconds with a capacitor of
    /// `capacitance` farads.
    ///
    /// Every series value is tried as a seed R3. A seed yields the threshold ratio
    /// `exp(-T / (R3 * C))`, and seeds whose ratio falls outside the configured band are
    /// dropped. For each kept ratio and each R1 in the divider range, R2 is snapped to the
    /// series, the divider ratio actually achieved is recomputed, and R3 is re-derived from it
    /// and snapped. That re-derived R3 is the one reported; the seed only picks a ratio to try.
    pub fn search(&self, duration: f64, capacitance: f64) -> SearchOutcome {
        let cfg = &self.config;
        let series = self.series;

        let seeds = series.iter().filter_map(|&seed| {
            let ratio = charge_ratio(seed, capacitance, duration);
            if ratio_in_band(ratio, cfg) {
                Some(ratio)
            } else {
                debug!(r3 = seed, ratio, "seed out of band");
                None
            }
        });

        let mut state = SearchState::new();
        for (ratio, r1) in seeds.cartesian_product(series.within(cfg.divider_min, cfg.divider_max))
        {
            let r2 = series.nearest(ideal_lower_resistor(r1, ratio));
            let achieved = divider_ratio(r1, r2);
            let r3 = series.nearest(timing_resistor(achieved, capacitance, duration));
            let deviation = (charge_time(achieved, r3, capacitance) - duration).abs();
            if state.offer((r1, r2, r3), deviation) {
                trace!(r1, r2, r3, deviation, "new best");
            }
        }

        debug!(
            duration,
            capacitance,
            best = ?state.best(),
            deviation = state.min_deviation(),
            "search finished"
        );
        state.finish(duration, capacitance)
    }
}

/// Searches the E24 table with default bounds.
///
/// `duration` is in seconds, `capacitance` in farads.
pub fn search(duration: f64, capacitance: f64) -> SearchOutcome {
    TimerCalc::new(&E24).search(duration, capacitance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_state_is_infeasible() {
        let out = SearchState::new().finish(1.0, 1e-6);
        assert_eq!(
            out,
            SearchOutcome::NoFeasibleConfiguration {
                duration: 1.0,
                capacitance: 1e-6
            }
        );
        assert!(out.into_result().unwrap_err().is_infeasible());
    }

    #[test]
    fn state_only_moves_down() {
        let mut state = SearchState::new();
        assert!(state.offer((1000.0, 1000.0, 10_000.0), 0.5));
        assert!(!state.offer((2000.0, 2000.0, 10_000.0), 0.5));
        assert!(!state.offer((3000.0, 3000.0, 10_000.0), 0.7));
        assert!(!state.offer((3000.0, 3000.0, 10_000.0), f64::NAN));
        assert!(state.offer((4700.0, 4700.0, 10_000.0), 0.1));
        assert_eq!(state.best(), Some((4700.0, 4700.0, 10_000.0)));
        assert_eq!(state.min_deviation(), 0.1);
    }

    #[test]
    fn half_supply_divider() {
        let sol = search(0.069315, 10.0 * 1e-6).into_result().unwrap();
        assert_eq!(sol.r1, 1000.0);
        assert_eq!(sol.r2, 1000.0);
        assert_eq!(sol.r3, 10_000.0);
        assert_eq!(sol.achieved_ratio, 0.5);
        assert!(sol.deviation < 1e-6, "deviation = {}", sol.deviation);
    }

    #[test]
    fn reported_numbers_match_the_winning_iteration() {
        let mut state = SearchState::new();
        let (t, c) = (0.5, 47e-6);
        for r1 in E24.within(1000.0, 10_000.0) {
            for seed in E24.iter() {
                let ratio = charge_ratio(*seed, c, t);
                if !ratio_in_band(ratio, &SearchConfig::default()) {
                    continue;
                }
                let r2 = E24.nearest(ideal_lower_resistor(r1, ratio));
                let rho = divider_ratio(r1, r2);
                let r3 = E24.nearest(timing_resistor(rho, c, t));
                state.offer((r1, r2, r3), (charge_time(rho, r3, c) - t).abs());
            }
        }
        let min = state.min_deviation();
        let sol = search(t, c).into_result().unwrap();
        assert_eq!(sol.deviation.to_bits(), min.to_bits());
    }

    #[test]
    fn narrower_band_drops_seeds() {
        // With 10uF the largest seed gives exp(-1 / 0.91) = 0.33, under the narrowed band.
        assert!(search(1.0, 10e-6).is_solved());
        let calc = TimerCalc::new(&E24).with_config(SearchConfig::default().ratio_band(0.4, 0.6));
        assert!(!calc.search(1.0, 10e-6).is_solved());
    }

    #[test]
    fn invalid_config_is_rejected_before_searching() {
        let calc = TimerCalc::new(&E24).with_config(SearchConfig::default().ratio_band(0.6, 0.4));
        match calc.try_search(0.069315, 10e-6) {
            Err(TimerError::InvalidConfig(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn config_is_kept() {
        let cfg = SearchConfig::default().divider_range(2200.0, 4700.0);
        let calc = TimerCalc::new(&E24).with_config(cfg);
        assert_eq!(calc.config(), &cfg);
        assert_eq!(TimerCalc::new(&E24).config(), &SearchConfig::default());
        let sol = calc.search(0.5, 47.0 * 1e-6).into_result().unwrap();
        assert!((2200.0..=4700.0).contains(&sol.r1));
    }

    #[test]
    fn combinations_counts_seed_and_r1_pairs() {
        assert_eq!(TimerCalc::new(&E24).combinations(), 72 * 25);
    }

    #[test]
    fn display_forms() {
        let sol = TimerSolution::from_triple(4700.0, 1000.0, 22_000.0, 0.05, 1e-6);
        let panel = format!("{}", sol);
        assert!(panel.starts_with("R1 = 4K7\nR2 = 1K\nR3 = 22K\nTime Deviation = "));
        assert_eq!(panel.lines().count(), 4);
        let line = format!("{:#}", sol);
        assert!(line.starts_with("R1: 4K7, R2: 1K, R3: 22K, Ratio: 0.175439"));
        assert!(!line.contains('\n'));
    }
}
