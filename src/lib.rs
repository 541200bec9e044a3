//! A resistor picker for RC charge timers.
//!
//! A capacitor charges through a timing resistor R3 while a comparator watches its voltage. The
//! comparator's threshold comes from a divider R1/R2 across the same supply, so the delay until
//! it trips is `T = -ln(R2 / (R1 + R2)) * R3 * C`. Given a desired delay and a capacitance this
//! crate finds the E24 values for R1, R2 and R3 that get closest to it.
//!
//! # Example
//! ```rust
//! extern crate rc_timer_calc;
//!
//! use rc_timer_calc::*;
//!
//! fn main() {
//!     // 69.3ms from a 10uF capacitor: a 1:1 divider and a 10K timing resistor.
//!     let req = SearchRequest::parse("0.069315", "10").expect("valid inputs");
//!     let sol = search(req.duration, req.capacitance)
//!         .into_result()
//!         .expect("Error: no resistor combination fits");
//!
//!     assert_eq!(sol.r1, sol.r2);
//!     assert_eq!(sol.r3, 10_000.0);
//!     assert!(sol.deviation < 1e-6);
//!     println!("{}", sol);
//! }
//! ```
//! Which prints:
//! ```text
//! R1 = 1K
//! R2 = 1K
//! R3 = 10K
//! Time Deviation = 281.9 ns
//! ```

extern crate itertools;
#[macro_use]
extern crate lazy_static;
#[cfg(feature = "expr_input")]
extern crate meval;
extern crate serde;
extern crate signifix;
extern crate thiserror;
extern crate tracing;

use itertools::Itertools;

pub mod config;
pub mod error;
pub mod input;
pub mod search;
pub mod timing;

pub use config::SearchConfig;
pub use error::TimerError;
pub use input::SearchRequest;
pub use search::{search, SearchOutcome, SearchState, TimerCalc, TimerSolution};

/// Decade multipliers covered by the value table: 100R up to 91K.
pub const DECADES: &[f64] = &[1e2, 1e3, 1e4];

/// The 24 mantissas of the E24 series.
pub const E24_BASE: &[f64] = &[
    1.0, 1.1, 1.2, 1.3, 1.5, 1.6, 1.8, 2.0, 2.2, 2.4, 2.7, 3.0, 3.3, 3.6, 3.9, 4.3, 4.7, 5.1, 5.6,
    6.2, 6.8, 7.5, 8.2, 9.1,
];

lazy_static! {
    /// RSeries constant for the E24 standard series over three decades, 72 values.
    pub static ref E24: RSeries = RSeries::new(E24_BASE);
}

/// A sorted table of standard resistor values.
#[derive(Debug)]
pub struct RSeries {
    values: Box<[f64]>,
}

impl RSeries {
    /// Defines a new series of resistor values. Only the decade mantissas need to be provided,
    /// each is multiplied out across [`DECADES`]. The result is sorted ascending with duplicates
    /// removed.
    /// # Example
    /// ```
    ///     # use rc_timer_calc::*;
    ///     let e3 = RSeries::new(&[1.0, 2.2, 4.7]);
    ///     assert_eq!(e3.len(), 9);
    ///     assert_eq!(e3.nearest(3000.0), 2200.0);
    /// ```
    pub fn new(mantissas: &[f64]) -> Self {
        RSeries {
            values: mantissas
                .iter()
                .cartesian_product(DECADES.iter())
                .map(|(val, pow)| val * pow)
                .sorted_by(|a, b| a.partial_cmp(b).expect("No NaNs"))
                .dedup()
                .collect::<Vec<f64>>()
                .into_boxed_slice(),
        }
    }

    /// Iterates the table in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &f64> + Clone {
        self.values.iter()
    }

    /// Values lying in the inclusive range `[lo, hi]`, ascending.
    pub fn within(&self, lo: f64, hi: f64) -> impl Iterator<Item = f64> + Clone + '_ {
        self.iter().cloned().filter(move |r| lo <= *r && *r <= hi)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Whether `r` is exactly one of the table's values.
    pub fn contains(&self, r: f64) -> bool {
        self.values.iter().any(|v| *v == r)
    }

    /// Snaps `v` to the closest value in the table.
    ///
    /// When `v` sits exactly halfway between two neighbours the smaller one is returned, the
    /// same answer as taking the first minimum of `|x - v|` over the ascending table.
    /// # Example
    /// ```
    ///     # use rc_timer_calc::*;
    ///     assert_eq!(E24.nearest(4650.0), 4700.0);
    ///     // Halfway between 1K and 1K1
    ///     assert_eq!(E24.nearest(1050.0), 1000.0);
    ///     // Clamped to the ends of the table
    ///     assert_eq!(E24.nearest(1.0), 100.0);
    ///     assert_eq!(E24.nearest(1e9), 91_000.0);
    /// ```
    pub fn nearest(&self, v: f64) -> f64 {
        let vals = &self.values;
        let idx = vals.partition_point(|x| *x < v);
        if idx == 0 {
            return vals[0];
        }
        if idx == vals.len() {
            return vals[idx - 1];
        }
        let (lo, hi) = (vals[idx - 1], vals[idx]);
        if (v - lo).abs() <= (hi - v).abs() {
            lo
        } else {
            hi
        }
    }
}

fn _format_rval(r: f64, unit: &str) -> String {
    let mut val = format!("{:.2}", r);
    if val.contains('.') {
        val = val.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    if val.contains('.') {
        val.replace(".", unit)
    } else {
        val.push_str(unit);
        val
    }
}

/// Formats a resistance in RKM style: `470R`, `4K7`, `10K`.
pub fn format_resistance(r: f64) -> String {
    if r < 1000.0 {
        _format_rval(r, "R")
    } else if r < 1_000_000.0 {
        _format_rval(r / 1000.0, "K")
    } else {
        _format_rval(r / 1_000_000.0, "M")
    }
}

/// Formats a quantity with an SI prefix, falling back to plain notation when it can't be
/// represented.
pub(crate) fn format_si(x: f64, unit: &str) -> String {
    use signifix::metric::Signifix;
    use std::convert::TryFrom;

    match Signifix::try_from(x) {
        Ok(s) => {
            let s = s.to_string();
            let s = s.trim_end();
            if s.ends_with(|c: char| c.is_ascii_digit()) {
                format!("{} {}", s, unit)
            } else {
                format!("{}{}", s, unit)
            }
        }
        Err(_) => format!("{:.6} {}", x, unit),
    }
}
