//! Parsing of user supplied durations and capacitances.
//!
//! Both inputs must be positive and finite. With the `expr_input` feature, anything that isn't a
//! plain number is evaluated as an arithmetic expression, so `-ln(0.5)*0.1` is a valid duration.

use crate::error::TimerError;

/// Farads per microfarad.
pub const MICROFARAD: f64 = 1e-6;

/// A validated pair of search inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRequest {
    /// Seconds.
    pub duration: f64,
    /// Farads.
    pub capacitance: f64,
}

impl SearchRequest {
    /// Parses a duration in seconds and a capacitance in microfarads.
    /// # Example
    /// ```
    ///     # use rc_timer_calc::*;
    ///     let req = SearchRequest::parse("0.5", "47").unwrap();
    ///     assert_eq!(req.capacitance, 47.0 * 1e-6);
    ///     assert!(SearchRequest::parse("half a second", "47").is_err());
    /// ```
    pub fn parse(duration: &str, capacitance_uf: &str) -> Result<Self, TimerError> {
        Ok(SearchRequest {
            duration: parse_duration(duration)?,
            capacitance: parse_capacitance_uf(capacitance_uf)?,
        })
    }
}

/// Parses a duration in seconds.
pub fn parse_duration(input: &str) -> Result<f64, TimerError> {
    parse_positive("duration", input)
}

/// Parses a capacitance given in microfarads, returning farads.
pub fn parse_capacitance_uf(input: &str) -> Result<f64, TimerError> {
    parse_positive("capacitance", input).map(|uf| uf * MICROFARAD)
}

fn parse_positive(field: &'static str, input: &str) -> Result<f64, TimerError> {
    let fail = |reason: String| TimerError::InputParse {
        field,
        input: input.to_string(),
        reason,
    };
    let value = parse_number(input.trim()).map_err(fail)?;
    if !value.is_finite() {
        return Err(fail("not a finite number".to_string()));
    }
    if value <= 0.0 {
        return Err(fail("must be greater than zero".to_string()));
    }
    Ok(value)
}

#[cfg(feature = "expr_input")]
fn parse_number(text: &str) -> Result<f64, String> {
    text.parse::<f64>()
        .or_else(|_| meval::eval_str(text).map_err(|e| e.to_string()))
}

#[cfg(not(feature = "expr_input"))]
fn parse_number(text: &str) -> Result<f64, String> {
    text.parse::<f64>().map_err(|e| e.to_string())
}
