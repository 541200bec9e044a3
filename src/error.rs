use thiserror::Error;

/// Ways a timer calculation can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimerError {
    /// One of the inputs is not a positive, finite number.
    #[error("Failed to parse {field} '{input}': {reason}")]
    InputParse {
        field: &'static str,
        input: String,
        reason: String,
    },
    /// No resistor triple puts the comparator threshold inside the usable band.
    #[error("No resistor combination reaches {duration} s with {capacitance} F")]
    NoFeasibleConfiguration { duration: f64, capacitance: f64 },
    /// Search bounds that can never admit a candidate.
    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),
}

impl TimerError {
    pub fn is_parse_error(&self) -> bool {
        matches!(self, TimerError::InputParse { .. })
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, TimerError::NoFeasibleConfiguration { .. })
    }
}
