use thiserror::Error;

use crate::gym::Pos;

/// Errors produced by the learning core
///
/// None of these are recoverable mid-run: they indicate a bad configuration or a logic defect.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An action outside the fixed action set was requested
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// A state outside the grid was presented to the environment or the value table
    #[error("State {state:?} is outside the {rows}x{cols} grid")]
    OutOfBounds { state: Pos, rows: i32, cols: i32 },

    /// A configuration value was rejected at setup time
    #[error("Invalid value for `{field}`: {reason}")]
    Config { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
