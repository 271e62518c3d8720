//! Engine error types
//!
//! Validation outcomes (`ValidationError`) are expected, user-facing results
//! and carry enough detail to be shown directly. Everything else in
//! `EquityError` is an infrastructural fault.

use serde::{Deserialize, Serialize};
use shared::SharedError;
use thiserror::Error;

/// Why a sheet produced no equity split
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationError {
    #[error("No importance weight is assigned to any category")]
    InsufficientData,

    #[error("Every participant scored zero in all weighted categories")]
    AllZeroScores,
}

/// Why acknowledgments are currently unavailable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AckBlocker {
    /// Some participants have no final percentage yet
    MissingPercentages { participants: Vec<String> },
    /// All percentages are filled in but do not add up to 100
    Unbalanced { total: f64 },
}

impl std::fmt::Display for AckBlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AckBlocker::MissingPercentages { participants } => {
                write!(f, "missing percentages for {}", participants.join(", "))
            }
            AckBlocker::Unbalanced { total } => {
                write!(f, "percentages add up to {total:.2}%, not 100%")
            }
        }
    }
}

/// Recoverable validation outcomes surfaced to participants
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("No importance weight is assigned to any category")]
    InsufficientData,

    #[error("Every participant scored zero in all weighted categories")]
    AllZeroScores,

    #[error("Equity would be 0% for: {}", .participants.join(", "))]
    AllZeroEquity { participants: Vec<String> },

    #[error("There is no draft to submit")]
    NoData,

    #[error("Acknowledgment is not available yet: {blocker}")]
    PreconditionNotMet { blocker: AckBlocker },
}

impl From<CalculationError> for ValidationError {
    fn from(err: CalculationError) -> Self {
        match err {
            CalculationError::InsufficientData => ValidationError::InsufficientData,
            CalculationError::AllZeroScores => ValidationError::AllZeroScores,
        }
    }
}

#[derive(Error, Debug)]
pub enum EquityError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Project is read-only; edits are locked")]
    ReadOnly,

    #[error("Unknown participant: {participant_id}")]
    UnknownParticipant { participant_id: String },

    #[error("Participant {actor} may not modify data owned by {owner}")]
    NotPermitted { actor: String, owner: String },

    #[error("Invalid percentage {value} for {participant_id}")]
    InvalidPercentage { participant_id: String, value: f64 },

    #[error("Cell ({row}, {col}) is outside the sheet or not editable")]
    CellOutOfRange { row: usize, col: usize },

    #[error("Persistence failed during {operation}: {message}")]
    Persistence { operation: String, message: String },

    #[error("Configuration error: {field}")]
    Configuration { field: String },

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EquityError {
    pub fn config(field: impl Into<String>) -> Self {
        EquityError::Configuration { field: field.into() }
    }

    pub fn persistence(operation: impl Into<String>, message: impl std::fmt::Display) -> Self {
        EquityError::Persistence {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Infrastructure faults can be retried; validation outcomes cannot change on retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, EquityError::Persistence { .. } | EquityError::Io(_))
    }

    /// The validation outcome, when this error is one
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            EquityError::Validation(v) => Some(v),
            _ => None,
        }
    }
}

pub type EquityResult<T> = Result<T, EquityError>;
