//! Cofounder equity allocation engine
//!
//! Each participant scores a fixed rubric of categories, weighting how much
//! each category matters and how much every collaborator contributed to it.
//! The engine turns those sheets into normalized ownership percentages,
//! manages each participant's draft and submission lifecycle, aggregates all
//! submissions for comparison, and tracks the hand-agreed final allocation
//! together with everyone's acknowledgment of it.

pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use crate::core::{
    calculate_equity, sheet_from_sparse, sheet_to_sparse, to_dense, to_sparse, ConsensusView, EditOutcome,
    EquitySplit, FinalAllocation, RubricSheet, SparseSheet, SubmissionState, SubmitterStatus,
};
pub use config::EngineConfig;
pub use engine::EquityEngine;
pub use error::{AckBlocker, CalculationError, EquityError, EquityResult, ValidationError};
pub use services::{JsonFileStore, MemoryStore, StaticRoster};
pub use traits::{DocumentStore, MockDocumentStore, MockRoster, Roster};
