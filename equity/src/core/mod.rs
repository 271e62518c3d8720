//! Core business logic modules
//!
//! This module contains pure business logic with no I/O dependencies.
//! All functions are deterministic and easily testable.

pub mod allocation;
pub mod calculator;
pub mod consensus;
pub mod normalizer;
pub mod rubric;
pub mod workflow;

pub use allocation::{FinalAllocation, BALANCE_TOLERANCE};
pub use calculator::{calculate_equity, EquityShare, EquitySplit};
pub use consensus::{ConsensusView, SubmitterStatus, SubmitterView};
pub use normalizer::{sheet_from_sparse, sheet_to_sparse, to_dense, to_sparse, SparseSheet};
pub use rubric::{Cell, CellValue, EditOutcome, Grid, RubricSheet, CATEGORIES};
pub use workflow::{prepare_submission, Draft, Submission, SubmissionState, WorkflowEvent};
