//! Per-participant submission workflow
//!
//! Each participant edits a private draft and explicitly submits it. Submitting
//! copies the draft into that participant's single submission slot,
//! overwriting whatever was there. Going back to edit never clears the
//! previous submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{Participant, ParticipantId};

use super::calculator::{calculate_equity, EquitySplit};
use super::normalizer::{sheet_from_sparse, sheet_to_sparse, SparseSheet};
use super::rubric::RubricSheet;
use crate::error::{CalculationError, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Editing,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEvent {
    Submit,
    Reopen,
}

impl SubmissionState {
    pub fn apply(self, event: WorkflowEvent) -> Self {
        match event {
            WorkflowEvent::Submit => SubmissionState::Submitted,
            WorkflowEvent::Reopen => SubmissionState::Editing,
        }
    }
}

/// A participant's private, in-progress sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub owner_id: ParticipantId,
    pub data: SparseSheet,
    pub updated_at: DateTime<Utc>,
}

impl Draft {
    pub fn new(owner_id: ParticipantId, sheet: &RubricSheet, updated_at: DateTime<Utc>) -> Self {
        Self {
            owner_id,
            data: sheet_to_sparse(sheet),
            updated_at,
        }
    }

    pub fn sheet(&self, roster: &[Participant]) -> RubricSheet {
        sheet_from_sparse(&self.data, roster)
    }
}

/// A participant's submitted sheet snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub owner_id: ParticipantId,
    pub data: SparseSheet,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn sheet(&self, roster: &[Participant]) -> RubricSheet {
        sheet_from_sparse(&self.data, roster)
    }

    /// Recompute the split this submission implies for the current roster
    pub fn calculate(&self, roster: &[Participant]) -> Result<EquitySplit, CalculationError> {
        calculate_equity(&self.sheet(roster))
    }
}

/// Check a draft and turn it into a submission.
///
/// A sheet the calculator cannot split at all leaves every participant at 0%,
/// so it is reported the same way as a sheet where some participants end up
/// with nothing.
pub fn prepare_submission(
    draft: Option<&Draft>,
    roster: &[Participant],
    now: DateTime<Utc>,
) -> Result<(Submission, EquitySplit), ValidationError> {
    let draft = draft.ok_or(ValidationError::NoData)?;
    let sheet = draft.sheet(roster);

    let split = calculate_equity(&sheet).map_err(|_| ValidationError::AllZeroEquity {
        participants: sheet
            .participants()
            .iter()
            .map(|p| p.display_name.clone())
            .collect(),
    })?;

    let zeroed = split.zero_equity_participants();
    if !zeroed.is_empty() {
        return Err(ValidationError::AllZeroEquity { participants: zeroed });
    }

    let submission = Submission {
        owner_id: draft.owner_id.clone(),
        data: draft.data.clone(),
        submitted_at: now,
    };
    Ok((submission, split))
}
