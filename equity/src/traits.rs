//! Trait definitions with mockall annotations for testing
//!
//! The engine only needs per-document get/set from its store and an ordered
//! roster with a lock flag from the project service. Both are injected so the
//! core can be exercised without any real persistence.

use shared::{Participant, ParticipantId, ProjectId};

use crate::core::{Draft, FinalAllocation, Submission, SubmissionState};
use crate::error::EquityResult;

/// Document persistence for one or more projects.
///
/// Every write replaces the whole document it targets, so retrying a failed
/// write is always safe.
#[mockall::automock]
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load a participant's draft, if they have one
    async fn load_draft(&self, project: &ProjectId, owner: &ParticipantId) -> EquityResult<Option<Draft>>;

    /// Replace a participant's draft
    async fn save_draft(&self, project: &ProjectId, draft: &Draft) -> EquityResult<()>;

    /// Load a participant's submission, if they have one
    async fn load_submission(&self, project: &ProjectId, owner: &ParticipantId) -> EquityResult<Option<Submission>>;

    /// Replace a participant's submission
    async fn save_submission(&self, project: &ProjectId, submission: &Submission) -> EquityResult<()>;

    /// Load a participant's workflow state; participants with none are editing
    async fn load_state(&self, project: &ProjectId, owner: &ParticipantId) -> EquityResult<SubmissionState>;

    /// Replace a participant's workflow state
    async fn save_state(&self, project: &ProjectId, owner: &ParticipantId, state: SubmissionState) -> EquityResult<()>;

    /// Load the final allocation document; an empty one when none exists
    async fn load_allocation(&self, project: &ProjectId) -> EquityResult<FinalAllocation>;

    /// Replace the final allocation document in a single write
    async fn save_allocation(&self, project: &ProjectId, allocation: &FinalAllocation) -> EquityResult<()>;
}

/// Participant roster and project lock, owned by an external service
#[mockall::automock]
#[async_trait::async_trait]
pub trait Roster: Send + Sync {
    /// Everyone on the agreement, in any order
    async fn participants(&self) -> EquityResult<Vec<Participant>>;

    /// Whether the project is past its edit deadline or otherwise locked
    async fn is_read_only(&self) -> EquityResult<bool>;
}
