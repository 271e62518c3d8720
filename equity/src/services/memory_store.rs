//! In-memory document store
//!
//! Keeps every document in process memory behind async locks. Useful for
//! embedding the engine in a host that handles its own persistence, and for
//! tests.

use async_trait::async_trait;
use shared::{ParticipantId, ProjectId};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::core::{Draft, FinalAllocation, Submission, SubmissionState};
use crate::error::EquityResult;
use crate::traits::DocumentStore;

type OwnerKey = (ProjectId, ParticipantId);

#[derive(Default)]
pub struct MemoryStore {
    drafts: RwLock<HashMap<OwnerKey, Draft>>,
    submissions: RwLock<HashMap<OwnerKey, Submission>>,
    states: RwLock<HashMap<OwnerKey, SubmissionState>>,
    allocations: RwLock<HashMap<ProjectId, FinalAllocation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(project: &ProjectId, owner: &ParticipantId) -> OwnerKey {
        (*project, owner.clone())
    }

    /// Number of submissions held for a project
    pub async fn submission_count(&self, project: &ProjectId) -> usize {
        self.submissions
            .read()
            .await
            .keys()
            .filter(|(p, _)| p == project)
            .count()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load_draft(&self, project: &ProjectId, owner: &ParticipantId) -> EquityResult<Option<Draft>> {
        Ok(self.drafts.read().await.get(&Self::key(project, owner)).cloned())
    }

    async fn save_draft(&self, project: &ProjectId, draft: &Draft) -> EquityResult<()> {
        self.drafts
            .write()
            .await
            .insert(Self::key(project, &draft.owner_id), draft.clone());
        Ok(())
    }

    async fn load_submission(&self, project: &ProjectId, owner: &ParticipantId) -> EquityResult<Option<Submission>> {
        Ok(self.submissions.read().await.get(&Self::key(project, owner)).cloned())
    }

    async fn save_submission(&self, project: &ProjectId, submission: &Submission) -> EquityResult<()> {
        self.submissions
            .write()
            .await
            .insert(Self::key(project, &submission.owner_id), submission.clone());
        Ok(())
    }

    async fn load_state(&self, project: &ProjectId, owner: &ParticipantId) -> EquityResult<SubmissionState> {
        Ok(self
            .states
            .read()
            .await
            .get(&Self::key(project, owner))
            .copied()
            .unwrap_or_default())
    }

    async fn save_state(&self, project: &ProjectId, owner: &ParticipantId, state: SubmissionState) -> EquityResult<()> {
        self.states.write().await.insert(Self::key(project, owner), state);
        Ok(())
    }

    async fn load_allocation(&self, project: &ProjectId) -> EquityResult<FinalAllocation> {
        Ok(self
            .allocations
            .read()
            .await
            .get(project)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_allocation(&self, project: &ProjectId, allocation: &FinalAllocation) -> EquityResult<()> {
        self.allocations.write().await.insert(*project, allocation.clone());
        Ok(())
    }
}
