//! Equity allocation engine
//!
//! Wires the pure core to an injected document store and roster. Every write
//! is scoped to the participant who owns the document, mutations are refused
//! while the project is locked, and derived results are recomputed on every
//! read.

use chrono::Utc;
use shared::{component_debug, component_error, component_info, ComponentId, Participant, ParticipantId, ProjectId};
use std::collections::BTreeMap;

use crate::core::{
    prepare_submission, ConsensusView, Draft, EditOutcome, EquitySplit, FinalAllocation, RubricSheet,
    SubmissionState, WorkflowEvent,
};
use crate::error::{EquityError, EquityResult};
use crate::traits::{DocumentStore, Roster};

pub struct EquityEngine<S, R>
where
    S: DocumentStore,
    R: Roster,
{
    project: ProjectId,
    store: S,
    roster: R,
}

impl<S, R> EquityEngine<S, R>
where
    S: DocumentStore,
    R: Roster,
{
    pub fn new(project: ProjectId, store: S, roster: R) -> Self {
        Self { project, store, roster }
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Roster in sheet column order
    pub async fn participants(&self) -> EquityResult<Vec<Participant>> {
        let mut participants = self.roster.participants().await?;
        shared::sort_participants(&mut participants);
        Ok(participants)
    }

    /// Display name for a participant id
    pub async fn display_name(&self, participant_id: &ParticipantId) -> EquityResult<String> {
        let roster = self.participants().await?;
        Self::require(&roster, participant_id).map(|p| p.display_name.clone())
    }

    pub async fn is_read_only(&self) -> EquityResult<bool> {
        self.roster.is_read_only().await
    }

    fn require<'a>(roster: &'a [Participant], participant_id: &ParticipantId) -> EquityResult<&'a Participant> {
        roster
            .iter()
            .find(|p| &p.id == participant_id)
            .ok_or_else(|| EquityError::UnknownParticipant {
                participant_id: participant_id.to_string(),
            })
    }

    /// Roster for a mutation, after checking the lock and the caller
    async fn writable_roster(&self, participant_id: &ParticipantId) -> EquityResult<Vec<Participant>> {
        if self.roster.is_read_only().await? {
            component_info!(
                ComponentId::current(),
                "🔒 Rejected write by {} on locked project {}",
                participant_id,
                self.project
            );
            return Err(EquityError::ReadOnly);
        }
        let roster = self.participants().await?;
        Self::require(&roster, participant_id)?;
        Ok(roster)
    }

    /// Log persistence faults before handing them back
    fn logged<T>(&self, operation: &str, result: EquityResult<T>) -> EquityResult<T> {
        if let Err(err) = &result {
            if err.is_retryable() {
                component_error!(ComponentId::current(), "💾 {} failed for project {}: {}", operation, self.project, err);
            }
        }
        result
    }

    /// The participant's draft sheet, or a blank one for the current roster
    pub async fn load_draft(&self, participant_id: &ParticipantId) -> EquityResult<RubricSheet> {
        let roster = self.participants().await?;
        Self::require(&roster, participant_id)?;
        self.draft_sheet(participant_id, &roster).await
    }

    /// Replace the participant's draft with a whole sheet
    pub async fn save_draft(&self, participant_id: &ParticipantId, sheet: &RubricSheet) -> EquityResult<()> {
        let roster = self.writable_roster(participant_id).await?;
        self.write_draft(participant_id, sheet, &roster).await
    }

    /// Apply typed input to one cell of the participant's draft
    pub async fn edit_draft_cell(
        &self,
        participant_id: &ParticipantId,
        row: usize,
        col: usize,
        input: Option<&str>,
    ) -> EquityResult<EditOutcome> {
        let roster = self.writable_roster(participant_id).await?;
        let mut sheet = self.draft_sheet(participant_id, &roster).await?;
        let outcome = sheet.apply_edit(row, col, input)?;

        if let EditOutcome::Accepted(_) = outcome {
            self.write_draft(participant_id, &sheet, &roster).await?;
        } else {
            component_debug!(
                ComponentId::current(),
                "Kept previous value at ({}, {}) for {}",
                row,
                col,
                participant_id
            );
        }
        Ok(outcome)
    }

    async fn draft_sheet(&self, participant_id: &ParticipantId, roster: &[Participant]) -> EquityResult<RubricSheet> {
        let draft = self.logged("load_draft", self.store.load_draft(&self.project, participant_id).await)?;
        Ok(match draft {
            Some(draft) => draft.sheet(roster),
            None => RubricSheet::new(roster),
        })
    }

    async fn write_draft(
        &self,
        participant_id: &ParticipantId,
        sheet: &RubricSheet,
        roster: &[Participant],
    ) -> EquityResult<()> {
        // Re-home the sheet onto the current roster in case it was built for an older one
        let sheet = RubricSheet::from_grid(&sheet.to_grid(), roster);
        let draft = Draft::new(participant_id.clone(), &sheet, Utc::now());

        self.logged("save_draft", self.store.save_draft(&self.project, &draft).await)?;
        component_debug!(ComponentId::current(), "📝 Saved draft for {}", participant_id);
        Ok(())
    }

    /// Copy the participant's draft into their submission.
    ///
    /// Validation failures leave both the stored submission and the workflow
    /// state untouched. Submitting again simply overwrites.
    pub async fn submit(&self, participant_id: &ParticipantId) -> EquityResult<EquitySplit> {
        let roster = self.writable_roster(participant_id).await?;
        let draft = self.logged("load_draft", self.store.load_draft(&self.project, participant_id).await)?;

        let (submission, split) = match prepare_submission(draft.as_ref(), &roster, Utc::now()) {
            Ok(prepared) => prepared,
            Err(rejection) => {
                component_info!(ComponentId::current(), "Submission by {} rejected: {}", participant_id, rejection);
                return Err(rejection.into());
            }
        };

        self.logged("save_submission", self.store.save_submission(&self.project, &submission).await)?;
        let state = self
            .logged("load_state", self.store.load_state(&self.project, participant_id).await)?
            .apply(WorkflowEvent::Submit);
        self.logged("save_state", self.store.save_state(&self.project, participant_id, state).await)?;

        component_info!(ComponentId::current(), "✅ {} submitted their assessment", participant_id);
        Ok(split)
    }

    /// Return to editing; the previous submission stays in place
    pub async fn back_to_edit(&self, participant_id: &ParticipantId) -> EquityResult<SubmissionState> {
        self.writable_roster(participant_id).await?;
        let state = self
            .logged("load_state", self.store.load_state(&self.project, participant_id).await)?
            .apply(WorkflowEvent::Reopen);
        self.logged("save_state", self.store.save_state(&self.project, participant_id, state).await)?;
        component_debug!(ComponentId::current(), "↩️ {} is editing again", participant_id);
        Ok(state)
    }

    pub async fn state(&self, participant_id: &ParticipantId) -> EquityResult<SubmissionState> {
        let roster = self.participants().await?;
        Self::require(&roster, participant_id)?;
        self.logged("load_state", self.store.load_state(&self.project, participant_id).await)
    }

    pub async fn final_allocation(&self) -> EquityResult<FinalAllocation> {
        self.logged("load_allocation", self.store.load_allocation(&self.project).await)
    }

    /// Set or clear a participant's final percentage.
    ///
    /// Any change clears every acknowledgment, and both land in the same
    /// document write.
    pub async fn set_final_allocation(
        &self,
        participant_id: &ParticipantId,
        percentage: Option<f64>,
    ) -> EquityResult<FinalAllocation> {
        self.writable_roster(participant_id).await?;
        let mut allocation = self.final_allocation().await?;

        if allocation.set_percentage(participant_id, percentage)? {
            self.logged("save_allocation", self.store.save_allocation(&self.project, &allocation).await)?;
            component_debug!(
                ComponentId::current(),
                "💱 Final percentage for {} set to {:?}; acknowledgments reset",
                participant_id,
                percentage
            );
        }
        Ok(allocation)
    }

    /// Record the participant's own acknowledgment of the final allocation
    pub async fn acknowledge(&self, participant_id: &ParticipantId, value: bool) -> EquityResult<FinalAllocation> {
        self.acknowledge_for(participant_id, participant_id, value).await
    }

    /// Acknowledgment written by `actor` for `target`; refused unless they are the same person
    pub async fn acknowledge_for(
        &self,
        actor: &ParticipantId,
        target: &ParticipantId,
        value: bool,
    ) -> EquityResult<FinalAllocation> {
        let roster = self.writable_roster(actor).await?;
        let mut allocation = self.final_allocation().await?;

        if let Err(err) = allocation.acknowledge(actor, target, value, &roster) {
            component_info!(ComponentId::current(), "Acknowledgment by {} refused: {}", actor, err);
            return Err(err);
        }
        self.logged("save_allocation", self.store.save_allocation(&self.project, &allocation).await)?;
        component_debug!(ComponentId::current(), "🤝 {} acknowledgment set to {}", target, value);
        Ok(allocation)
    }

    /// Every participant's submission status and split, recomputed now
    pub async fn consensus(&self) -> EquityResult<ConsensusView> {
        let roster = self.participants().await?;
        let mut submissions = BTreeMap::new();
        for participant in &roster {
            let loaded = self.logged(
                "load_submission",
                self.store.load_submission(&self.project, &participant.id).await,
            )?;
            if let Some(submission) = loaded {
                submissions.insert(participant.id.clone(), submission);
            }
        }
        Ok(ConsensusView::build(&roster, &submissions))
    }
}
