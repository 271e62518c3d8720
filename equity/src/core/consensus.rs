//! Cross-participant view of every submission
//!
//! Combines the roster with whatever submissions exist into per-submitter
//! statuses, the split each valid sheet implies, and a read-only copy of each
//! sheet for side-by-side comparison.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{sort_participants, Participant, ParticipantId};
use std::collections::BTreeMap;

use super::calculator::{calculate_equity, round_percentage, EquityShare, EquitySplit};
use super::rubric::Grid;
use super::workflow::Submission;
use crate::error::CalculationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitterStatus {
    /// Nothing submitted yet; no calculation attempted
    Pending,
    /// Submitted, but the sheet cannot be split
    NoValidAssessment { reason: CalculationError },
    Valid { split: EquitySplit },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitterView {
    pub participant: Participant,
    pub submitted_at: Option<DateTime<Utc>>,
    pub status: SubmitterStatus,
    /// Normalized, read-only sheet for audit
    pub sheet: Option<Grid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusView {
    submitters: Vec<SubmitterView>,
}

impl ConsensusView {
    pub fn build(roster: &[Participant], submissions: &BTreeMap<ParticipantId, Submission>) -> Self {
        let mut roster = roster.to_vec();
        sort_participants(&mut roster);

        let submitters = roster
            .iter()
            .map(|participant| match submissions.get(&participant.id) {
                None => SubmitterView {
                    participant: participant.clone(),
                    submitted_at: None,
                    status: SubmitterStatus::Pending,
                    sheet: None,
                },
                Some(submission) => {
                    let sheet = submission.sheet(&roster);
                    let status = match calculate_equity(&sheet) {
                        Ok(split) => SubmitterStatus::Valid { split },
                        Err(reason) => SubmitterStatus::NoValidAssessment { reason },
                    };
                    let mut grid = sheet.to_grid();
                    grid.iter_mut().flatten().for_each(|cell| cell.read_only = true);

                    SubmitterView {
                        participant: participant.clone(),
                        submitted_at: Some(submission.submitted_at),
                        status,
                        sheet: Some(grid),
                    }
                }
            })
            .collect();

        Self { submitters }
    }

    pub fn submitters(&self) -> &[SubmitterView] {
        &self.submitters
    }

    pub fn submitter(&self, participant_id: &ParticipantId) -> Option<&SubmitterView> {
        self.submitters.iter().find(|s| &s.participant.id == participant_id)
    }

    /// Names of participants who have not submitted
    pub fn pending(&self) -> Vec<String> {
        self.submitters
            .iter()
            .filter(|s| s.status == SubmitterStatus::Pending)
            .map(|s| s.participant.display_name.clone())
            .collect()
    }

    /// Whether every participant has submitted something.
    ///
    /// This only decides what may be shown; partial aggregates are still
    /// well defined.
    pub fn all_submitted(&self) -> bool {
        !self.submitters.is_empty() && self.pending().is_empty()
    }

    pub fn valid_splits(&self) -> impl Iterator<Item = (&Participant, &EquitySplit)> {
        self.submitters.iter().filter_map(|s| match &s.status {
            SubmitterStatus::Valid { split } => Some((&s.participant, split)),
            _ => None,
        })
    }

    /// Mean percentage per participant across all valid submissions
    pub fn average(&self) -> Option<EquitySplit> {
        let splits: Vec<&EquitySplit> = self.valid_splits().map(|(_, split)| split).collect();
        if splits.is_empty() {
            return None;
        }
        let count = splits.len() as f64;

        let shares = self
            .submitters
            .iter()
            .map(|s| {
                let sum: f64 = splits
                    .iter()
                    .map(|split| split.percentage_of(&s.participant.id).unwrap_or(0.0))
                    .sum();
                EquityShare {
                    participant_id: s.participant.id.clone(),
                    name: s.participant.display_name.clone(),
                    percentage: round_percentage(sum / count),
                }
            })
            .collect();
        Some(EquitySplit::from_shares(shares))
    }

    /// The average, but only once everyone has submitted
    pub fn revealed_average(&self) -> Option<EquitySplit> {
        if self.all_submitted() {
            self.average()
        } else {
            None
        }
    }
}
