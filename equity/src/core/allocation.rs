//! Final allocation and acknowledgments
//!
//! The final split is entered by hand and does not come from the calculator.
//! Every participant must then acknowledge it themselves. Changing any
//! percentage wipes every acknowledgment in the same update, so an approval
//! can never sit next to numbers it did not approve.

use serde::{Deserialize, Serialize};
use shared::{Participant, ParticipantId};
use std::collections::BTreeMap;

use crate::error::{AckBlocker, EquityError, EquityResult, ValidationError};

/// How far the total may drift from 100 and still count as balanced
pub const BALANCE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalAllocation {
    #[serde(default)]
    percentages: BTreeMap<ParticipantId, f64>,
    #[serde(default)]
    acknowledgments: BTreeMap<ParticipantId, bool>,
}

impl FinalAllocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percentage(&self, participant_id: &ParticipantId) -> Option<f64> {
        self.percentages.get(participant_id).copied()
    }

    pub fn percentages(&self) -> &BTreeMap<ParticipantId, f64> {
        &self.percentages
    }

    pub fn acknowledgments(&self) -> &BTreeMap<ParticipantId, bool> {
        &self.acknowledgments
    }

    pub fn is_acknowledged(&self, participant_id: &ParticipantId) -> bool {
        self.acknowledgments.get(participant_id).copied().unwrap_or(false)
    }

    /// Set or clear a participant's percentage.
    ///
    /// Returns whether the value changed. Any change resets all
    /// acknowledgments; writing the same value again is not a change.
    pub fn set_percentage(&mut self, participant_id: &ParticipantId, value: Option<f64>) -> EquityResult<bool> {
        if let Some(v) = value {
            if !v.is_finite() || !(0.0..=100.0).contains(&v) {
                return Err(EquityError::InvalidPercentage {
                    participant_id: participant_id.to_string(),
                    value: v,
                });
            }
        }

        if self.percentage(participant_id) == value {
            return Ok(false);
        }

        match value {
            Some(v) => self.percentages.insert(participant_id.clone(), v),
            None => self.percentages.remove(participant_id),
        };
        self.acknowledgments.clear();
        Ok(true)
    }

    /// Sum of the roster's percentages; missing entries count as 0
    pub fn total(&self, roster: &[Participant]) -> f64 {
        roster.iter().filter_map(|p| self.percentage(&p.id)).sum()
    }

    pub fn is_balanced(&self, roster: &[Participant]) -> bool {
        (self.total(roster) - 100.0).abs() <= BALANCE_TOLERANCE
    }

    /// What currently keeps acknowledgment checkboxes disabled, if anything
    pub fn ack_blocker(&self, roster: &[Participant]) -> Option<AckBlocker> {
        let missing: Vec<String> = roster
            .iter()
            .filter(|p| self.percentage(&p.id).is_none())
            .map(|p| p.display_name.clone())
            .collect();
        if !missing.is_empty() {
            return Some(AckBlocker::MissingPercentages { participants: missing });
        }
        if !self.is_balanced(roster) {
            return Some(AckBlocker::Unbalanced { total: self.total(roster) });
        }
        None
    }

    pub fn can_acknowledge(&self, roster: &[Participant]) -> bool {
        self.ack_blocker(roster).is_none()
    }

    /// Record an acknowledgment. Only the participant themselves may write it.
    pub fn acknowledge(
        &mut self,
        actor: &ParticipantId,
        target: &ParticipantId,
        value: bool,
        roster: &[Participant],
    ) -> EquityResult<()> {
        if actor != target {
            return Err(EquityError::NotPermitted {
                actor: actor.to_string(),
                owner: target.to_string(),
            });
        }
        if !roster.iter().any(|p| &p.id == target) {
            return Err(EquityError::UnknownParticipant {
                participant_id: target.to_string(),
            });
        }
        if let Some(blocker) = self.ack_blocker(roster) {
            return Err(ValidationError::PreconditionNotMet { blocker }.into());
        }
        self.acknowledgments.insert(target.clone(), value);
        Ok(())
    }

    /// Names of participants who have not acknowledged yet
    pub fn outstanding_acknowledgments(&self, roster: &[Participant]) -> Vec<String> {
        roster
            .iter()
            .filter(|p| !self.is_acknowledged(&p.id))
            .map(|p| p.display_name.clone())
            .collect()
    }

    /// Every percentage filled, balanced, and acknowledged by everyone
    pub fn is_complete(&self, roster: &[Participant]) -> bool {
        !roster.is_empty() && self.can_acknowledge(roster) && self.outstanding_acknowledgments(roster).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Participant> {
        vec![Participant::new("a", "A"), Participant::new("b", "B")]
    }

    fn id(s: &str) -> ParticipantId {
        ParticipantId::new(s)
    }

    fn agreed() -> FinalAllocation {
        let mut allocation = FinalAllocation::new();
        allocation.set_percentage(&id("a"), Some(60.0)).unwrap();
        allocation.set_percentage(&id("b"), Some(40.0)).unwrap();
        allocation.acknowledge(&id("a"), &id("a"), true, &roster()).unwrap();
        allocation.acknowledge(&id("b"), &id("b"), true, &roster()).unwrap();
        allocation
    }

    #[test]
    fn test_complete_allocation() {
        let allocation = agreed();
        assert!(allocation.is_complete(&roster()));
        assert!(allocation.outstanding_acknowledgments(&roster()).is_empty());
    }

    #[test]
    fn test_changing_a_percentage_clears_acknowledgments() {
        let mut allocation = agreed();
        assert!(allocation.set_percentage(&id("a"), Some(55.0)).unwrap());
        assert!(allocation.acknowledgments().is_empty());
        assert!(!allocation.is_complete(&roster()));
    }

    #[test]
    fn test_clearing_a_percentage_clears_acknowledgments() {
        let mut allocation = agreed();
        assert!(allocation.set_percentage(&id("b"), None).unwrap());
        assert!(allocation.acknowledgments().is_empty());
        assert_eq!(
            allocation.ack_blocker(&roster()),
            Some(AckBlocker::MissingPercentages { participants: vec!["B".to_string()] })
        );
    }

    #[test]
    fn test_same_value_keeps_acknowledgments() {
        let mut allocation = agreed();
        assert!(!allocation.set_percentage(&id("a"), Some(60.0)).unwrap());
        assert!(allocation.is_complete(&roster()));
    }

    #[test]
    fn test_acknowledgment_requires_all_percentages() {
        let mut allocation = FinalAllocation::new();
        allocation.set_percentage(&id("a"), Some(100.0)).unwrap();
        let err = allocation.acknowledge(&id("a"), &id("a"), true, &roster()).unwrap_err();
        assert!(matches!(
            err.validation(),
            Some(ValidationError::PreconditionNotMet {
                blocker: AckBlocker::MissingPercentages { .. }
            })
        ));
    }

    #[test]
    fn test_acknowledgment_requires_balance() {
        let mut allocation = FinalAllocation::new();
        allocation.set_percentage(&id("a"), Some(60.0)).unwrap();
        allocation.set_percentage(&id("b"), Some(39.0)).unwrap();
        assert_eq!(
            allocation.ack_blocker(&roster()),
            Some(AckBlocker::Unbalanced { total: 99.0 })
        );
        assert!(allocation.acknowledge(&id("b"), &id("b"), true, &roster()).is_err());

        allocation.set_percentage(&id("b"), Some(39.995)).unwrap();
        assert!(allocation.can_acknowledge(&roster()));
    }

    #[test]
    fn test_only_self_attestation() {
        let mut allocation = FinalAllocation::new();
        allocation.set_percentage(&id("a"), Some(50.0)).unwrap();
        allocation.set_percentage(&id("b"), Some(50.0)).unwrap();
        let err = allocation.acknowledge(&id("a"), &id("b"), true, &roster()).unwrap_err();
        assert!(matches!(err, EquityError::NotPermitted { .. }));

        let err = allocation.acknowledge(&id("z"), &id("z"), true, &roster()).unwrap_err();
        assert!(matches!(err, EquityError::UnknownParticipant { .. }));
    }

    #[test]
    fn test_rejects_out_of_range_percentages() {
        let mut allocation = FinalAllocation::new();
        assert!(allocation.set_percentage(&id("a"), Some(-1.0)).is_err());
        assert!(allocation.set_percentage(&id("a"), Some(100.5)).is_err());
        assert!(allocation.set_percentage(&id("a"), Some(f64::NAN)).is_err());
        assert!(allocation.percentages().is_empty());
    }

    #[test]
    fn test_withdrawing_acknowledgment() {
        let mut allocation = agreed();
        allocation.acknowledge(&id("b"), &id("b"), false, &roster()).unwrap();
        assert_eq!(allocation.outstanding_acknowledgments(&roster()), vec!["B".to_string()]);
    }
}
