//! Test helpers and builder patterns for engine tests
//!
//! Convenience builders and assertions to keep individual tests short.

use chrono::{DateTime, Utc};
use equity::*;
use shared::{Participant, ParticipantId, ProjectId};

use super::fixtures::TestFixtures;

/// Builder for engines backed by the in-memory store and a static roster
pub struct EngineBuilder {
    project: ProjectId,
    participants: Vec<Participant>,
    deadline: Option<DateTime<Utc>>,
    locked: bool,
}

impl EngineBuilder {
    /// Two participants, unlocked, on the fixture project
    pub fn new() -> Self {
        Self {
            project: TestFixtures::project(),
            participants: TestFixtures::pair(),
            deadline: None,
            locked: false,
        }
    }

    pub fn with_participants(mut self, participants: Vec<Participant>) -> Self {
        self.participants = participants;
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    fn roster(&self) -> StaticRoster {
        let roster = StaticRoster::new(self.participants.clone()).locked(self.locked);
        match self.deadline {
            Some(deadline) => roster.with_deadline(deadline),
            None => roster,
        }
    }

    pub fn build(self) -> EquityEngine<MemoryStore, StaticRoster> {
        self.build_with_store(MemoryStore::new())
    }

    /// Same roster, custom store (typically a `MockDocumentStore`)
    pub fn build_with_store<S: DocumentStore>(self, store: S) -> EquityEngine<S, StaticRoster> {
        let roster = self.roster();
        EquityEngine::new(self.project, store, roster)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Common test helper functions
pub struct TestHelpers;

impl TestHelpers {
    /// Plain two-participant engine
    pub fn simple_engine() -> EquityEngine<MemoryStore, StaticRoster> {
        EngineBuilder::new().build()
    }

    /// Roster mock returning the pair, with the given lock state
    pub fn mock_roster(read_only: bool) -> MockRoster {
        let mut roster = MockRoster::new();
        roster.expect_participants().returning(|| Ok(TestFixtures::pair()));
        roster.expect_is_read_only().returning(move || Ok(read_only));
        roster
    }

    /// Type a batch of `(row, col, value)` edits into a participant's draft
    pub async fn type_cells<S: DocumentStore, R: Roster>(
        engine: &EquityEngine<S, R>,
        participant: &ParticipantId,
        edits: &[(usize, usize, &str)],
    ) {
        for &(row, col, value) in edits {
            let outcome = engine
                .edit_draft_cell(participant, row, col, Some(value))
                .await
                .unwrap();
            assert!(
                matches!(outcome, EditOutcome::Accepted(_)),
                "edit ({row}, {col}) = {value:?} was not accepted"
            );
        }
    }

    /// Product Development weighted 100 with Ada and Grace scored as given
    pub async fn score_product<S: DocumentStore, R: Roster>(
        engine: &EquityEngine<S, R>,
        participant: &ParticipantId,
        ada: u8,
        grace: u8,
    ) {
        let (ada, grace) = (ada.to_string(), grace.to_string());
        Self::type_cells(
            engine,
            participant,
            &[
                (TestFixtures::PRODUCT_ROW, TestFixtures::IMPORTANCE_COL, "100"),
                (TestFixtures::PRODUCT_ROW, TestFixtures::ADA_COL, &ada),
                (TestFixtures::PRODUCT_ROW, TestFixtures::GRACE_COL, &grace),
            ],
        )
        .await;
    }

    /// Assert a split against `(participant id, percentage)` pairs
    pub fn assert_split(split: &EquitySplit, expected: &[(&str, f64)]) {
        assert_eq!(split.shares().len(), expected.len());
        for &(id, pct) in expected {
            let actual = split
                .percentage_of(&ParticipantId::new(id))
                .unwrap_or_else(|| panic!("{id} missing from split"));
            assert!((actual - pct).abs() < 1e-9, "{id}: expected {pct}, got {actual}");
        }
    }
}
