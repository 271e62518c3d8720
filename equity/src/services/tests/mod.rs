//! Service-specific tests
//!
//! Each service has its own test file; shared fixtures live in `common`.

#[cfg(test)]
mod file_store;

// Common test utilities for services
#[cfg(test)]
pub mod common {
    use chrono::Utc;
    use shared::{Participant, ParticipantId};

    use crate::core::{Draft, RubricSheet, Submission};
    use crate::core::normalizer::sheet_to_sparse;

    pub fn test_roster() -> Vec<Participant> {
        vec![Participant::new("uid-ada", "Ada"), Participant::new("uid-bo", "Bo")]
    }

    /// Sheet with a single weighted category split 70/30
    pub fn sample_sheet() -> RubricSheet {
        let mut sheet = RubricSheet::new(&test_roster());
        sheet.set_importance("Product Development", 80).unwrap();
        sheet.set_score("Product Development", 0, 70).unwrap();
        sheet.set_score("Product Development", 1, 30).unwrap();
        sheet
    }

    pub fn sample_draft(owner: &str) -> Draft {
        Draft::new(ParticipantId::new(owner), &sample_sheet(), Utc::now())
    }

    pub fn sample_submission(owner: &str) -> Submission {
        Submission {
            owner_id: ParticipantId::new(owner),
            data: sheet_to_sparse(&sample_sheet()),
            submitted_at: Utc::now(),
        }
    }
}
