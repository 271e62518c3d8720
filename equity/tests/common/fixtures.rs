//! Test fixtures and data for engine tests
//!
//! This module provides consistent test data used across all test suites.

use shared::{Participant, ParticipantId, ProjectId};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const PROJECT: &'static str = "550e8400-e29b-41d4-a716-446655440000";

    /// Participant ids; columns sort by display name so Ada, Grace, Lin
    pub const ADA: &'static str = "uid-ada";
    pub const GRACE: &'static str = "uid-grace";
    pub const LIN: &'static str = "uid-lin";

    /// Grid columns of each participant on a sheet
    pub const ADA_COL: usize = 2;
    pub const GRACE_COL: usize = 3;
    pub const LIN_COL: usize = 4;

    pub const IMPORTANCE_COL: usize = 1;

    /// Grid rows of a few scoring categories
    pub const IDEA_ROW: usize = 2;
    pub const PRODUCT_ROW: usize = 9;
    pub const SALES_ROW: usize = 10;

    pub fn project() -> ProjectId {
        ProjectId::from_string(Self::PROJECT).unwrap()
    }

    pub fn ada() -> ParticipantId {
        ParticipantId::new(Self::ADA)
    }

    pub fn grace() -> ParticipantId {
        ParticipantId::new(Self::GRACE)
    }

    pub fn lin() -> ParticipantId {
        ParticipantId::new(Self::LIN)
    }

    /// Two cofounders, deliberately listed out of column order
    pub fn pair() -> Vec<Participant> {
        vec![Participant::new(Self::GRACE, "Grace"), Participant::new(Self::ADA, "Ada").admin()]
    }

    pub fn trio() -> Vec<Participant> {
        let mut roster = Self::pair();
        roster.push(Participant::new(Self::LIN, "Lin"));
        roster
    }

    /// Legacy sparse sheet for three participants with Lin's column missing
    pub fn legacy_sparse_json() -> &'static str {
        r#"{
            "row_0": {
                "col_0": { "value": "Category" },
                "col_1": { "value": "Importance" },
                "col_2": { "value": "Ada" },
                "col_3": { "value": "Grace" }
            },
            "row_9": {
                "col_0": { "value": "Product Development" },
                "col_1": { "value": 100 },
                "col_2": { "value": 60 },
                "col_3": { "value": "40" }
            }
        }"#
    }
}
