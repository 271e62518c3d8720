//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::errors::{SharedError, SharedResult};

/// Global component identity used to stamp log events
static COMPONENT_ID: OnceLock<ComponentId> = OnceLock::new();

/// Which part of the system is emitting logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentId {
    /// Library use of the allocation engine (the default)
    Engine,
    /// The command line front end
    Cli,
}

impl ComponentId {
    /// Initialize the global component ID for the CLI binary
    pub fn init_cli() -> &'static ComponentId {
        COMPONENT_ID.get_or_init(|| ComponentId::Cli)
    }

    /// Get the global component ID, defaulting to `Engine` when nobody initialized it
    pub fn current() -> &'static ComponentId {
        COMPONENT_ID.get_or_init(|| ComponentId::Engine)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentId::Engine => write!(f, "engine"),
            ComponentId::Cli => write!(f, "cli"),
        }
    }
}

/// Identifier of a participant as issued by the external roster service.
///
/// Roster ids are opaque strings (auth-provider uids), so no format is imposed
/// beyond being non-blank.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn parse(s: &str) -> SharedResult<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SharedError::InvalidIdentifier { input: s.to_string() });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an agreement project
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(Uuid);

impl ProjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> SharedResult<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| SharedError::InvalidUuid { input: s.to_string() })
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A collaborator on the agreement as supplied by the roster
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl Participant {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::new(id),
            display_name: display_name.into(),
            is_admin: false,
        }
    }

    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}

/// Column ordering for participants on a rubric sheet.
///
/// Display names compare case-insensitively first, then case-sensitively, and
/// finally by id so that two people with the same name still get a stable
/// column each.
pub fn participant_order(a: &Participant, b: &Participant) -> Ordering {
    a.display_name
        .to_lowercase()
        .cmp(&b.display_name.to_lowercase())
        .then_with(|| a.display_name.cmp(&b.display_name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort a roster into sheet column order
pub fn sort_participants(participants: &mut [Participant]) {
    participants.sort_by(participant_order);
}
