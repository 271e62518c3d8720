//! Static roster loaded from a JSON file
//!
//! Stands in for the external roster service. The file lists participants
//! and optionally an edit deadline or an explicit lock:
//!
//! ```json
//! {
//!   "participants": [{ "id": "uid-1", "display_name": "Ada", "is_admin": true }],
//!   "edit_deadline": "2026-01-31T23:59:59Z",
//!   "locked": false
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{component_debug, ComponentId, Participant};
use std::path::Path;

use crate::error::{EquityError, EquityResult};
use crate::traits::Roster;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticRoster {
    #[serde(default)]
    participants: Vec<Participant>,
    #[serde(default)]
    edit_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    locked: bool,
}

impl StaticRoster {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self {
            participants,
            edit_deadline: None,
            locked: false,
        }
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.edit_deadline = Some(deadline);
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn edit_deadline(&self) -> Option<DateTime<Utc>> {
        self.edit_deadline
    }

    /// Load a roster file
    pub async fn load(path: &Path) -> EquityResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| EquityError::persistence(format!("read roster {}", path.display()), e))?;
        let roster: StaticRoster = serde_json::from_slice(&bytes)?;
        roster.validate()?;
        component_debug!(
            ComponentId::current(),
            "👥 Loaded {} participants from {}",
            roster.participants.len(),
            path.display()
        );
        Ok(roster)
    }

    /// Write the roster back out, e.g. after `roster add`
    pub async fn save(&self, path: &Path) -> EquityResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, serde_json::to_vec_pretty(self)?).await?;
        Ok(())
    }

    /// Add or rename a participant
    pub fn upsert(&mut self, participant: Participant) {
        match self.participants.iter_mut().find(|p| p.id == participant.id) {
            Some(existing) => *existing = participant,
            None => self.participants.push(participant),
        }
    }

    fn validate(&self) -> EquityResult<()> {
        for (i, p) in self.participants.iter().enumerate() {
            if p.id.as_str().trim().is_empty() {
                return Err(EquityError::config(format!("participants[{i}].id is empty")));
            }
            if self.participants[..i].iter().any(|q| q.id == p.id) {
                return Err(EquityError::config(format!("participant id {} is listed twice", p.id)));
            }
        }
        Ok(())
    }

    /// Locked explicitly, or the deadline has passed as of `now`
    pub fn is_read_only_at(&self, now: DateTime<Utc>) -> bool {
        self.locked || self.edit_deadline.map(|deadline| now >= deadline).unwrap_or(false)
    }
}

#[async_trait]
impl Roster for StaticRoster {
    async fn participants(&self) -> EquityResult<Vec<Participant>> {
        Ok(self.participants.clone())
    }

    async fn is_read_only(&self) -> EquityResult<bool> {
        Ok(self.is_read_only_at(Utc::now()))
    }
}
