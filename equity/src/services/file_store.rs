//! JSON file document store
//!
//! One directory per project under the base directory:
//!
//! ```text
//! <base>/<project>/drafts/<participant>.json
//! <base>/<project>/submissions/<participant>.json
//! <base>/<project>/state/<participant>.json
//! <base>/<project>/allocation.json
//! ```
//!
//! Writes go to a temporary file that is then renamed over the target, so a
//! reader never sees a half-written document and a retried write just
//! replaces the previous one.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{component_debug, ComponentId, ParticipantId, ProjectId};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::{Draft, FinalAllocation, Submission, SubmissionState};
use crate::error::{EquityError, EquityResult};
use crate::traits::DocumentStore;

pub struct JsonFileStore {
    /// Base directory for all projects
    base_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new() -> Self {
        Self::with_base_dir(PathBuf::from("./data"))
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn project_dir(&self, project: &ProjectId) -> PathBuf {
        self.base_dir.join(project.to_string())
    }

    fn owner_path(&self, project: &ProjectId, kind: &str, owner: &ParticipantId) -> PathBuf {
        self.project_dir(project)
            .join(kind)
            .join(format!("{}.json", file_stem(owner)))
    }

    fn allocation_path(&self, project: &ProjectId) -> PathBuf {
        self.project_dir(project).join("allocation.json")
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> EquityResult<Option<T>> {
        match fs::read(path).await {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| EquityError::persistence(format!("decode {}", path.display()), e))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EquityError::persistence(format!("read {}", path.display()), e)),
        }
    }

    async fn write_json<T: Serialize + Sync>(path: &Path, value: &T) -> EquityResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| EquityError::persistence(format!("create {}", parent.display()), e))?;
        }
        let content = serde_json::to_vec_pretty(value)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .await
            .map_err(|e| EquityError::persistence(format!("write {}", tmp.display()), e))?;
        fs::rename(&tmp, path)
            .await
            .map_err(|e| EquityError::persistence(format!("replace {}", path.display()), e))?;

        component_debug!(ComponentId::current(), "💾 Wrote {}", path.display());
        Ok(())
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Filesystem-safe, collision-free stem for a participant id
fn file_stem(owner: &ParticipantId) -> String {
    let mut out = String::with_capacity(owner.as_str().len());
    for b in owner.as_str().bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load_draft(&self, project: &ProjectId, owner: &ParticipantId) -> EquityResult<Option<Draft>> {
        Self::read_json(&self.owner_path(project, "drafts", owner)).await
    }

    async fn save_draft(&self, project: &ProjectId, draft: &Draft) -> EquityResult<()> {
        Self::write_json(&self.owner_path(project, "drafts", &draft.owner_id), draft).await
    }

    async fn load_submission(&self, project: &ProjectId, owner: &ParticipantId) -> EquityResult<Option<Submission>> {
        Self::read_json(&self.owner_path(project, "submissions", owner)).await
    }

    async fn save_submission(&self, project: &ProjectId, submission: &Submission) -> EquityResult<()> {
        Self::write_json(&self.owner_path(project, "submissions", &submission.owner_id), submission).await
    }

    async fn load_state(&self, project: &ProjectId, owner: &ParticipantId) -> EquityResult<SubmissionState> {
        Ok(Self::read_json(&self.owner_path(project, "state", owner))
            .await?
            .unwrap_or_default())
    }

    async fn save_state(&self, project: &ProjectId, owner: &ParticipantId, state: SubmissionState) -> EquityResult<()> {
        Self::write_json(&self.owner_path(project, "state", owner), &state).await
    }

    async fn load_allocation(&self, project: &ProjectId) -> EquityResult<FinalAllocation> {
        Ok(Self::read_json(&self.allocation_path(project)).await?.unwrap_or_default())
    }

    async fn save_allocation(&self, project: &ProjectId, allocation: &FinalAllocation) -> EquityResult<()> {
        Self::write_json(&self.allocation_path(project), allocation).await
    }
}
