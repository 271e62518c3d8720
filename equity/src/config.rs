//! Engine configuration
//!
//! ## Configuration Sources
//! Values are resolved in this order, later sources winning:
//! 1. Built-in defaults
//! 2. `.env` file in the current directory or parent directories (if present)
//! 3. System environment variables
//! 4. Command line flags
//!
//! ## Variables
//! - `EQUITY_DATA_DIR`: base directory for project documents (default `./data`)
//! - `EQUITY_PROJECT_ID`: project UUID. When unset, project commands use the id
//!   stored in `<data_dir>/project_id`, generating and storing one on first use.
//! - `EQUITY_ROSTER_FILE`: roster JSON file (default `roster.json`)
//! - `EQUITY_LOG_LEVEL`: trace, debug, info, warn or error (default `info`)

use shared::{logging, ComponentId, ProjectId};
use std::path::PathBuf;

use crate::error::{EquityError, EquityResult};

pub const ENV_DATA_DIR: &str = "EQUITY_DATA_DIR";
pub const ENV_PROJECT_ID: &str = "EQUITY_PROJECT_ID";
pub const ENV_ROSTER_FILE: &str = "EQUITY_ROSTER_FILE";
pub const ENV_LOG_LEVEL: &str = "EQUITY_LOG_LEVEL";

/// File under the data directory holding the generated project id
pub const PROJECT_ID_FILE: &str = "project_id";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    pub project_id: Option<String>,
    pub roster_file: PathBuf,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            project_id: None,
            roster_file: PathBuf::from("roster.json"),
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `.env` and the process environment
    pub fn from_env() -> Self {
        // Silently ignored when no .env file exists
        let _ = dotenv::dotenv();
        Self::default().merge_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from an environment lookup
    pub fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(id) = lookup(ENV_PROJECT_ID) {
            self.project_id = Some(id);
        }
        if let Some(file) = lookup(ENV_ROSTER_FILE) {
            self.roster_file = PathBuf::from(file);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        self
    }

    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.data_dir = dir;
        }
        self
    }

    pub fn with_project_id(mut self, id: Option<String>) -> Self {
        if id.is_some() {
            self.project_id = id;
        }
        self
    }

    pub fn with_roster_file(mut self, file: Option<PathBuf>) -> Self {
        if let Some(file) = file {
            self.roster_file = file;
        }
        self
    }

    pub fn with_log_level(mut self, level: Option<String>) -> Self {
        if let Some(level) = level {
            self.log_level = level;
        }
        self
    }

    pub fn validate(&self) -> EquityResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(EquityError::config("data_dir must not be empty"));
        }
        if self.roster_file.as_os_str().is_empty() {
            return Err(EquityError::config("roster_file must not be empty"));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(EquityError::config(format!("log_level {:?} is not one of {:?}", self.log_level, LOG_LEVELS)));
        }
        if let Some(id) = &self.project_id {
            ProjectId::from_string(id)?;
        }
        Ok(())
    }

    /// The explicitly configured project
    pub fn project(&self) -> EquityResult<ProjectId> {
        let id = self
            .project_id
            .as_deref()
            .ok_or_else(|| EquityError::config(format!("project id (set {ENV_PROJECT_ID} or --project)")))?;
        Ok(ProjectId::from_string(id)?)
    }

    /// The configured project, else the one persisted under the data
    /// directory, else a freshly generated id that is persisted for next time
    pub async fn resolve_project(&self) -> EquityResult<ProjectId> {
        if self.project_id.is_some() {
            return self.project();
        }

        let path = self.data_dir.join(PROJECT_ID_FILE);
        if tokio::fs::try_exists(&path).await? {
            let stored = tokio::fs::read_to_string(&path).await?;
            return Ok(ProjectId::from_string(stored.trim())?);
        }

        let project = ProjectId::new();
        tokio::fs::create_dir_all(&self.data_dir).await?;
        tokio::fs::write(&path, format!("{project}\n")).await?;
        logging::log_progress(
            ComponentId::current(),
            "Generated project",
            &format!("{project} stored in {}", path.display()),
        );
        Ok(project)
    }
}
