use std::path::PathBuf;

use uuid::Uuid;

use crate::config::Settings;
use crate::error::{Result, StagehandError};

/// A validated runner invocation for one module/stage pair.
///
/// Preparation happens before the job is registered and fails fast: a
/// malformed reference or missing runner input means no job is created.
#[derive(Debug, Clone)]
pub struct RunnerInvocation {
    /// Correlation id for this invocation, distinct from the job id. The
    /// runner keys its own artifacts (including its status file) by it.
    pub ident: Uuid,
    pub module: String,
    pub stage: String,
    /// The runner's private data dir (input definitions).
    pub private_data_dir: PathBuf,
    /// Where the runner writes its artifacts.
    pub artifacts_dir: PathBuf,
    /// Entry playbook, relative to `private_data_dir`.
    pub playbook: String,
}

/// Module and stage names travel into extravars and derived paths, so they
/// are restricted to plain identifier characters.
fn valid_component(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 128
        && !s.starts_with('.')
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl RunnerInvocation {
    pub fn prepare(settings: &Settings, module: &str, stage: &str) -> Result<Self> {
        for (name, value) in [("module", module), ("stage", stage)] {
            if !valid_component(value) {
                return Err(StagehandError::InvalidTask {
                    module: module.to_string(),
                    stage: stage.to_string(),
                    reason: format!("{name} is not a valid task component name"),
                });
            }
        }

        let private_data_dir = settings.scripts_dir();
        if !private_data_dir.is_dir() {
            return Err(StagehandError::RunnerPrep(format!(
                "scripts directory {} does not exist",
                private_data_dir.display()
            )));
        }

        let playbook_path = settings.playbook_path();
        if !playbook_path.is_file() {
            return Err(StagehandError::RunnerPrep(format!(
                "playbook {} does not exist",
                playbook_path.display()
            )));
        }

        Ok(Self {
            ident: Uuid::new_v4(),
            module: module.to_string(),
            stage: stage.to_string(),
            private_data_dir,
            artifacts_dir: settings.artifacts_dir(),
            playbook: settings.playbook.clone(),
        })
    }
}
