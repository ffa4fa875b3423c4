use std::io::ErrorKind;
use std::path::PathBuf;

use uuid::Uuid;

use crate::config::Settings;
use crate::error::Result;
use crate::scheduler::job::JobMetadata;

const METADATA_FILE: &str = "job.json";
const OUTPUT_FILE: &str = "output";
const RUNNER_STATUS_FILE: &str = "status";

/// Durable job state under the jobs area, plus read access to the external
/// runner's own status artifact under the artifacts area.
///
/// Layout: `<jobs_dir>/<job_id>/job.json` and `<jobs_dir>/<job_id>/output`;
/// the runner writes `<artifacts_dir>/<runner_id>/status` on its own.
#[derive(Debug, Clone)]
pub struct JobStore {
    jobs_dir: PathBuf,
    artifacts_dir: PathBuf,
}

impl JobStore {
    pub fn new(settings: &Settings) -> Self {
        Self {
            jobs_dir: settings.jobs_dir(),
            artifacts_dir: settings.artifacts_dir(),
        }
    }

    fn job_dir(&self, id: &Uuid) -> PathBuf {
        self.jobs_dir.join(id.to_string())
    }

    /// Persist the metadata mirror, overwriting any previous version.
    ///
    /// The document is written to a temp file and renamed into place, so a
    /// concurrent reader never observes a truncated document.
    pub async fn write_metadata(&self, meta: &JobMetadata) -> Result<()> {
        let dir = self.job_dir(&meta.id);
        tokio::fs::create_dir_all(&dir).await?;

        let data = serde_json::to_vec_pretty(meta)?;
        let tmp = dir.join(format!("{METADATA_FILE}.tmp"));
        tokio::fs::write(&tmp, &data).await?;
        tokio::fs::rename(&tmp, dir.join(METADATA_FILE)).await?;
        Ok(())
    }

    /// Read the metadata mirror back. Absent files are `None`; a document
    /// that exists but fails to parse is an error, so recovery failures are
    /// distinguishable from never-persisted ids.
    pub async fn read_metadata(&self, id: &Uuid) -> Result<Option<JobMetadata>> {
        let path = self.job_dir(id).join(METADATA_FILE);
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&data)?))
    }

    /// Read the status artifact the external runner maintains for its own
    /// invocation. The file's presence and content are entirely
    /// runner-controlled and treated as untrusted input.
    pub async fn read_runner_status(&self, runner_id: &Uuid) -> Option<String> {
        let path = self
            .artifacts_dir
            .join(runner_id.to_string())
            .join(RUNNER_STATUS_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(_) => None,
        }
    }

    /// Best-effort read of captured output; empty if not yet available.
    pub async fn read_output(&self, id: &Uuid) -> String {
        tokio::fs::read_to_string(self.job_dir(id).join(OUTPUT_FILE))
            .await
            .unwrap_or_default()
    }

    pub async fn write_output(&self, id: &Uuid, text: &str) -> Result<()> {
        let dir = self.job_dir(id);
        tokio::fs::create_dir_all(&dir).await?;

        let tmp = dir.join(format!("{OUTPUT_FILE}.tmp"));
        tokio::fs::write(&tmp, text).await?;
        tokio::fs::rename(&tmp, dir.join(OUTPUT_FILE)).await?;
        Ok(())
    }
}
