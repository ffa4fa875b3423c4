use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::runner::{RunOutcome, RunnerInvocation, TaskRunner};
use crate::scheduler::job::JobStatus;

/// Runs the external runner binary for a prepared invocation.
///
/// The process is driven to completion and its exit status mapped to the
/// job's terminal status; stdout and stderr are captured as the job output.
#[derive(Debug, Clone)]
pub struct PlaybookRunner {
    bin: String,
}

impl PlaybookRunner {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }
}

#[async_trait]
impl TaskRunner for PlaybookRunner {
    async fn run(&self, invocation: &RunnerInvocation, _cancel: CancellationToken) -> RunOutcome {
        let args = vec![
            "run".to_string(),
            invocation.private_data_dir.display().to_string(),
            "-p".to_string(),
            invocation.playbook.clone(),
            "--ident".to_string(),
            invocation.ident.to_string(),
            "--artifact-dir".to_string(),
            invocation.artifacts_dir.display().to_string(),
            "--cmdline".to_string(),
            format!(
                "-e module_dir={} -e module_stage={}",
                invocation.module, invocation.stage
            ),
        ];

        tracing::info!(
            ident = %invocation.ident,
            module = %invocation.module,
            stage = %invocation.stage,
            bin = %self.bin,
            "Invoking runner"
        );

        let result = Command::new(&self.bin)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        match result {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                let exit_code = output.status.code();

                let status = if output.status.success() {
                    JobStatus::Successful
                } else {
                    JobStatus::Failed
                };

                tracing::info!(
                    ident = %invocation.ident,
                    status = %status,
                    exit_code = ?exit_code,
                    "Runner finished"
                );

                let mut text = stdout;
                if !stderr.is_empty() {
                    text.push_str(&stderr);
                }

                RunOutcome {
                    status,
                    output: text,
                }
            }
            Err(e) => {
                tracing::error!(ident = %invocation.ident, error = %e, "Failed to launch runner");
                RunOutcome::failed(e.to_string())
            }
        }
    }
}
