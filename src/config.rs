use std::path::PathBuf;

/// Runtime settings for the service.
///
/// Every option is sourced from a `STAGEHAND_*` environment variable and has
/// a default; a missing or unparseable variable falls back silently. CLI
/// flags may override individual fields after loading.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Number of pool workers executing runner invocations concurrently.
    pub max_workers: usize,
    /// Host the API server binds to.
    pub host: String,
    /// Port the API server listens on.
    pub port: u16,
    /// Default log verbosity (overridden by `RUST_LOG` when set).
    pub log_level: String,
    /// Base directory holding the scripts, artifacts and jobs areas.
    pub base_dir: PathBuf,
    /// Subpath under `base_dir` with the runner's input definitions.
    pub scripts_path: String,
    /// Subpath under `base_dir` the runner writes its artifacts to,
    /// keyed by its own correlation id.
    pub artifacts_path: String,
    /// Subpath under `base_dir` holding this system's durable job state.
    pub jobs_path: String,
    /// Optional path prefix for all HTTP routes (e.g. "/automation").
    pub api_prefix: String,
    /// External runner binary.
    pub runner_bin: String,
    /// Entry playbook the runner executes.
    pub playbook: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_workers: 2,
            host: "127.0.0.1".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            base_dir: PathBuf::from("."),
            scripts_path: "runtime-automation".to_string(),
            artifacts_path: "artifacts".to_string(),
            jobs_path: "jobs".to_string(),
            api_prefix: String::new(),
            runner_bin: "ansible-runner".to_string(),
            playbook: "main.yml".to_string(),
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

impl Settings {
    /// Load settings from the environment, falling back to defaults for
    /// anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_workers: env_var("STAGEHAND_MAX_WORKERS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_workers),
            host: env_var("STAGEHAND_HOST").unwrap_or(defaults.host),
            port: env_var("STAGEHAND_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            log_level: env_var("STAGEHAND_LOG_LEVEL").unwrap_or(defaults.log_level),
            base_dir: env_var("STAGEHAND_BASE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.base_dir),
            scripts_path: env_var("STAGEHAND_SCRIPTS_PATH").unwrap_or(defaults.scripts_path),
            artifacts_path: env_var("STAGEHAND_ARTIFACTS_PATH").unwrap_or(defaults.artifacts_path),
            jobs_path: env_var("STAGEHAND_JOBS_PATH").unwrap_or(defaults.jobs_path),
            api_prefix: env_var("STAGEHAND_API_PREFIX").unwrap_or(defaults.api_prefix),
            runner_bin: env_var("STAGEHAND_RUNNER_BIN").unwrap_or(defaults.runner_bin),
            playbook: env_var("STAGEHAND_PLAYBOOK").unwrap_or(defaults.playbook),
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Directory with the runner's input definitions (its private data dir).
    pub fn scripts_dir(&self) -> PathBuf {
        self.base_dir.join(&self.scripts_path)
    }

    /// Directory the external runner writes its artifacts to.
    pub fn artifacts_dir(&self) -> PathBuf {
        self.base_dir.join(&self.artifacts_path)
    }

    /// Directory holding this system's durable job metadata and output.
    pub fn jobs_dir(&self) -> PathBuf {
        self.base_dir.join(&self.jobs_path)
    }

    pub fn playbook_path(&self) -> PathBuf {
        self.scripts_dir().join(&self.playbook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn settings_defaults() {
        let cfg = Settings::default();
        assert_eq!(cfg.max_workers, 2);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.scripts_path, "runtime-automation");
        assert_eq!(cfg.artifacts_path, "artifacts");
        assert_eq!(cfg.jobs_path, "jobs");
        assert_eq!(cfg.api_prefix, "");
        assert_eq!(cfg.playbook, "main.yml");
    }

    #[test]
    fn settings_derived_dirs() {
        let cfg = Settings::default().with_base_dir("/srv/validation");
        assert_eq!(
            cfg.scripts_dir(),
            Path::new("/srv/validation/runtime-automation")
        );
        assert_eq!(cfg.artifacts_dir(), Path::new("/srv/validation/artifacts"));
        assert_eq!(cfg.jobs_dir(), Path::new("/srv/validation/jobs"));
        assert_eq!(
            cfg.playbook_path(),
            Path::new("/srv/validation/runtime-automation/main.yml")
        );
    }

    #[test]
    fn settings_builders() {
        let cfg = Settings::default()
            .with_base_dir("/tmp/sh")
            .with_max_workers(8);
        assert_eq!(cfg.base_dir, Path::new("/tmp/sh"));
        assert_eq!(cfg.max_workers, 8);
    }
}
