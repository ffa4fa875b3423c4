use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stagehand::api::{run_api, ApiState};
use stagehand::config::Settings;
use stagehand::scheduler::JobScheduler;
use stagehand::shutdown::listen_for_shutdown;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "stagehand")]
#[command(version)]
#[command(about = "Schedules automation tasks against a bounded worker pool")]
struct Args {
    /// Host to bind the API server to
    #[arg(long)]
    host: Option<String>,

    /// Port the API server listens on
    #[arg(long)]
    port: Option<u16>,

    /// Number of pool workers executing runner invocations
    #[arg(long)]
    workers: Option<usize>,

    /// Base directory holding the scripts, artifacts and jobs areas
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Log verbosity (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut settings = Settings::from_env();
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(workers) = args.workers {
        settings.max_workers = workers;
    }
    if let Some(base_dir) = args.base_dir {
        settings.base_dir = base_dir;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;

    tracing::info!(
        addr = %addr,
        max_workers = settings.max_workers,
        scripts_dir = %settings.scripts_dir().display(),
        artifacts_dir = %settings.artifacts_dir().display(),
        jobs_dir = %settings.jobs_dir().display(),
        "Starting stagehand"
    );

    let prefix = settings.api_prefix.clone();
    let scheduler = Arc::new(JobScheduler::with_playbook_runner(settings));

    let shutdown_token = CancellationToken::new();
    listen_for_shutdown(shutdown_token.clone());

    let state = ApiState {
        scheduler: scheduler.clone(),
    };
    run_api(addr, state, &prefix, shutdown_token).await?;

    // The server has drained; finish running jobs and discard queued ones.
    scheduler.shutdown().await;

    Ok(())
}
