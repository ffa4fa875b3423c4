use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;

/// Cancel `token` once SIGTERM or SIGINT arrives.
///
/// The API server stops accepting requests and the scheduler drains when
/// the token trips. If the handlers cannot be installed the process keeps
/// running and can only be stopped externally.
pub fn listen_for_shutdown(token: CancellationToken) {
    tokio::spawn(async move {
        let signaled = async {
            let mut sigterm = signal(SignalKind::terminate())?;
            let mut sigint = signal(SignalKind::interrupt())?;
            let name = tokio::select! {
                _ = sigterm.recv() => "SIGTERM",
                _ = sigint.recv() => "SIGINT",
            };
            std::io::Result::Ok(name)
        };

        match signaled.await {
            Ok(name) => {
                tracing::info!(signal = name, "Shutdown signal received, draining");
                token.cancel();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handlers");
            }
        }
    });
}
