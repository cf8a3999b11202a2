//! Process shutdown: OS signals feeding a root `CancellationToken`.

use std::fmt;

use tokio::signal;
use tokio_util::sync::CancellationToken;

/// The signal that ended the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        })
    }
}

/// Wait for Ctrl+C or, on unix, SIGTERM.
///
/// # Errors
/// Returns an error if a signal handler cannot be installed.
pub async fn wait_for_shutdown() -> std::io::Result<ShutdownSignal> {
    let received = tokio::select! {
        res = signal::ctrl_c() => res.map(|()| ShutdownSignal::Interrupt)?,
        res = terminate() => res?,
    };
    tracing::info!(signal = %received, "shutdown requested");
    Ok(received)
}

#[cfg(unix)]
async fn terminate() -> std::io::Result<ShutdownSignal> {
    let mut stream = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    stream.recv().await;
    Ok(ShutdownSignal::Terminate)
}

#[cfg(not(unix))]
async fn terminate() -> std::io::Result<ShutdownSignal> {
    std::future::pending().await
}

/// Root token for every server and background task of the process.
///
/// Cancelled on the first shutdown signal, or right away if the handlers
/// cannot be installed. Must be called from within a Tokio runtime.
#[must_use]
pub fn shutdown_token() -> CancellationToken {
    let root = CancellationToken::new();
    tokio::spawn(cancel_on_signal(root.clone()));
    root
}

async fn cancel_on_signal(token: CancellationToken) {
    if let Err(e) = wait_for_shutdown().await {
        tracing::error!(error = %e, "failed to install signal handlers");
    }
    token.cancel();
}
