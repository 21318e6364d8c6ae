//! # OS signal handling.
//!
//! Provides [`wait_for_shutdown_signal`], an async helper that completes when
//! the process receives a termination signal. Interrupt (Ctrl-C) and
//! termination both map to the same graceful-shutdown path: the caller
//! dispatches `Terminate` to the supervisor and waits for the cascade.

/// Waits for a termination signal (`SIGINT`, `SIGTERM` or Ctrl-C).
///
/// Each call creates independent signal listeners. Returns `Ok(())` when any
/// signal is received, or `Err` if listener registration fails.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal (Ctrl-C only off Unix).
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
