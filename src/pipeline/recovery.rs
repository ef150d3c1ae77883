//! Fault classification and cycle-failure recovery.
//!
//! Every fault raised during a cycle falls into exactly one class:
//!
//! - **Transient network**: log and retry immediately, no backoff sleep.
//! - **Dependency disconnected**: reconnect the notifier, retry the pending
//!   batch on the next opportunity.
//! - **User cancellation**: prompt; only an explicit "exit" stops the loop.
//! - **Fatal**: propagate and terminate, no automatic restart.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::{AppError, Result};
use crate::services::Notifier;
use crate::utils::log;

/// Classification of a cycle fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultClass {
    /// Page transport failure; retry the cycle immediately
    TransientNetwork,
    /// Notification transport lost; reconnect and resume
    DependencyDisconnected,
    /// Anything else; terminates the loop
    Fatal,
}

/// Classify a fault into its recovery class.
pub fn classify(error: &AppError) -> FaultClass {
    match error {
        AppError::Transport(_) => FaultClass::TransientNetwork,
        AppError::NotifierDisconnected(_) => FaultClass::DependencyDisconnected,
        _ => FaultClass::Fatal,
    }
}

/// Recover from a notifier disconnect: re-establish the connection and
/// clear the backoff so the pending batch goes out at the next
/// opportunity instead of waiting out a stale interval.
pub async fn recover_notifier(
    notifier: &mut dyn Notifier,
    sleep_secs: &mut f64,
    error: &AppError,
) -> Result<()> {
    log::warn(&format!(
        "notifier disconnected ({}), reconnecting; pending batch retries next cycle",
        error
    ));
    notifier.reconnect().await?;
    *sleep_secs = -1.0;
    Ok(())
}

/// Poll loop lifecycle state.
///
/// Transient and disconnect faults self-loop on `Running`; an interrupt
/// moves to `AwaitingConfirmation` and from there back to `Running` or on
/// to `Stopped`. Fatal faults go straight to `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    AwaitingConfirmation,
    Stopped,
}

/// Prompt the operator after an interrupt; returns `true` to stop.
///
/// Only the explicit text `exit` confirms. A second interrupt while the
/// prompt is open also stops, so the process never becomes un-killable.
pub async fn confirm_exit() -> bool {
    log::prompt("Type \"exit\" to stop the watcher: ");

    let mut line = String::new();
    let mut reader = BufReader::new(tokio::io::stdin());

    tokio::select! {
        read = reader.read_line(&mut line) => match read {
            Ok(0) => true, // stdin closed; nothing left to confirm with
            Ok(_) => line.trim().eq_ignore_ascii_case("exit"),
            Err(_) => true,
        },
        _ = tokio::signal::ctrl_c() => true,
    }
}
