//! Top-level poll loop.
//!
//! Drives cycles indefinitely: sleep (skipped on the first iteration) →
//! run one cycle under the recovery policy → compute the next delay from
//! this cycle's elapsed time → repeat until stopped. The loop exclusively
//! owns the scheduler state, the pending-notification buffer, and the page
//! source and notifier handles for the process lifetime.

use std::time::Duration;

use crate::error::Result;
use crate::models::{Listing, WatchConfig};
use crate::services::{Notifier, PageSource};
use crate::utils::log;

use super::cycle::run_cycle;
use super::index::DedupIndex;
use super::recovery::{FaultClass, LoopState, classify, confirm_exit, recover_notifier};
use super::scheduler::{BackoffScheduler, SchedulerState};

/// Run the watch loop until the operator confirms an exit or a fatal fault
/// propagates.
pub async fn run_watch(
    config: &WatchConfig,
    source: &mut dyn PageSource,
    notifier: &mut dyn Notifier,
    index: &DedupIndex,
) -> Result<()> {
    let mut state = LoopState::Running;
    let mut sched_state = SchedulerState::new();
    let mut scheduler = BackoffScheduler::new(config.refresh_rate, config.refresh_sigma);
    let mut pending: Vec<Listing> = Vec::new();

    // Negative means "no sleep": the first iteration and immediate retries.
    let mut sleep_secs = -1.0_f64;

    loop {
        match state {
            LoopState::Stopped => break,

            LoopState::AwaitingConfirmation => {
                state = if confirm_exit().await {
                    LoopState::Stopped
                } else {
                    log::info("resuming");
                    sleep_secs = -1.0;
                    LoopState::Running
                };
            }

            LoopState::Running => {
                if sleep_secs > 0.0 {
                    tokio::select! {
                        _ = tokio::time::sleep(Duration::from_secs_f64(sleep_secs)) => {}
                        _ = tokio::signal::ctrl_c() => {
                            state = LoopState::AwaitingConfirmation;
                            continue;
                        }
                    }
                }

                let outcome = tokio::select! {
                    result = run_cycle(
                        source,
                        &*notifier,
                        index,
                        &mut pending,
                        &config.name,
                        sched_state.seq,
                    ) => result,
                    _ = tokio::signal::ctrl_c() => {
                        state = LoopState::AwaitingConfirmation;
                        continue;
                    }
                };

                match outcome {
                    Ok(mut report) => {
                        if let Some(error) = report.notify_error.take() {
                            recover_notifier(notifier, &mut sleep_secs, &error).await?;
                        }

                        sched_state.advance(report.elapsed.as_secs_f64());
                        sleep_secs = scheduler.next_delay(sched_state.last_elapsed);

                        log::info(&format!(
                            "cycle {} [{}]: {} new | {} old | took {:.1}s | sleeping {:.1}s",
                            report.seq,
                            report.started_at.format("%m/%d/%Y %H:%M:%S"),
                            report.fresh.len(),
                            report.old_count(),
                            sched_state.last_elapsed,
                            sleep_secs.max(0.0),
                        ));
                    }
                    Err(error) => match classify(&error) {
                        FaultClass::TransientNetwork => {
                            log::warn(&format!("fetch failed ({}), retrying", error));
                            sleep_secs = -1.0;
                        }
                        FaultClass::DependencyDisconnected => {
                            recover_notifier(notifier, &mut sleep_secs, &error).await?;
                        }
                        FaultClass::Fatal => return Err(error),
                    },
                }
            }
        }
    }

    log::success("watcher stopped");
    Ok(())
}
