//! One poll cycle: refresh → extract → diff → notify → persist.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::Listing;
use crate::services::{Notifier, PageSource, extract_listings, subject_line};

use super::index::DedupIndex;

/// Result of a single completed poll cycle.
#[derive(Debug)]
pub struct CycleReport {
    /// 1-based cycle sequence number (log correlation only, not persisted)
    pub seq: u64,
    /// Wall-clock start of the cycle
    pub started_at: DateTime<Utc>,
    /// Every listing fetched this cycle
    pub listings: Vec<Listing>,
    /// The subset not present in the dedup index
    pub fresh: Vec<Listing>,
    /// Wall-clock duration of the cycle
    pub elapsed: Duration,
    /// Set when notification delivery failed; the ids are persisted anyway
    /// and the batch is carried in `pending` for a later retry
    pub notify_error: Option<AppError>,
}

impl CycleReport {
    /// Count of listings already present in the index.
    pub fn old_count(&self) -> usize {
        self.listings.len() - self.fresh.len()
    }
}

/// Run one fetch→extract→diff→persist→notify pass.
///
/// Side effect ordering is significant: the merged index is committed
/// immediately after the diff, before any delivery attempt, so neither a
/// delivery failure nor a cancellation mid-send can cause an id to be
/// re-notified by a later cycle. A fault raised before persistence leaves
/// the on-disk index untouched.
///
/// `pending` carries a batch whose delivery failed on an earlier cycle; it
/// is prepended to this cycle's outgoing notification and put back on
/// failure.
pub async fn run_cycle(
    source: &mut dyn PageSource,
    notifier: &dyn Notifier,
    index: &DedupIndex,
    pending: &mut Vec<Listing>,
    search_name: &str,
    seq: u64,
) -> Result<CycleReport> {
    let started_at = Utc::now();
    let started = Instant::now();

    let html = source.refresh().await?;
    let listings = extract_listings(&html)?;

    let seen = index.load().await;
    let (fresh, fresh_ids) = DedupIndex::diff(&listings, &seen);

    // Commit before the delivery attempt: once an id is about to be
    // notified it must already be on disk, or a cancellation while the
    // send is in flight would re-notify it after resume. An empty fetch
    // saves nothing (no-op cycle).
    if !fresh_ids.is_empty() {
        index.merge_and_save(&seen, &fresh_ids).await?;
    }

    let mut outgoing: Vec<Listing> = pending.drain(..).collect();
    outgoing.extend(fresh.iter().cloned());

    let mut notify_error = None;
    if !outgoing.is_empty() {
        let subject = subject_line(outgoing.len(), search_name);
        if let Err(error) = notifier.send(&outgoing, &subject).await {
            *pending = outgoing;
            notify_error = Some(error);
        }
    }

    Ok(CycleReport {
        seq,
        started_at,
        listings,
        fresh,
        elapsed: started.elapsed(),
        notify_error,
    })
}
