//! Poll/diff/notify pipeline.
//!
//! - `index`: persisted dedup index of seen listing ids
//! - `scheduler`: jittered inter-cycle backoff
//! - `cycle`: one fetch→extract→diff→notify→persist pass
//! - `recovery`: fault classification and operator interrupts
//! - `watch`: the top-level loop driving it all

pub mod cycle;
pub mod index;
pub mod recovery;
pub mod scheduler;
pub mod watch;

pub use cycle::{CycleReport, run_cycle};
pub use index::DedupIndex;
pub use recovery::{FaultClass, LoopState, classify, recover_notifier};
pub use scheduler::{BackoffScheduler, GaussianSampler, JitterSampler, SchedulerState};
pub use watch::run_watch;
