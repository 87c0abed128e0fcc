//! Download module: the poll loop body.
//!
//! This module provides:
//! - Backward pagination over a post listing
//! - Bounded-concurrency attachment downloads per page
//! - Poll and page result tracking

pub mod page;
pub mod poll;
pub mod state;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use page::Downloader;
pub use poll::Poller;
pub use state::{PageOutcome, PollReport, RunStats, StopReason};
