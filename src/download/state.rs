//! Poll and page result tracking.

use std::fmt;

/// Result of processing one listing page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageOutcome {
    /// Whether the last downloadable item on the page already had every
    /// attachment on disk. Earlier items on the page do not affect it.
    pub last_fetched: bool,
    /// Items with at least one attachment to consider.
    pub items: usize,
    /// Attachments skipped because the file already existed.
    pub already_present: usize,
    /// Attachments handed to a download task.
    pub dispatched: usize,
}

/// Why a poll stopped walking pages.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Visited the configured number of pages.
    #[default]
    DepthLimit,
    /// The previous page had no cursor to an older page.
    NoMorePages,
    /// A page whose last item was already downloaded.
    CaughtUp,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::DepthLimit => write!(f, "page limit reached"),
            StopReason::NoMorePages => write!(f, "no more pages"),
            StopReason::CaughtUp => write!(f, "caught up"),
        }
    }
}

/// Summary of one poll cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub pages_visited: usize,
    pub stop: StopReason,
    pub items: usize,
    pub already_present: usize,
    pub dispatched: usize,
}

impl PollReport {
    /// Add a visited page to the report.
    pub fn record_page(&mut self, outcome: &PageOutcome) {
        self.pages_visited += 1;
        self.items += outcome.items;
        self.already_present += outcome.already_present;
        self.dispatched += outcome.dispatched;
    }
}

/// Totals across every poll of the process.
#[derive(Debug, Default)]
pub struct RunStats {
    pub polls: u64,
    pub failed_polls: u64,
    pub pages_visited: u64,
    pub dispatched: u64,
    pub already_present: u64,
}

impl RunStats {
    /// Add a successful poll.
    pub fn add_poll(&mut self, report: &PollReport) {
        self.polls += 1;
        self.pages_visited += report.pages_visited as u64;
        self.dispatched += report.dispatched as u64;
        self.already_present += report.already_present as u64;
    }

    /// Mark a poll as failed.
    pub fn mark_poll_failed(&mut self) {
        self.polls += 1;
        self.failed_polls += 1;
    }
}
