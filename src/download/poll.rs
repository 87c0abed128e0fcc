//! Backward pagination over the post listing.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::api::{Fetcher, Page};
use crate::download::page::Downloader;
use crate::download::state::{PollReport, RunStats, StopReason};
use crate::error::Result;

/// Walks the listing from the newest page towards older ones.
pub struct Poller {
    fetcher: Arc<dyn Fetcher>,
    downloader: Downloader,
    first_page_url: String,
    max_page_behind: usize,
}

impl Poller {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        downloader: Downloader,
        first_page_url: String,
        max_page_behind: usize,
    ) -> Self {
        Self {
            fetcher,
            downloader,
            first_page_url,
            max_page_behind,
        }
    }

    pub fn downloader(&self) -> &Downloader {
        &self.downloader
    }

    /// Run one poll cycle.
    ///
    /// Visits at most `max_page_behind` pages. Unless `fetch_all` is set, the
    /// walk stops at the first page whose last item is already on disk: pages
    /// are newest first, so everything older is assumed synced. Any page
    /// failure aborts the whole poll.
    pub async fn poll(&self, fetch_all: bool) -> Result<PollReport> {
        let mut report = PollReport::default();
        let mut last_page: Option<Page> = None;
        let mut index = 0;

        while index < self.max_page_behind {
            tracing::info!(page = index, "Scanning page");

            let url = match &last_page {
                None => self.first_page_url.clone(),
                Some(page) => match page.next_cursor() {
                    Some(cursor) => cursor.to_string(),
                    None => {
                        tracing::info!(page = index, "There is no next page");
                        report.stop = StopReason::NoMorePages;
                        break;
                    }
                },
            };

            let page = self
                .fetcher
                .fetch_page(&url)
                .await
                .map_err(|e| e.on_page(index))?;

            let outcome = self
                .downloader
                .download_page(&page)
                .await
                .map_err(|e| e.on_page(index))?;
            report.record_page(&outcome);

            if !fetch_all && outcome.last_fetched {
                report.stop = StopReason::CaughtUp;
                break;
            }

            tracing::debug!(
                page = index,
                fetch_all,
                "Last item unfetched or full sweep; continuing"
            );
            last_page = Some(page);
            index += 1;
        }

        tracing::info!(
            pages = report.pages_visited,
            dispatched = report.dispatched,
            stop = %report.stop,
            "Finished poll"
        );

        Ok(report)
    }

    /// Poll every `every` until `shutdown` resolves.
    ///
    /// `shutdown` is watched during the wait and during a poll, so a poll in
    /// progress is abandoned as soon as it fires. Downloads that poll already
    /// dispatched keep running. Failed polls are logged and counted.
    pub async fn run_periodic<S, F>(
        &self,
        every: Duration,
        shutdown: S,
        stats: &mut RunStats,
        mut on_poll: F,
    ) where
        S: Future<Output = ()>,
        F: FnMut(&PollReport),
    {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately.
        ticker.tick().await;

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Abandoning poll in progress");
                    break;
                }
                result = self.poll(false) => match result {
                    Ok(report) => {
                        on_poll(&report);
                        stats.add_poll(&report);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to periodically poll");
                        stats.mark_poll_failed();
                    }
                },
            }
        }
    }
}
