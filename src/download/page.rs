//! Per-page download scheduling.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::api::{Fetcher, Item, Page};
use crate::config::{Config, OptionsConfig};
use crate::download::state::PageOutcome;
use crate::error::{Error, Result};
use crate::fs::{
    ensure_dir, file_exists, item_directory, write_atomic, write_text_once, TempNamer,
    INFO_FILENAME,
};
use crate::media::{parse_item_media, DownloadTarget};

/// Downloads the attachments of listing pages.
///
/// The semaphore lives as long as the downloader, so the concurrency cap
/// applies across pages and across polls. Download tasks are detached: a
/// page returns as soon as its downloads are dispatched.
pub struct Downloader {
    fetcher: Arc<dyn Fetcher>,
    options: OptionsConfig,
    semaphore: Arc<Semaphore>,
    capacity: u32,
    namer: Arc<TempNamer>,
}

impl Downloader {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: &Config, namer: TempNamer) -> Self {
        let capacity = u32::try_from(config.options.max_parallel.max(1)).unwrap_or(u32::MAX);

        Self {
            fetcher,
            options: config.options.clone(),
            semaphore: Arc::new(Semaphore::new(capacity as usize)),
            capacity,
            namer: Arc::new(namer),
        }
    }

    /// Dispatch downloads for every item on a page.
    ///
    /// Files already present are skipped. `last_fetched` in the outcome
    /// reflects only the last downloadable item of the page.
    pub async fn download_page(&self, page: &Page) -> Result<PageOutcome> {
        let mut outcome = PageOutcome::default();

        for item in &page.items {
            let Some(media) =
                parse_item_media(item, |ext| self.options.allows_extension(ext))
            else {
                tracing::debug!(item = %item.id, kind = %item.kind, "Nothing to download");
                continue;
            };

            let dir = item_directory(&self.options.dest_dir, item);
            ensure_dir(&dir).await?;

            let mut present = 0;
            for attachment in &media.attachments {
                let target = attachment.target(&dir);

                if file_exists(&target.path()).await {
                    present += 1;
                    continue;
                }

                self.dispatch(target).await?;
                outcome.dispatched += 1;
            }

            self.write_info(&dir, item, &media.caption).await;

            outcome.items += 1;
            outcome.already_present += present;
            outcome.last_fetched = present == media.attachments.len();
        }

        Ok(outcome)
    }

    /// Wait until every dispatched download has finished.
    pub async fn wait_idle(&self) -> Result<()> {
        let _all = self
            .semaphore
            .acquire_many(self.capacity)
            .await
            .map_err(|_| Error::SemaphoreClosed)?;
        Ok(())
    }

    /// Take a slot and spawn the download; the slot is freed when the task ends.
    async fn dispatch(&self, target: DownloadTarget) -> Result<()> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| Error::SemaphoreClosed)?;

        let fetcher = Arc::clone(&self.fetcher);
        let namer = Arc::clone(&self.namer);

        tokio::spawn(async move {
            let _permit = permit;

            match download_target(fetcher.as_ref(), &target, &namer).await {
                Ok(bytes) => {
                    tracing::info!(path = %target.path().display(), bytes, "Downloaded");
                }
                Err(e) => {
                    tracing::warn!(url = %target.url, error = %e, "Failed to download attachment");
                }
            }
        });

        Ok(())
    }

    async fn write_info(&self, dir: &Path, item: &Item, caption: &str) {
        let text = format!("{}\n\n{}", item.url(), caption);
        let path = dir.join(INFO_FILENAME);

        match write_text_once(&path, &text, &self.namer).await {
            Ok(true) => tracing::debug!(path = %path.display(), "Wrote info file"),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to write info file");
            }
        }
    }
}

/// Fetch one attachment and commit it to disk.
async fn download_target(
    fetcher: &dyn Fetcher,
    target: &DownloadTarget,
    namer: &TempNamer,
) -> Result<u64> {
    let mut body = fetcher.fetch(&target.url).await?;
    write_atomic(&target.path(), &mut body, namer).await
}
