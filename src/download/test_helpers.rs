//! Shared test helpers: an in-memory fetcher and post builders.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_util::io::StreamReader;

use crate::api::client::BodyReader;
use crate::api::{FileBody, Fetcher, Image, ImageBody, Item, ItemBody, Page, PostFile};
use crate::config::Config;
use crate::download::page::Downloader;
use crate::error::{Error, Result};
use crate::fs::TempNamer;

pub(crate) const FILE_HOST: &str = "https://downloads.fanbox.cc/images/post";

/// Fetcher serving pages from a map and echoing URLs back as file bodies.
///
/// URLs in `failing` are refused outright; URLs in `truncated` start a body
/// that breaks off after a few bytes.
#[derive(Default)]
pub(crate) struct MockFetcher {
    pub pages: HashMap<String, Page>,
    pub failing: HashSet<String>,
    pub truncated: HashSet<String>,
    pub page_delay: Duration,
    pub delay: Duration,
    pub page_fetches: AtomicUsize,
    pub file_fetches: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl MockFetcher {
    pub fn with_pages(pages: impl IntoIterator<Item = (String, Page)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn page_fetches(&self) -> usize {
        self.page_fetches.load(Ordering::SeqCst)
    }

    pub fn file_fetches(&self) -> usize {
        self.file_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<BodyReader> {
        self.file_fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(url) {
            return Err(Error::FetchFailed {
                url: url.to_string(),
                attempts: 1,
                status: Some(500),
                reason: "unexpected status code 500".to_string(),
            });
        }

        if self.truncated.contains(url) {
            let chunks: Vec<io::Result<&'static [u8]>> = vec![
                Ok(&b"partial"[..]),
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset")),
            ];
            return Ok(Box::pin(StreamReader::new(futures::stream::iter(chunks))));
        }

        Ok(Box::pin(io::Cursor::new(url.as_bytes().to_vec())))
    }

    async fn fetch_page(&self, url: &str) -> Result<Page> {
        self.page_fetches.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.page_delay).await;
        self.pages.get(url).cloned().ok_or_else(|| Error::FetchFailed {
            url: url.to_string(),
            attempts: 1,
            status: Some(404),
            reason: "unexpected status code 404".to_string(),
        })
    }
}

/// Config rooted at `dest` with the given download concurrency.
pub(crate) fn test_config(dest: &Path, max_parallel: usize) -> Config {
    let mut config = Config::default();
    config.account.session_id = "12345678_testsession".to_string();
    config.options.dest_dir = dest.to_path_buf();
    config.options.max_parallel = max_parallel;
    config
}

pub(crate) fn test_downloader(fetcher: Arc<MockFetcher>, config: &Config) -> Downloader {
    Downloader::new(fetcher, config, TempNamer::new(StdRng::seed_from_u64(1)))
}

pub(crate) fn file_url(post_id: &str, filename: &str) -> String {
    format!("{}/{}/{}", FILE_HOST, post_id, filename)
}

fn base_item(id: &str, kind: &str, body: ItemBody) -> Item {
    Item {
        id: id.to_string(),
        title: format!("Post {}", id),
        kind: kind.to_string(),
        creator_id: "alice".to_string(),
        published_datetime: DateTime::parse_from_rfc3339("2021-06-01T12:00:00+09:00")
            .expect("valid timestamp"),
        updated_datetime: None,
        cover_image_url: None,
        fee_required: 0,
        excerpt: String::new(),
        is_liked: false,
        like_count: 0,
        comment_count: 0,
        has_adult_content: false,
        status: "published".to_string(),
        user: Default::default(),
        body,
    }
}

/// Image post with one image per filename.
pub(crate) fn image_item(id: &str, filenames: &[&str]) -> Item {
    let images = filenames
        .iter()
        .map(|name| Image {
            id: name.to_string(),
            extension: String::new(),
            width: 0,
            height: 0,
            original_url: file_url(id, name),
            thumbnail_url: None,
        })
        .collect();

    base_item(
        id,
        "image",
        ItemBody::Image(ImageBody {
            text: format!("caption {}", id),
            images,
        }),
    )
}

/// File post; each entry is (filename, extension).
pub(crate) fn file_item(id: &str, files: &[(&str, &str)]) -> Item {
    let files = files
        .iter()
        .map(|(name, ext)| PostFile {
            id: name.to_string(),
            name: name.to_string(),
            extension: ext.to_string(),
            size: 0,
            url: file_url(id, name),
        })
        .collect();

    base_item(
        id,
        "file",
        ItemBody::File(FileBody {
            text: String::new(),
            files,
        }),
    )
}

pub(crate) fn page(items: Vec<Item>, next_url: Option<&str>) -> Page {
    Page {
        items,
        next_url: next_url.map(str::to_string),
    }
}
