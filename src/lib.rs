//! FANBOX Poller - keeps a local mirror of pixiv FANBOX posts
//!
//! This library polls the post listing of a cookie-authenticated FANBOX
//! session and downloads new images and files into a directory tree.
//!
//! # Features
//!
//! - Walks the "supporting" or "home" listing newest-first
//! - Stops early once a page is already synced
//! - Bounded parallel downloads with per-request retries
//! - Atomic writes: a file on disk is always complete
//! - Safe to restart at any time; the filesystem is the only state
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fanbox_poller::{Config, Downloader, FanboxSession, Fetcher, Poller};
//! use fanbox_poller::fs::TempNamer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.account.session_id = "12345678_xxxxxxxx".to_string();
//!
//!     let session = Arc::new(FanboxSession::new(&config.account.session_id, 4)?);
//!     let first_page = session.listing_url(config.options.listing);
//!     let fetcher: Arc<dyn Fetcher> = session;
//!
//!     let downloader = Downloader::new(fetcher.clone(), &config, TempNamer::from_entropy());
//!     let poller = Poller::new(fetcher, downloader, first_page, 2);
//!
//!     let report = poller.poll(true).await?;
//!     println!("visited {} page(s)", report.pages_visited);
//!     poller.downloader().wait_idle().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;

// Re-exports for convenience
pub use api::{FanboxSession, Fetcher};
pub use config::{Config, Listing};
pub use download::{Downloader, PollReport, Poller};
pub use error::{Error, Result};
pub use media::{Attachment, DownloadTarget};
