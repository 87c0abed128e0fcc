//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{parse_comma_words, Config, Listing};

/// FANBOX polling downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "fanbox-poller",
    version,
    about = "Poll pixiv FANBOX and download new posts from supported creators",
    long_about = "Periodically walks the FANBOX post listing and downloads images and \
                  allowed files into <dest>/<creator>/<date: title>/.\n\n\
                  Files already on disk are never fetched again, so the poller can be \
                  restarted at any time."
)]
pub struct Args {
    /// Value of the FANBOXSESSID cookie.
    #[arg(short, long, env = "FANBOX_SESSION_ID", hide_env_values = true)]
    pub session_id: Option<String>,

    /// Root directory for downloads.
    #[arg(short = 'd', long, env = "FANBOX_DEST_DIR")]
    pub dest_dir: Option<PathBuf>,

    /// Maximum concurrent downloads.
    #[arg(short = 'p', long, env = "FANBOX_MAX_PARALLEL")]
    pub max_parallel: Option<usize>,

    /// Retries per request after the first attempt.
    #[arg(short = 'r', long, env = "FANBOX_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Pages to look back on each poll.
    #[arg(long, env = "FANBOX_MAX_PAGE_BEHIND")]
    pub max_page_behind: Option<usize>,

    /// Seconds between polls.
    #[arg(long = "poll-frequency", env = "FANBOX_POLL_FREQUENCY")]
    pub poll_frequency_seconds: Option<u64>,

    /// Comma separated non-image extensions to download (e.g. "gif,mp4").
    #[arg(long, env = "FANBOX_ALLOW_FILE_EXTS")]
    pub allow_file_exts: Option<String>,

    /// Listing to walk.
    #[arg(long, value_enum)]
    pub listing: Option<ListingArg>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "fanbox.toml")]
    pub config: PathBuf,

    /// Run a single full poll, wait for downloads and exit.
    #[arg(long)]
    pub once: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI listing argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListingArg {
    /// Posts from supported creators.
    Supporting,
    /// Home feed.
    Home,
}

impl From<ListingArg> for Listing {
    fn from(arg: ListingArg) -> Self {
        match arg {
            ListingArg::Supporting => Listing::Supporting,
            ListingArg::Home => Listing::Home,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(session_id) = &self.session_id {
            config.account.session_id = session_id.trim().to_string();
        }

        if let Some(dir) = &self.dest_dir {
            config.options.dest_dir = dir.clone();
        }

        if let Some(max_parallel) = self.max_parallel {
            config.options.max_parallel = max_parallel;
        }

        if let Some(max_retries) = self.max_retries {
            config.options.max_retries = max_retries;
        }

        if let Some(max_page_behind) = self.max_page_behind {
            config.options.max_page_behind = max_page_behind;
        }

        if let Some(seconds) = self.poll_frequency_seconds {
            config.options.poll_frequency_seconds = seconds;
        }

        if let Some(exts) = &self.allow_file_exts {
            config.options.allow_file_exts = parse_comma_words(exts);
        }

        if let Some(listing) = self.listing {
            config.options.listing = listing.into();
        }
    }
}
