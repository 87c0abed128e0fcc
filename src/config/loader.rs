//! Configuration structures and loading logic.

use crate::config::modes::Listing;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Account credentials configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Value of the `FANBOXSESSID` cookie.
    #[serde(default)]
    pub session_id: String,
}

/// Polling and download options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Root directory for downloads.
    #[serde(default = "default_dest_dir")]
    pub dest_dir: PathBuf,

    /// Maximum concurrent attachment downloads.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,

    /// Retries per request after the first attempt. 0 disables retrying.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Pages to look back per poll.
    #[serde(default = "default_max_page_behind")]
    pub max_page_behind: usize,

    /// Seconds between polls.
    #[serde(default = "default_poll_frequency")]
    pub poll_frequency_seconds: u64,

    /// Non-image file extensions to download, without the leading dot.
    #[serde(default = "default_allow_file_exts")]
    pub allow_file_exts: Vec<String>,

    /// Listing to walk.
    #[serde(default)]
    pub listing: Listing,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            dest_dir: default_dest_dir(),
            max_parallel: default_max_parallel(),
            max_retries: default_max_retries(),
            max_page_behind: default_max_page_behind(),
            poll_frequency_seconds: default_poll_frequency(),
            allow_file_exts: default_allow_file_exts(),
            listing: Listing::default(),
        }
    }
}

fn default_dest_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_parallel() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_max_retries() -> u32 {
    4
}

fn default_max_page_behind() -> usize {
    2
}

fn default_poll_frequency() -> u64 {
    300
}

fn default_allow_file_exts() -> Vec<String> {
    vec!["gif".to_string(), "mp4".to_string()]
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Interval between polls.
    pub fn poll_frequency(&self) -> Duration {
        Duration::from_secs(self.options.poll_frequency_seconds)
    }
}

impl OptionsConfig {
    /// Whether a file extension is on the allow-list.
    ///
    /// Case-insensitive; a leading dot on either side is ignored.
    pub fn allows_extension(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.');
        self.allow_file_exts
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

/// Split a comma separated list, trimming whitespace and dropping empty words.
pub fn parse_comma_words(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}
