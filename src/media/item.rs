//! Attachment and download target types.

use std::path::{Path, PathBuf};

use crate::fs::naming::filename_from_url;

/// A single downloadable file referenced by a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    /// Last path segment of `url`; the on-disk name of the file.
    pub filename: String,
}

impl Attachment {
    /// Build an attachment, or `None` if no filename can be derived from `url`.
    pub fn from_url(url: &str) -> Option<Self> {
        let filename = filename_from_url(url)?;
        Some(Self {
            url: url.to_string(),
            filename,
        })
    }

    /// Resolve where this attachment lives inside an item directory.
    pub fn target(&self, dir: &Path) -> DownloadTarget {
        DownloadTarget {
            dir: dir.to_path_buf(),
            filename: self.filename.clone(),
            url: self.url.clone(),
        }
    }
}

/// Resolved (directory, filename, source URL) of one attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub dir: PathBuf,
    pub filename: String,
    pub url: String,
}

impl DownloadTarget {
    /// Final path of the file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }
}

/// Downloadable content of one post.
#[derive(Debug, Clone, Default)]
pub struct ItemMedia {
    pub attachments: Vec<Attachment>,
    /// Post text, written to the item's info file.
    pub caption: String,
}
