//! Write-to-temp-then-rename file writes.
//!
//! A file at its final path is always complete: content is streamed into a
//! hidden sibling and renamed into place only after it has been fully
//! written and flushed. The presence of a file is what marks an attachment as
//! downloaded, so a partial file must never appear under the real name.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::error::{Error, Result};

/// Prefix of in-progress temp files.
pub const TEMP_PREFIX: &str = ".tmp.";

/// Generates temp file names from the clock and an owned random source.
pub struct TempNamer {
    rng: Mutex<StdRng>,
}

impl TempNamer {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Namer seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// `.tmp.` + base64url(8 bytes of nanoseconds, 4 random bytes).
    pub fn next_name(&self) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();

        let random: u32 = match self.rng.lock() {
            Ok(mut rng) => rng.gen(),
            Err(poisoned) => poisoned.into_inner().gen(),
        };

        let mut buf = [0u8; 12];
        buf[..8].copy_from_slice(&nanos.to_le_bytes());
        buf[8..].copy_from_slice(&random.to_le_bytes());

        format!("{}{}", TEMP_PREFIX, URL_SAFE_NO_PAD.encode(buf))
    }

    fn temp_path_for(&self, dst: &Path) -> PathBuf {
        let dir = dst.parent().unwrap_or_else(|| Path::new("."));
        dir.join(self.next_name())
    }
}

/// Stream `source` into `dst` atomically. Returns the number of bytes written.
///
/// On failure the temp file is removed and any existing `dst` is untouched.
pub async fn write_atomic<R>(dst: &Path, source: &mut R, namer: &TempNamer) -> Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let tmp = namer.temp_path_for(dst);

    let mut file = File::create(&tmp).await.map_err(|source| Error::Write {
        path: tmp.clone(),
        source,
    })?;

    let copied = match copy_to_file(&mut file, source).await {
        Ok(copied) => copied,
        Err(source) => {
            drop(file);
            remove_temp(&tmp).await;
            return Err(Error::Write {
                path: dst.to_path_buf(),
                source,
            });
        }
    };
    drop(file);

    if let Err(source) = fs::rename(&tmp, dst).await {
        remove_temp(&tmp).await;
        return Err(Error::Write {
            path: dst.to_path_buf(),
            source,
        });
    }

    Ok(copied)
}

/// Write a text file unless one already exists at `dst`.
///
/// Returns `false` when the file was already present.
pub async fn write_text_once(dst: &Path, text: &str, namer: &TempNamer) -> Result<bool> {
    if file_exists(dst).await {
        return Ok(false);
    }

    let mut reader = text.as_bytes();
    write_atomic(dst, &mut reader, namer).await?;
    Ok(true)
}

/// Whether anything exists at `path`.
pub async fn file_exists(path: &Path) -> bool {
    fs::metadata(path).await.is_ok()
}

async fn copy_to_file<R>(file: &mut File, source: &mut R) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let copied = tokio::io::copy(source, file).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(copied)
}

async fn remove_temp(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp).await {
        tracing::warn!(path = %tmp.display(), error = %e, "Failed to remove temp file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tempfile::TempDir;
    use tokio::io::ReadBuf;

    /// Yields some bytes, then fails like a dropped connection.
    struct FailingReader {
        sent: bool,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.sent {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset",
                )));
            }
            self.sent = true;
            buf.put_slice(b"partial");
            Poll::Ready(Ok(()))
        }
    }

    fn namer() -> TempNamer {
        TempNamer::new(StdRng::seed_from_u64(7))
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_temp_name_shape() {
        let namer = namer();
        let a = namer.next_name();
        let b = namer.next_name();

        assert!(a.starts_with(TEMP_PREFIX));
        // 12 bytes -> 16 unpadded base64 characters
        assert_eq!(a.len(), TEMP_PREFIX.len() + 16);
        assert!(a[TEMP_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_write_atomic_commits_file() {
        let dir = TempDir::new().unwrap();
        let dst = dir.path().join("image.png");

        let mut source: &[u8] = b"image-bytes";
        let written = write_atomic(&dst, &mut source, &namer()).await.unwrap();

        assert_eq!(written, 11);
        assert_eq!(std::fs::read(&dst).unwrap(), b"image-bytes");
        assert_eq!(dir_entries(dir.path()), vec!["image.png"]);
    }

    #[tokio::test]
    async fn test_failed_copy_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let dst = dir.path().join("clip.mp4");

        let mut source = FailingReader { sent: false };
        let result = write_atomic(&dst, &mut source, &namer()).await;

        assert!(result.is_err());
        assert!(!dst.exists());
        assert!(dir_entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_failed_copy_preserves_previous_content() {
        let dir = TempDir::new().unwrap();
        let dst = dir.path().join("clip.mp4");
        std::fs::write(&dst, b"complete").unwrap();

        let mut source = FailingReader { sent: false };
        assert!(write_atomic(&dst, &mut source, &namer()).await.is_err());

        assert_eq!(std::fs::read(&dst).unwrap(), b"complete");
        assert_eq!(dir_entries(dir.path()), vec!["clip.mp4"]);
    }

    #[tokio::test]
    async fn test_write_text_once_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let dst = dir.path().join("info");
        let namer = namer();

        assert!(write_text_once(&dst, "first", &namer).await.unwrap());
        assert!(!write_text_once(&dst, "second", &namer).await.unwrap());

        assert_eq!(std::fs::read_to_string(&dst).unwrap(), "first");
    }

    #[tokio::test]
    async fn test_missing_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let dst = dir.path().join("missing").join("a.png");

        let mut source: &[u8] = b"x";
        let err = write_atomic(&dst, &mut source, &namer()).await.unwrap_err();

        assert!(matches!(err, Error::Write { .. }));
    }
}
