//! Path and directory management.

use std::path::{Path, PathBuf};

use crate::api::Item;
use crate::error::{Error, Result};
use crate::fs::naming::sanitize_path_component;

/// Name of the per-item text file holding the post link and caption.
pub const INFO_FILENAME: &str = "info";

/// Directory for an item: `<root>/<creator>/<YYYY-MM-DD>: <title>`.
pub fn item_directory(dest_root: &Path, item: &Item) -> PathBuf {
    dest_root
        .join(sanitize_path_component(&item.creator_id))
        .join(format!(
            "{}: {}",
            item.published_date(),
            sanitize_path_component(&item.title)
        ))
}

/// Ensure a directory exists, creating it and its parents if necessary.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| Error::CreateDir {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ItemBody;
    use chrono::DateTime;
    use tempfile::TempDir;

    fn item(creator_id: &str, title: &str) -> Item {
        Item {
            id: "1".into(),
            title: title.into(),
            kind: "image".into(),
            creator_id: creator_id.into(),
            published_datetime: DateTime::parse_from_rfc3339("2021-05-06T07:08:09+09:00")
                .unwrap(),
            updated_datetime: None,
            cover_image_url: None,
            fee_required: 0,
            excerpt: String::new(),
            is_liked: false,
            like_count: 0,
            comment_count: 0,
            has_adult_content: false,
            status: "published".into(),
            user: Default::default(),
            body: ItemBody::Unknown,
        }
    }

    #[test]
    fn test_item_directory_layout() {
        let path = item_directory(Path::new("/downloads"), &item("alice", "Sketches"));
        assert_eq!(path, PathBuf::from("/downloads/alice/2021-05-06: Sketches"));
    }

    #[test]
    fn test_item_directory_never_nests() {
        let root = Path::new("/downloads");
        let path = item_directory(root, &item("a/b", "x/y\0z"));

        assert_eq!(path.strip_prefix(root).unwrap().components().count(), 2);
        assert_eq!(
            path,
            PathBuf::from("/downloads/a\u{2215}b/2021-05-06: x\u{2215}yz")
        );
    }

    #[tokio::test]
    async fn test_ensure_dir_reports_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"").unwrap();

        let err = ensure_dir(&blocker.join("child")).await.unwrap_err();
        assert!(matches!(err, Error::CreateDir { .. }));

        ensure_dir(&dir.path().join("a").join("b")).await.unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
    }
}
