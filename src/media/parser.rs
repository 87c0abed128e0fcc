//! Attachment selection for posts.

use std::collections::HashSet;

use crate::api::types::{Item, ItemBody};
use crate::media::item::{Attachment, ItemMedia};

/// Collect the attachments to download for a post.
///
/// Image sets yield every original-resolution image. File sets yield only
/// files whose extension passes `allow_extension`. Returns `None` for
/// articles, unknown bodies and posts with nothing left to download.
pub fn parse_item_media<F>(item: &Item, allow_extension: F) -> Option<ItemMedia>
where
    F: Fn(&str) -> bool,
{
    let (urls, caption): (Vec<&str>, &str) = match &item.body {
        ItemBody::Image(body) => (
            body.images
                .iter()
                .map(|image| image.original_url.as_str())
                .collect(),
            body.text.as_str(),
        ),
        ItemBody::File(body) => (
            body.files
                .iter()
                .filter(|file| allow_extension(&file.extension))
                .map(|file| file.url.as_str())
                .collect(),
            body.text.as_str(),
        ),
        ItemBody::Article(_) | ItemBody::Unknown => return None,
    };

    let mut seen = HashSet::new();
    let attachments: Vec<Attachment> = urls
        .into_iter()
        .filter_map(|url| {
            let attachment = Attachment::from_url(url);
            if attachment.is_none() {
                tracing::warn!(item = %item.id, url, "Skipping attachment without a filename");
            }
            attachment
        })
        // Two attachments with the same name would race for one path
        .filter(|attachment| seen.insert(attachment.filename.clone()))
        .collect();

    if attachments.is_empty() {
        return None;
    }

    Some(ItemMedia {
        attachments,
        caption: caption.to_string(),
    })
}
