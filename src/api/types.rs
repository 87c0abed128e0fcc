//! API response type definitions.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use url::Url;

use crate::api::client::ORIGIN_URL;

/// Generic API response wrapper.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub body: T,
}

/// One page of a post listing, newest first.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub next_url: Option<String>,
}

impl Page {
    /// Cursor URL of the next (older) page, if there is one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Post author.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon_url: Option<String>,
}

/// A post from a listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawItem")]
pub struct Item {
    pub id: String,
    pub title: String,
    /// Type tag as sent by the API (`article`, `image`, `file`, ...).
    pub kind: String,
    pub creator_id: String,
    pub published_datetime: DateTime<FixedOffset>,
    pub updated_datetime: Option<DateTime<FixedOffset>>,
    pub cover_image_url: Option<String>,
    pub fee_required: u32,
    pub excerpt: String,
    pub is_liked: bool,
    pub like_count: u64,
    pub comment_count: u64,
    pub has_adult_content: bool,
    pub status: String,
    pub user: User,
    pub body: ItemBody,
}

impl Item {
    /// Direct link to the post on the website.
    pub fn url(&self) -> String {
        match Url::parse(ORIGIN_URL) {
            Ok(mut url) => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments
                        .clear()
                        .push(&format!("@{}", self.creator_id))
                        .push("posts")
                        .push(&self.id);
                }
                url.to_string()
            }
            Err(_) => format!("{}/@{}/posts/{}", ORIGIN_URL, self.creator_id, self.id),
        }
    }

    /// Publish date in the post's own offset, formatted `YYYY-MM-DD`.
    pub fn published_date(&self) -> String {
        self.published_datetime.format("%Y-%m-%d").to_string()
    }
}

/// Attachment body of a post. Exactly one variant is active per item.
#[derive(Debug, Clone, Default)]
pub enum ItemBody {
    Article(ArticleBody),
    Image(ImageBody),
    File(FileBody),
    /// Unrecognised type tag, or a body the viewer has no access to.
    #[default]
    Unknown,
}

impl ItemBody {
    /// Select the body variant by the item's type tag.
    ///
    /// Unknown tags and `null` bodies never fail; they decode to `Unknown` so
    /// that new post types added to the API don't break the listing.
    fn from_tagged(
        kind: &str,
        body: Option<serde_json::Value>,
    ) -> std::result::Result<Self, serde_json::Error> {
        let Some(body) = body.filter(|b| !b.is_null()) else {
            tracing::debug!(kind, "Item has no accessible body");
            return Ok(ItemBody::Unknown);
        };

        let parsed = match kind {
            "article" => ItemBody::Article(serde_json::from_value(body)?),
            "image" => ItemBody::Image(serde_json::from_value(body)?),
            "file" => ItemBody::File(serde_json::from_value(body)?),
            other => {
                tracing::warn!(kind = other, "Unknown item type");
                ItemBody::Unknown
            }
        };

        Ok(parsed)
    }
}

/// Image set body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageBody {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// File set body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileBody {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub files: Vec<PostFile>,
}

/// A file attached to a file-set post.
#[derive(Debug, Clone, Deserialize)]
pub struct PostFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub extension: String,
    #[serde(default)]
    pub size: u64,
    pub url: String,
}

/// Article body. Articles carry no downloadable files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleBody {
    #[serde(default)]
    pub blocks: Vec<ArticleBlock>,
    #[serde(default)]
    pub image_map: HashMap<String, Image>,
}

/// A paragraph or image block in an article.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image_id: Option<String>,
}

/// Image reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    #[serde(default)]
    pub extension: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    pub original_url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Wire shape of an item before the body is resolved.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    creator_id: String,
    published_datetime: DateTime<FixedOffset>,
    #[serde(default)]
    updated_datetime: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    cover_image_url: Option<String>,
    #[serde(default)]
    fee_required: u32,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    is_liked: bool,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    comment_count: u64,
    #[serde(default)]
    has_adult_content: bool,
    #[serde(default)]
    status: String,
    #[serde(default)]
    user: User,
    #[serde(default)]
    body: Option<serde_json::Value>,
}

impl TryFrom<RawItem> for Item {
    type Error = serde_json::Error;

    fn try_from(raw: RawItem) -> std::result::Result<Self, Self::Error> {
        let body = ItemBody::from_tagged(&raw.kind, raw.body)?;

        Ok(Item {
            id: raw.id,
            title: raw.title,
            kind: raw.kind,
            creator_id: raw.creator_id,
            published_datetime: raw.published_datetime,
            updated_datetime: raw.updated_datetime,
            cover_image_url: raw.cover_image_url,
            fee_required: raw.fee_required,
            excerpt: raw.excerpt,
            is_liked: raw.is_liked,
            like_count: raw.like_count,
            comment_count: raw.comment_count,
            has_adult_content: raw.has_adult_content,
            status: raw.status,
            user: raw.user,
            body,
        })
    }
}
