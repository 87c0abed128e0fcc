//! Media module: which files of a post get downloaded, and where.

pub mod item;
pub mod parser;

pub use item::{Attachment, DownloadTarget, ItemMedia};
pub use parser::parse_item_media;
