//! Filesystem module.
//!
//! Provides:
//! - Path component sanitization
//! - Per-item directory layout
//! - Atomic write-then-rename file writes

pub mod atomic;
pub mod naming;
pub mod paths;

pub use atomic::{file_exists, write_atomic, write_text_once, TempNamer};
pub use naming::{filename_from_url, sanitize_path_component};
pub use paths::{ensure_dir, item_directory, INFO_FILENAME};
