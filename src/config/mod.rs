//! Configuration module for the fanbox-poller.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - CLI argument and environment merging
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{parse_comma_words, AccountConfig, Config, OptionsConfig};
pub use modes::Listing;
pub use validation::validate_config;
