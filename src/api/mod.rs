//! FANBOX API module.
//!
//! This module provides:
//! - Cookie-authenticated HTTP client with bounded retries
//! - The `Fetcher` seam used by the poller and download tasks
//! - API response types

pub mod client;
pub mod types;

pub use client::{BodyReader, FanboxSession, Fetcher, API_BASE, ORIGIN_URL};
pub use types::*;
