//! Listing selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which post listing the poller walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Listing {
    /// Posts from creators the user supports (default).
    #[default]
    Supporting,
    /// Home feed: posts from every followed creator.
    Home,
}

impl Listing {
    /// Path and query of the first page, relative to the API base.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Listing::Supporting => "/post.listSupporting?limit=10",
            Listing::Home => "/post.listHome?limit=10",
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listing::Supporting => write!(f, "supporting"),
            Listing::Home => write!(f, "home"),
        }
    }
}

impl FromStr for Listing {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "supporting" => Ok(Listing::Supporting),
            "home" => Ok(Listing::Home),
            _ => Err(format!("Unknown listing: {}", s)),
        }
    }
}
