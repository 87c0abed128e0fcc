//! Output module for console output.
//!
//! Provides:
//! - Colored console output
//! - Poll and session statistics

pub mod console;
pub mod stats;

pub use self::console::{print_banner, print_config_summary, print_error, print_info, print_warning};
pub use stats::{print_poll_summary, print_run_stats};
