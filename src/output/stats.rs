//! Statistics reporting.

use console::style;

use crate::download::{PollReport, RunStats};

/// Print a one-line summary of a poll.
pub fn print_poll_summary(report: &PollReport) {
    println!(
        "Poll: {} page(s), {} new file(s) queued, {} already present ({})",
        style(report.pages_visited).cyan(),
        style(report.dispatched).green(),
        style(report.already_present).yellow(),
        report.stop
    );
}

/// Print totals across every poll of the process.
pub fn print_run_stats(stats: &RunStats) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Session Statistics:").bold());
    println!("  Polls:          {}", stats.polls);
    if stats.failed_polls > 0 {
        println!("  Failed polls:   {}", style(stats.failed_polls).red());
    }
    println!("  Pages scanned:  {}", stats.pages_visited);
    println!("  Files queued:   {}", stats.dispatched);
    println!("  Already there:  {}", stats.already_present);
    println!("{}", style("═".repeat(50)).dim());
}
