//! Console output utilities.

use console::style;

use crate::config::Config;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     FANBOX Poller                                     ║
║     Keeps a local mirror of supported creators        ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary. The session id is never shown.
pub fn print_config_summary(config: &Config) {
    let options = &config.options;

    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Listing:        {}", options.listing);
    println!("  Directory:      {}", options.dest_dir.display());
    println!("  Max parallel:   {}", options.max_parallel);
    println!("  Max retries:    {}", options.max_retries);
    println!("  Pages per poll: {}", options.max_page_behind);
    println!("  Poll every:     {}s", options.poll_frequency_seconds);
    println!("  File types:     {}", options.allow_file_exts.join(", "));
    println!();
}
