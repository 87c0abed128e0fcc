//! FANBOX Poller - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use fanbox_poller::{
    api::{FanboxSession, Fetcher},
    cli::Args,
    config::{validate_config, Config},
    download::{Downloader, Poller, RunStats},
    error::{exit_codes, Error, Result},
    fs::TempNamer,
    output::{
        print_banner, print_config_summary, print_error, print_info, print_poll_summary,
        print_run_stats, print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::Api(_)
                | Error::FetchFailed { .. }
                | Error::Decode { .. }
                | Error::Page { .. } => ExitCode::from(exit_codes::API_ERROR as u8),
                Error::CreateDir { .. } | Error::Write { .. } => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        print_info(&format!(
            "No configuration file at {}, using defaults and environment",
            args.config.display()
        ));
        Config::default()
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;
    print_config_summary(&config);

    let session = Arc::new(FanboxSession::new(
        &config.account.session_id,
        config.options.max_retries,
    )?);
    let first_page_url = session.listing_url(config.options.listing);
    let fetcher: Arc<dyn Fetcher> = session;

    let downloader = Downloader::new(Arc::clone(&fetcher), &config, TempNamer::from_entropy());
    let poller = Poller::new(
        fetcher,
        downloader,
        first_page_url,
        config.options.max_page_behind,
    );

    let mut stats = RunStats::default();

    // The first poll sweeps every page and must succeed.
    let report = poller.poll(true).await?;
    print_poll_summary(&report);
    stats.add_poll(&report);

    if args.once {
        print_info("Waiting for downloads to finish...");
        poller.downloader().wait_idle().await?;
        print_run_stats(&stats);
        return Ok(());
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
        print_warning("Interrupted, no further polls will run");
    };

    poller
        .run_periodic(config.poll_frequency(), shutdown, &mut stats, print_poll_summary)
        .await;

    print_run_stats(&stats);
    Ok(())
}
