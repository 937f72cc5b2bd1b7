use certwatch::logging::init_logging;
use certwatch::metrics::prom::push_run_totals;
use certwatch::notify::slack::SlackNotifier;
use certwatch::{report, run, Dispatcher, Evaluator, OpensslSource, Settings, SiteConfig, SystemClock};
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, warn};

#[derive(Parser)]
#[command(author, about, long_about = None)]
struct Cli {
    /// Enable console logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Settings::load().and_then(Settings::resolve) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("certwatch: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(config.log_level, config.log_file.as_deref(), cli.verbose) {
        init_logging(config.log_level, None, true).ok();
        warn!("could not open log file, logging to console: {}", e);
    }

    let sites = match SiteConfig::from_file(&config.sites_file) {
        Ok(sites) => sites,
        Err(e) => {
            error!("failed to load {}: {}", config.sites_file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let notifier = match SlackNotifier::new(&config.slack_api_url, &config.slack_token, config.timeout) {
        Ok(notifier) => notifier,
        Err(e) => {
            error!("failed to create Slack client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let source = match OpensslSource::new(config.timeout) {
        Ok(source) => source,
        Err(e) => {
            error!("failed to set up TLS: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let evaluator = Evaluator::new(config.threshold, &source, &SystemClock);
    let dispatcher = Dispatcher::new(
        &notifier,
        &config.channel_id,
        config.threshold,
        &config.confluence_page,
    );

    let summary = run(&sites, &evaluator, &dispatcher);

    if let Some(address) = &config.prometheus_address {
        if let Err(e) = push_run_totals(&summary, address) {
            warn!("failed to push metrics to prometheus: {}", e);
        }
    }

    if cli.verbose {
        println!("{}", report::render(&summary, config.threshold));
    }

    ExitCode::SUCCESS
}
