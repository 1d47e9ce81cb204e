use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::{error, info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};
use website_monitoring::{
    CheckSpec, USER_AGENT,
    config::{ResolvedConfig, read_config_file, read_watchlist_file},
    notify::{
        heartbeat::HeartbeatFile,
        mailgun::{MailgunNotifier, NotificationRequest, Notifier},
        policy::{Decision, NotifyPolicy, decide},
    },
    report::{ReportWriter, RunReport},
    run_all,
};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Settings file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Watchlist file
    #[arg(long, default_value = "watchlist.json")]
    watchlist: PathBuf,
}

fn init() {
    dotenv::dotenv().ok();

    let filter = filter::Targets::new().with_targets(vec![
        ("website_monitoring", LevelFilter::TRACE),
        ("vedetta", LevelFilter::TRACE),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let started_at = Utc::now();
    let started = Instant::now();
    info!("Work started: {}", started_at.format("%Y/%m/%d %H:%M:%S"));

    let (config, watchlist) = match load_inputs(&args) {
        Ok(inputs) => inputs,
        Err(e) => {
            error!(
                "Ensure the following files are present and valid JSON:\nSettings: {}\nWatchlist: {}",
                args.config.display(),
                args.watchlist.display()
            );
            return Err(e);
        }
    };

    let client = build_client(&config)?;

    let outcomes = run_all(&client, watchlist).await;
    let report = RunReport::new(outcomes, started.elapsed());

    let writer = ReportWriter::new(&config.report_log, &config.history_log);
    if let Err(e) = writer.write(&report, started_at) {
        error!("could not write report files: {e:#}");
    }

    info!("{}", report.summary());

    dispatch_notification(&config, &report).await;

    Ok(())
}

fn load_inputs(args: &Args) -> anyhow::Result<(ResolvedConfig, Vec<CheckSpec>)> {
    let config = read_config_file(&args.config)?.resolve();
    let watchlist = read_watchlist_file(&args.watchlist)?;
    Ok((config, watchlist))
}

fn build_client(config: &ResolvedConfig) -> anyhow::Result<reqwest::Client> {
    let redirects = if config.allow_redirects {
        reqwest::redirect::Policy::limited(10)
    } else {
        reqwest::redirect::Policy::none()
    };

    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.request_timeout)
        .redirect(redirects)
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .build()
        .context("failed to build the HTTP client")
}

async fn dispatch_notification(config: &ResolvedConfig, report: &RunReport) {
    let policy = NotifyPolicy {
        enabled: config.mailgun.is_some(),
        heartbeat_every: config.heartbeat_every,
    };

    let heartbeat = HeartbeatFile::new(&config.heartbeat_file);
    let (decision, updated) = decide(report, &policy, heartbeat.load(), Utc::now());

    let Some(mailgun) = &config.mailgun else {
        return;
    };

    match decision {
        Decision::None => return,
        Decision::Alert => info!("E-mailing error report to {}", mailgun.recipient),
        Decision::Heartbeat => {
            info!("It's been a while, {}", mailgun.recipient);
            if let Some(at) = updated
                && let Err(e) = heartbeat.record(at)
            {
                error!("could not persist the heartbeat timestamp: {e:#}");
            }
        }
    }

    if let Some(request) = NotificationRequest::compose(decision, &mailgun.recipient, report) {
        MailgunNotifier::new(mailgun.clone()).send(&request).await;
    }
}
