use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod alert;
mod config;
mod monitor;

use config::Config;
use monitor::{ConnectionManager, Credentials, MonitorError, ScanCriteria};

/// Watch an IMAP inbox and ring the terminal bell when an unread message
/// matches the configured filters.
#[derive(Parser)]
#[command(name = "mailwatch", version, about)]
struct Args {
    /// Path to the config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Account address (overrides the config file)
    #[arg(long)]
    email: Option<String>,

    /// App password (overrides the config file)
    #[arg(long)]
    password: Option<String>,

    /// Seconds between checks (overrides the config file)
    #[arg(long)]
    interval: Option<u64>,

    /// Only match messages received within this many minutes
    #[arg(long)]
    time_window: Option<u64>,

    /// Required substring of the From header
    #[arg(long)]
    sender_filter: Option<String>,

    /// Required substring of the message body
    #[arg(long)]
    keyword_filter: Option<String>,

    /// How many times to ring the bell on a match (overrides the config file)
    #[arg(long)]
    bell_repeat: Option<u32>,

    /// Verbose per-candidate logging
    #[arg(long)]
    debug: bool,

    /// Run a single check cycle and exit
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let (mut cfg, created, path) = Config::load_or_create(args.config.clone())?;
    if created {
        info!(path = %path.display(), "wrote a default config file");
    }

    apply_overrides(&mut cfg, &args);

    if !cfg.is_configured() {
        anyhow::bail!(
            "no account configured; set email and password in {} or pass --email/--password",
            path.display()
        );
    }

    let creds = Credentials {
        email: cfg.account.email.clone(),
        password: cfg.account.password.clone(),
        host: cfg.account.host.clone(),
        port: cfg.account.port,
    };
    let criteria = ScanCriteria {
        time_window: Duration::from_secs(cfg.monitor.time_window_minutes * 60),
        sender_filter: cfg.monitor.sender_filter.trim().to_string(),
        keyword_filter: cfg.monitor.keyword_filter.trim().to_string(),
    };
    let interval = Duration::from_secs(cfg.monitor.check_interval_secs);

    info!(
        email = %creds.email,
        interval_secs = interval.as_secs(),
        window_minutes = cfg.monitor.time_window_minutes,
        sender_filter = %criteria.sender_filter,
        keyword_filter = %criteria.keyword_filter,
        "starting mailbox watch"
    );

    let mut manager = ConnectionManager::new();
    loop {
        let outcome = run_cycle(&mut manager, &creds, &criteria);
        let wait = next_wait(&outcome, interval);
        match outcome {
            Ok(true) => {
                alert::ring_bell(cfg.alert.bell_repeat);
                if args.once {
                    return Ok(());
                }
            }
            Ok(false) => {
                if args.once {
                    info!("no matching unread message");
                    return Ok(());
                }
            }
            Err(err) => {
                error!(error = %err, "check cycle failed, retrying shortly");
                if args.once {
                    return Err(err.into());
                }
            }
        }
        thread::sleep(wait);
    }
}

/// A failed cycle retries after a short pause instead of waiting out the
/// whole check interval.
const ERROR_RETRY: Duration = Duration::from_secs(10);

fn next_wait(outcome: &Result<bool, MonitorError>, interval: Duration) -> Duration {
    match outcome {
        Ok(_) => interval,
        Err(_) => ERROR_RETRY,
    }
}

/// One connect-scan-disconnect cycle. The session never outlives the
/// cycle, so a dropped connection only costs the cycle it happened in.
fn run_cycle(
    manager: &mut ConnectionManager,
    creds: &Credentials,
    criteria: &ScanCriteria,
) -> std::result::Result<bool, MonitorError> {
    let mailbox = manager.connect(creds)?;
    let result = monitor::scan(mailbox, criteria);
    manager.disconnect();
    result
}

fn apply_overrides(cfg: &mut Config, args: &Args) {
    if let Some(email) = &args.email {
        cfg.account.email = email.clone();
    }
    if let Some(password) = &args.password {
        cfg.account.password = password.clone();
    }
    if let Some(interval) = args.interval {
        cfg.monitor.check_interval_secs = interval;
    }
    if let Some(window) = args.time_window {
        cfg.monitor.time_window_minutes = window;
    }
    if let Some(sender) = &args.sender_filter {
        cfg.monitor.sender_filter = sender.clone();
    }
    if let Some(keyword) = &args.keyword_filter {
        cfg.monitor.keyword_filter = keyword.clone();
    }
    if let Some(repeat) = args.bell_repeat {
        cfg.alert.bell_repeat = repeat;
    }
}
