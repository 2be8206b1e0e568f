//! Brailink daemon
//!
//! Brings up a CombiBraille display on a serial port and runs the
//! single-threaded poll loop: blink alarms, key input and refresh all
//! happen on this thread. Once the display is up, SIGINT or SIGTERM blank
//! it and exit.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use tracing_subscriber::EnvFilter;

use brailink_core::blink::BlinkAspect;
use brailink_core::traits::BrailleDriver;
use brailink_drivers::CombiBraille;
use brailink_hal_posix::{AlarmQueue, PosixOpener, SystemClock};

mod config;
mod session;

use config::DaemonConfig;
use session::Session;

#[derive(Debug, Parser)]
#[command(name = "brailinkd", version, about = "Serial braille display daemon")]
struct Args {
    /// Configuration file (defaults to the built-in configuration)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial device, overriding the configuration
    #[arg(short, long)]
    device: Option<String>,

    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = DaemonConfig::load(args.config.as_deref())?;
    if let Some(device) = args.device {
        config.device = device;
    }

    let mut clock = SystemClock::new();
    let driver = CombiBraille::initialize(
        &mut PosixOpener,
        &mut clock,
        &config.device,
        config.driver.clone(),
        config.command_table(),
    )
    .map_err(|e| anyhow::anyhow!("no display available on {}: {e}", config.device))?;

    // SIGINT and SIGTERM keep their default action until the display answers
    let terminate = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&terminate))
            .context("cannot install signal handler")?;
    }

    tracing::info!(
        model = driver.identify(),
        columns = driver.geometry().columns,
        "display ready"
    );

    let mut alarms: AlarmQueue<BlinkAspect, SystemClock> = AlarmQueue::new(clock);
    let mut session = Session::new(driver, config.blink, config.driver.offsets, &mut alarms);
    let poll = u64::from(config.driver.poll_interval_ms.max(1));

    while !terminate.load(Ordering::Relaxed) {
        while let Some(aspect) = alarms.pop_expired() {
            session.on_alarm(aspect, &mut alarms);
        }

        session.poll_input(&mut alarms);

        if let Err(e) = session.refresh() {
            tracing::error!(error = %e, "refresh failed");
        }

        let wait = alarms.time_to_next().map_or(poll, |t| t.min(poll));
        std::thread::sleep(Duration::from_millis(wait));
    }

    tracing::info!("shutting down");
    session.into_driver().shutdown();
    Ok(())
}
