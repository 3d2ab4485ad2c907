//! Run command - keep the prefetch cache warm until interrupted.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the run command.
pub struct RunArgs {
    /// Seconds between cache status reports
    pub status_interval: u64,
    /// Skip the background preloader regardless of configuration
    pub no_preload: bool,
}

/// Run the service until Ctrl-C, reporting cache status periodically.
pub async fn run(runner: CliRunner, args: RunArgs) -> Result<(), CliError> {
    runner.log_startup("run");
    let service = runner.create_service()?;

    let started = !args.no_preload && service.start_preloader_if_enabled();
    let status = service.cache_status();
    println!("PitchParty v{}", pitchparty::VERSION);
    println!(
        "Cache: capacity {}, preloader {}",
        status.capacity,
        if started { "started" } else { "off" }
    );
    println!("Press Ctrl-C to stop.");

    let mut ticker = tokio::time::interval(Duration::from_secs(args.status_interval.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for Ctrl-C, shutting down");
                }
                break;
            }

            _ = ticker.tick() => {
                let status = service.cache_status();
                info!(
                    size = status.size,
                    capacity = status.capacity,
                    loaded = status.loaded,
                    preloader_running = status.preloader_running,
                    "Cache status"
                );
            }
        }
    }

    println!("Shutting down...");
    service.shutdown().await;
    println!("Stopped with {}", service.cache_status());
    Ok(())
}
