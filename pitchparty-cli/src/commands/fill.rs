//! Fill command - generate bundles into the cache on demand.

use crate::error::CliError;
use crate::runner::{cancel_on_ctrl_c, CliRunner};

/// Run `count` manual fills, then print the cache status.
pub async fn run(runner: CliRunner, count: usize) -> Result<(), CliError> {
    runner.log_startup("fill");
    let service = runner.create_service()?;

    let cancel = service.shutdown_token().child_token();
    cancel_on_ctrl_c(cancel.clone());

    for n in 1..=count {
        let bundle = service.manual_fill(&cancel).await?;
        println!(
            "[{}/{}] {} - \"{}\"",
            n,
            count,
            bundle.business_name(),
            bundle.slogan()
        );
    }

    println!("Cache: {}", service.cache_status());
    service.shutdown().await;
    Ok(())
}
