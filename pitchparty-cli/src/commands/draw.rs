//! Draw command - produce one bundle and print it as JSON.

use crate::error::CliError;
use crate::runner::{cancel_on_ctrl_c, CliRunner};

/// Pop a bundle (generating one if the cache is empty) and print it.
pub async fn run(runner: CliRunner) -> Result<(), CliError> {
    runner.log_startup("draw");
    let service = runner.create_service()?;

    let cancel = service.shutdown_token().child_token();
    cancel_on_ctrl_c(cancel.clone());

    let bundle = service.pop_or_generate(&cancel).await?;
    let json =
        serde_json::to_string_pretty(&bundle).map_err(|e| CliError::Output(e.to_string()))?;
    println!("{}", json);

    service.shutdown().await;
    Ok(())
}
