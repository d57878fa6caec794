use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use orbis_core::{config::Config, Error};

#[tokio::main]
async fn main() -> Result<(), orbis_core::Error> {
    orbis_core::logging::init("orbis")?;

    let cfg = match Config::load() {
        Ok(cfg) => Arc::new(cfg),
        Err(e @ Error::ConfigMissing { .. }) => {
            eprintln!("{}", config_missing_message(&e));
            std::process::exit(1);
        }
        // Graceful: tell the operator and never start the session.
        Err(Error::CredentialMissing(reason)) => {
            eprintln!("error: {reason}.");
            eprintln!("please update the .env file with your bot's actual token.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("failed to listen for ctrl-c: {e}");
                return;
            }
            info!("ctrl-c received, stopping");
            shutdown.cancel();
        });
    }

    orbis_discord::router::run(cfg, shutdown)
        .await
        .map_err(|e| Error::External(format!("discord bot failed: {e}")))?;

    Ok(())
}

fn config_missing_message(e: &Error) -> String {
    format!("error: {e}. please create it or point ORBIS_CONFIG at an existing file.")
}
