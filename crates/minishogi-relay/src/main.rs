//! CLI entry point for the mini-shogi relay server.
//!
//! Reads the listening port from `PORT` (default 3001), binds on all
//! interfaces, and runs the accept loop until the process is terminated.
//! Log verbosity is controlled through `RUST_LOG`.

use minishogi_relay::{RelayServerBuilder, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let server = RelayServerBuilder::new()
        .bind(&config.bind_addr())
        .build()
        .await?;

    tracing::info!(addr = %server.local_addr()?, "listening");
    server.run().await?;
    Ok(())
}
