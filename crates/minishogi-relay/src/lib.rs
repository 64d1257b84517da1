//! # Mini-shogi relay
//!
//! A real-time relay server for a two-player mini-shogi game. Two WebSocket
//! clients pair up in a room; each move one of them sends is forwarded to
//! the other verbatim. The server never validates board state or move
//! legality; it is a blind state-forwarding mediator, and the room is torn
//! down the moment either player disconnects.
//!
//! The workspace is layered bottom-up:
//!
//! ```text
//! minishogi-transport (sockets, frames, health probe)
//!         ↓
//! minishogi-protocol  (wire messages, codec)
//!         ↓
//! minishogi-room      (room snapshot, registry)
//!         ↓
//! minishogi-relay     (server loop, per-connection router)  ← you are here
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use minishogi_relay::{RelayServerBuilder, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::from_env();
//!     let server = RelayServerBuilder::new()
//!         .bind(&config.bind_addr())
//!         .build()
//!         .await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{DEFAULT_PORT, ServerConfig};
pub use error::RelayError;
pub use server::{HEALTH_BODY, RelayServer, RelayServerBuilder};
