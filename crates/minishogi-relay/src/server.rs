//! Relay server builder and accept loop.
//!
//! This is the entry point for running the relay. It ties the layers
//! together: transport → protocol → room, with one handler task per
//! accepted connection.

use std::sync::Arc;

use minishogi_protocol::{Codec, JsonCodec};
use minishogi_room::RoomRegistry;
use minishogi_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::RelayError;
use crate::handler::handle_connection;

/// Body served to plain HTTP health probes on the listening port.
pub const HEALTH_BODY: &str = "Mini Shogi Relay is running!";

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The registry
/// mutex is the single critical section that serializes every room
/// mutation; holding it never spans socket I/O because outbound delivery
/// goes through the seats' unbounded channels.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) rooms: Mutex<RoomRegistry>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a relay server.
pub struct RelayServerBuilder {
    bind_addr: String,
}

impl RelayServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the listener and assembles the server with the JSON codec.
    pub async fn build(self) -> Result<RelayServer<JsonCodec>, RelayError> {
        let transport = WebSocketTransport::bind(&self.bind_addr)
            .await?
            .with_health_body(HEALTH_BODY);

        let state = Arc::new(ServerState {
            rooms: Mutex::new(RoomRegistry::new()),
            codec: JsonCodec,
        });

        Ok(RelayServer { transport, state })
    }
}

impl Default for RelayServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running relay server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct RelayServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> RelayServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// A failed WebSocket handshake only skips that connection; the loop
    /// runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), RelayError> {
        tracing::info!("mini-shogi relay running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
