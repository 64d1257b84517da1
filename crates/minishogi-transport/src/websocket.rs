//! WebSocket transport implementation using `tokio-tungstenite`.
//!
//! The relay and a hosting platform's health probe share one port: the
//! accept loop peeks each new TCP stream and either completes the WebSocket
//! handshake (game client) or writes a static `200 OK` and closes (plain
//! HTTP request).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use crate::{Connection, ConnectionId, Transport, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// How much of the request head to peek when telling probes from players.
/// Health probes fit their whole request well inside this.
const PEEK_LIMIT: usize = 2048;

type WsStream = WebSocketStream<TcpStream>;

/// A WebSocket-based [`Transport`] that listens for incoming connections
/// and answers plain HTTP requests with a health response.
pub struct WebSocketTransport {
    listener: TcpListener,
    health_body: String,
}

impl WebSocketTransport {
    /// Binds a new WebSocket transport to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr).await.map_err(TransportError::Bind)?;
        tracing::info!(addr, "WebSocket transport listening");
        Ok(Self {
            listener,
            health_body: "server running\n".to_owned(),
        })
    }

    /// Sets the body returned to plain HTTP requests (health probes).
    pub fn with_health_body(mut self, body: impl Into<String>) -> Self {
        self.health_body = body.into();
        self
    }

    /// Returns the local address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }
}

impl Transport for WebSocketTransport {
    type Connection = WebSocketConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        loop {
            let (mut stream, addr) = self
                .listener
                .accept()
                .await
                .map_err(TransportError::Accept)?;

            if !is_upgrade_request(&stream)
                .await
                .map_err(TransportError::Accept)?
            {
                // Not a game client. Answer the probe and keep accepting.
                if let Err(e) = serve_health(&mut stream, &self.health_body).await {
                    tracing::debug!(%addr, error = %e, "health response failed");
                }
                continue;
            }

            let ws = tokio_tungstenite::accept_async(stream)
                .await
                .map_err(TransportError::Handshake)?;

            let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
            tracing::debug!(%id, %addr, "accepted WebSocket connection");

            let (sink, stream) = ws.split();
            return Ok(WebSocketConnection {
                id,
                sink: Arc::new(Mutex::new(sink)),
                stream: Arc::new(Mutex::new(stream)),
            });
        }
    }
}

/// Peeks the request head without consuming it and looks for the WebSocket
/// upgrade header.
async fn is_upgrade_request(stream: &TcpStream) -> std::io::Result<bool> {
    let mut buf = [0u8; PEEK_LIMIT];
    let n = stream.peek(&mut buf).await?;
    let head = String::from_utf8_lossy(&buf[..n]).to_ascii_lowercase();
    Ok(head.contains("upgrade:") && head.contains("websocket"))
}

/// Answers a plain HTTP request with `200 OK` and closes the stream.
async fn serve_health(stream: &mut TcpStream, body: &str) -> std::io::Result<()> {
    // Consume the request before responding so the close isn't a reset.
    let mut buf = [0u8; PEEK_LIMIT];
    let _ = stream.read(&mut buf).await?;

    let response = format!(
        "HTTP/1.1 200 OK\r\n\
         content-type: text/plain; charset=utf-8\r\n\
         content-length: {}\r\n\
         connection: close\r\n\
         \r\n\
         {}",
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;
    stream.shutdown().await
}

/// A single WebSocket connection.
///
/// The socket is split into independently locked sink and stream halves, so
/// the writer task can send while the read loop sits in [`recv`]. Cloning is
/// cheap and shares both halves.
///
/// [`recv`]: Connection::recv
#[derive(Clone)]
pub struct WebSocketConnection {
    id: ConnectionId,
    sink: Arc<Mutex<SplitSink<WsStream, Message>>>,
    stream: Arc<Mutex<SplitStream<WsStream>>>,
}

impl Connection for WebSocketConnection {
    type Error = TransportError;

    async fn send(&self, text: &str) -> Result<(), Self::Error> {
        let msg = Message::Text(text.into());
        self.sink
            .lock()
            .await
            .send(msg)
            .await
            .map_err(TransportError::Send)
    }

    async fn recv(&self) -> Result<Option<String>, Self::Error> {
        loop {
            let msg = self.stream.lock().await.next().await;
            match msg {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_str().to_owned()));
                }
                Some(Ok(Message::Binary(data))) => {
                    // Some clients send JSON as binary frames; accept them
                    // as long as they hold valid UTF-8.
                    match String::from_utf8(data.to_vec()) {
                        Ok(text) => return Ok(Some(text)),
                        Err(_) => {
                            tracing::debug!(id = %self.id, "dropping non-UTF-8 binary frame");
                            continue;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong/frame
                Some(Err(e)) => return Err(TransportError::Receive(e)),
            }
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.sink
            .lock()
            .await
            .close()
            .await
            .map_err(TransportError::Send)
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
