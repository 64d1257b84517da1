//! Server configuration from the environment.

/// Port used when `PORT` is unset or unparseable.
pub const DEFAULT_PORT: u16 = 3001;

/// Listener configuration, sourced from the process environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// TCP port to listen on, from `PORT`.
    pub port: u16,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            port: parse_port(std::env::var("PORT").ok()),
        }
    }

    /// The address the relay binds: all interfaces on the configured port,
    /// so hosting platforms can route external traffic to it.
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

fn parse_port(raw: Option<String>) -> u16 {
    match raw {
        None => DEFAULT_PORT,
        Some(raw) => match raw.parse() {
            Ok(port) => port,
            Err(_) => {
                tracing::warn!(%raw, "PORT is not a valid port number, using default");
                DEFAULT_PORT
            }
        },
    }
}
