//! Top-level error type for the relay.

use minishogi_transport::TransportError;

/// Errors that can end a server or connection task.
///
/// Only transport failures surface here: protocol errors are reported to
/// the offending client as `error` messages (or swallowed, for malformed
/// input), and room errors never leave the router. Nothing in the relay is
/// fatal to the process; one connection's fault never affects other rooms.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),
}
