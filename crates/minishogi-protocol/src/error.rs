//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire messages.
///
/// Decode failures are routine (any client can send garbage) and the
/// router drops the offending frame without closing the connection.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a message into a frame).
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Deserialization failed: malformed JSON, an unknown `type` tag, or
    /// missing required fields.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}
