//! Codec trait and implementations for serializing/deserializing messages.
//!
//! A codec converts between Rust types and the text frames the transport
//! carries. The protocol layer doesn't care HOW messages are serialized:
//! it just needs something that implements the [`Codec`] trait, so a
//! different encoding can be swapped in without touching the router.
//!
//! The relay speaks JSON text frames, so [`JsonCodec`] is the only
//! implementation today.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes Rust types to text frames and decodes frames back.
///
/// `Send + Sync + 'static` because the codec lives in the shared server
/// state and is used from every connection task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into one text frame.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes one text frame back into a value.
    ///
    /// `DeserializeOwned` (vs plain `Deserialize`) means the result doesn't
    /// borrow from the input, so the frame buffer can be dropped after
    /// decoding.
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON via `serde_json`.
///
/// JSON keeps frames inspectable in browser DevTools and matches what the
/// game client sends.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}
