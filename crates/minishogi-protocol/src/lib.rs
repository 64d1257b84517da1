//! Wire protocol for the mini-shogi relay.
//!
//! This crate defines the "language" that game clients and the relay speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`RoomId`], [`Role`],
//!   etc.) — the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from text frames.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (text frames) and the room
//! layer (shared relay state). It doesn't know about sockets or rooms; it
//! only knows how to serialize and deserialize messages.
//!
//! ```text
//! Transport (frames) → Protocol (messages) → Room (relay state)
//! ```
//!
//! The relay never interprets `board`, `captured1`, `captured2`, or
//! `winner`: they are opaque JSON carried verbatim between the two clients
//! of a room.

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{ClientMessage, PlayerId, Recipient, Role, RoomId, ServerMessage};
