//! Room lifecycle management for the mini-shogi relay.
//!
//! A room pairs up to two connections around one shared, client-trusted
//! game snapshot. This crate owns the data model and its invariants:
//!
//! - [`Room`] — seats, last board snapshot, turn indicator, captured lists
//! - [`RoomRegistry`] — the process-wide `RoomId → Room` table, the only
//!   place rooms are created, looked up, and deleted
//! - [`RoomError`] — duplicate / not found / full
//!
//! The registry is owned by the server state and passed by reference into
//! every connection handler; one async mutex around it serializes all
//! join/move/reset/disconnect traffic, so no handler can ever observe a
//! half-mutated room. Outbound delivery goes through per-seat unbounded
//! channels ([`PlayerSender`]) and never blocks.

mod error;
mod registry;
mod room;

pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{MAX_PLAYERS, PlayerSender, Room, Seat};
