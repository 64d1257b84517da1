//! Error types for the room layer.

use minishogi_protocol::{PlayerId, RoomId};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// Both seats are taken.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// A room with this id already exists.
    #[error("room {0} already exists")]
    Duplicate(RoomId),

    /// The player already occupies a room.
    #[error("player {0} is already seated in a room")]
    AlreadySeated(PlayerId),
}
