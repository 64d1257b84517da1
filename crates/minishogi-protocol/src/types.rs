//! Core protocol types for the relay's wire format.
//!
//! Every message on the wire is a single JSON object with a `"type"` field
//! in kebab-case and the remaining fields in camelCase, matching what the
//! browser client sends:
//!
//! ```text
//! {"type": "join-room", "roomId": "R1"}
//! ```
//!
//! The relay is a blind forwarder: `board`, `captured1`, `captured2`, and
//! `winner` are [`serde_json::Value`]s it stores and re-emits without ever
//! looking inside.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a room.
///
/// Room ids are opaque strings chosen by the creating client; the relay
/// only ever compares them for equality and uses them as registry keys.
///
/// `#[serde(transparent)]` makes a `RoomId` serialize as the bare string,
/// so `RoomId("R1")` is `"R1"` on the wire, not `{"0": "R1"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A unique identifier for a connected player.
///
/// There is no authentication layer, so a player's identity is simply the
/// identity of their connection: the relay derives a `PlayerId` from the
/// transport's connection counter when the socket is accepted. Never sent
/// on the wire; used for addressing within the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A player's role within a room: 1 for the creator, 2 for the joiner.
///
/// Roles are positional (the seat index at join time plus one) and
/// permanent for the connection's lifetime. The client maps its role to a
/// side of the board and a captured-piece slot; the relay itself never
/// consults it beyond echoing it in `game-start`.
///
/// Serializes transparently as a plain number, so `playerRole` is `1` or
/// `2` in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(pub u8);

impl Role {
    /// The room creator's role.
    pub const ONE: Role = Role(1);
    /// The joining player's role.
    pub const TWO: Role = Role(2);

    /// Maps a seat index (0-based join order) to its role.
    pub fn from_seat_index(index: usize) -> Self {
        Self(index as u8 + 1)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Recipient — who should receive a message?
// ---------------------------------------------------------------------------

/// Specifies who in a room should receive a server message.
///
/// The router produces `(Recipient, ServerMessage)` pairs; the room resolves
/// each recipient to the relevant seat(s). `AllExcept` is how a move is
/// relayed to the opponent without echoing it back to the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every player in the room.
    All,
    /// One specific player.
    Player(PlayerId),
    /// Everyone except the specified player.
    AllExcept(PlayerId),
}

// ---------------------------------------------------------------------------
// Client → server messages
// ---------------------------------------------------------------------------

/// Messages a client sends to the relay.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON; combined with
/// the rename attributes, `ClientMessage::CreateRoom { .. }` parses from:
///
/// ```text
/// {"type": "create-room", "roomId": "R1", "board": [...]}
/// ```
///
/// Anything that fails to parse (unknown `"type"`, missing fields, not
/// JSON at all) is dropped by the router without a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Open a new room under a client-chosen id, seeding its board.
    CreateRoom { room_id: RoomId, board: Value },

    /// Take the second seat in an existing room.
    JoinRoom { room_id: RoomId },

    /// A move was played: the full post-move state, to be mirrored into the
    /// room and relayed to the opponent verbatim. `winner` is client-asserted
    /// terminal-state signaling the relay passes through untouched.
    Move {
        board: Value,
        current_player: u8,
        #[serde(default)]
        captured1: Vec<Value>,
        #[serde(default)]
        captured2: Vec<Value>,
        #[serde(default)]
        winner: Option<Value>,
    },

    /// Start over: replace the board, hand the turn back to player 1, and
    /// clear both captured-piece lists.
    Reset { board: Value },
}

// ---------------------------------------------------------------------------
// Server → client messages
// ---------------------------------------------------------------------------

/// Messages the relay sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// The room was created; the sender now holds role 1.
    RoomCreated { room_id: RoomId },

    /// Both seats are taken and the game begins. Each player receives its
    /// own `player_role`, so the two copies of this message differ.
    GameStart { board: Value, player_role: Role },

    /// The opponent played a move. Sent only to the non-moving player.
    /// `winner` is omitted from the JSON entirely when the client didn't
    /// send one: absent stays absent.
    OpponentMove {
        board: Value,
        current_player: u8,
        captured1: Vec<Value>,
        captured2: Vec<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        winner: Option<Value>,
    },

    /// The game was reset to a fresh board. Sent to both players.
    GameReset { board: Value },

    /// The other occupant's socket closed; the room is gone.
    OpponentDisconnected,

    /// A protocol error: room not found, room full, room already exists.
    /// The connection stays open.
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================
