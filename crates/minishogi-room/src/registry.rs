//! Room registry: the process-wide table of active rooms.

use std::collections::HashMap;

use minishogi_protocol::{PlayerId, Role, RoomId};
use serde_json::Value;

use crate::{PlayerSender, Room, RoomError};

/// Tracks all active rooms and which player sits in which room.
///
/// Created empty at startup, owned by the server state, and never
/// persisted. Every operation here runs under the server's registry mutex,
/// which is what makes room mutations atomic with respect to concurrent
/// handlers.
pub struct RoomRegistry {
    /// Active rooms, keyed by client-supplied id.
    rooms: HashMap<RoomId, Room>,

    /// Maps each seated player to their room. A player occupies at most
    /// one room at a time (key invariant); this index is what makes
    /// disconnect cleanup a single lookup.
    player_rooms: HashMap<PlayerId, RoomId>,
}

impl RoomRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
        }
    }

    /// Creates a room under a client-chosen id with the creator in seat 1.
    ///
    /// A reused id is rejected and the existing room is left untouched;
    /// silently overwriting would orphan its occupants.
    pub fn create(
        &mut self,
        room_id: RoomId,
        creator: PlayerId,
        sender: PlayerSender,
        board: Value,
    ) -> Result<(), RoomError> {
        if self.rooms.contains_key(&room_id) {
            return Err(RoomError::Duplicate(room_id));
        }
        if self.player_rooms.contains_key(&creator) {
            return Err(RoomError::AlreadySeated(creator));
        }

        tracing::info!(%room_id, player = %creator, "room created");
        self.player_rooms.insert(creator, room_id.clone());
        self.rooms
            .insert(room_id.clone(), Room::new(room_id, creator, sender, board));
        Ok(())
    }

    /// Seats a player in an existing room and returns their role.
    pub fn join(
        &mut self,
        room_id: &RoomId,
        player: PlayerId,
        sender: PlayerSender,
    ) -> Result<Role, RoomError> {
        if self.player_rooms.contains_key(&player) {
            return Err(RoomError::AlreadySeated(player));
        }

        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        let role = room.join(player, sender)?;

        self.player_rooms.insert(player, room_id.clone());
        tracing::info!(%room_id, %player, %role, "player joined");
        Ok(role)
    }

    /// Looks up a room without side effects.
    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Looks up a room for mutation.
    pub fn get_mut(&mut self, room_id: &RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    /// Deletes a room unconditionally and unindexes its seats. Idempotent:
    /// removing an absent id is a no-op.
    pub fn remove(&mut self, room_id: &RoomId) -> Option<Room> {
        let room = self.rooms.remove(room_id)?;
        for seat in room.seats() {
            self.player_rooms.remove(&seat.player());
        }
        tracing::info!(%room_id, "room removed");
        Some(room)
    }

    /// Tears down the room a player occupies, if any, returning it so the
    /// caller can notify the surviving seat. A room dies at the *first*
    /// disconnect of either occupant, not when both leave.
    pub fn disconnect(&mut self, player: PlayerId) -> Option<Room> {
        let room_id = self.player_rooms.get(&player)?.clone();
        self.remove(&room_id)
    }

    /// The room a player currently occupies, if any.
    pub fn room_of(&self, player: PlayerId) -> Option<&RoomId> {
        self.player_rooms.get(&player)
    }

    /// Number of active rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether no rooms are active.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
