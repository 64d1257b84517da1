//! The room data model: two seats around one client-trusted game snapshot.

use minishogi_protocol::{PlayerId, Recipient, Role, RoomId, ServerMessage};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::RoomError;

/// A room never holds more than two players; the third join is rejected
/// without mutating anything.
pub const MAX_PLAYERS: usize = 2;

/// Channel sender for delivering outbound messages to a player's writer
/// task. Unbounded, so delivery is fire-and-forget: a slow peer never
/// throttles the sender, and a vanished peer just drops the message.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// One occupied seat in a room.
///
/// Seat order is join order and determines the role: the first seat is
/// role 1, the second role 2, permanently.
#[derive(Debug)]
pub struct Seat {
    player: PlayerId,
    sender: PlayerSender,
}

impl Seat {
    /// The player occupying this seat.
    pub fn player(&self) -> PlayerId {
        self.player
    }
}

/// A mutable game session shared by up to two connections.
///
/// The relay stores whatever the clients last reported: `board`,
/// `current_player`, and the captured lists are opaque and never
/// validated. A room's lifetime ends at the first disconnect of either
/// occupant; the registry enforces that.
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    players: Vec<Seat>,
    board: Value,
    current_player: u8,
    captured1: Vec<Value>,
    captured2: Vec<Value>,
}

impl Room {
    /// Creates a room with the creator in seat 1 and the board they sent.
    pub(crate) fn new(id: RoomId, creator: PlayerId, sender: PlayerSender, board: Value) -> Self {
        Self {
            id,
            players: vec![Seat {
                player: creator,
                sender,
            }],
            board,
            current_player: 1,
            captured1: Vec::new(),
            captured2: Vec::new(),
        }
    }

    /// The room's registry key.
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Seats the player in join order and returns their role.
    ///
    /// A full room is left untouched.
    pub(crate) fn join(&mut self, player: PlayerId, sender: PlayerSender) -> Result<Role, RoomError> {
        if self.players.len() >= MAX_PLAYERS {
            return Err(RoomError::RoomFull(self.id.clone()));
        }
        self.players.push(Seat { player, sender });
        Ok(Role::from_seat_index(self.players.len() - 1))
    }

    /// Overwrites the snapshot with a move payload, verbatim.
    pub fn apply_move(
        &mut self,
        board: Value,
        current_player: u8,
        captured1: Vec<Value>,
        captured2: Vec<Value>,
    ) {
        self.board = board;
        self.current_player = current_player;
        self.captured1 = captured1;
        self.captured2 = captured2;
    }

    /// Starts the game over: new board, turn back to player 1, captured
    /// lists emptied.
    pub fn reset(&mut self, board: Value) {
        self.board = board;
        self.current_player = 1;
        self.captured1.clear();
        self.captured2.clear();
    }

    /// The occupied seats, in join order.
    pub fn seats(&self) -> &[Seat] {
        &self.players
    }

    /// The role of a seated player, by seat position.
    pub fn role_of(&self, player: PlayerId) -> Option<Role> {
        self.players
            .iter()
            .position(|seat| seat.player == player)
            .map(Role::from_seat_index)
    }

    /// The last board snapshot any client reported.
    pub fn board(&self) -> &Value {
        &self.board
    }

    /// The turn indicator as last reported by a client.
    pub fn current_player(&self) -> u8 {
        self.current_player
    }

    /// Captured pieces mirrored for player 1.
    pub fn captured1(&self) -> &[Value] {
        &self.captured1
    }

    /// Captured pieces mirrored for player 2.
    pub fn captured2(&self) -> &[Value] {
        &self.captured2
    }

    /// Delivers outbound messages to the seats each recipient resolves to.
    pub fn dispatch(&self, msgs: Vec<(Recipient, ServerMessage)>) {
        for (recipient, msg) in msgs {
            match recipient {
                Recipient::All => {
                    for seat in &self.players {
                        self.send_to(seat.player, msg.clone());
                    }
                }
                Recipient::Player(player) => {
                    self.send_to(player, msg);
                }
                Recipient::AllExcept(excluded) => {
                    for seat in &self.players {
                        if seat.player != excluded {
                            self.send_to(seat.player, msg.clone());
                        }
                    }
                }
            }
        }
    }

    /// Sends one message to a single seat. Silently drops if the player
    /// isn't seated here or their writer task is gone.
    pub fn send_to(&self, player: PlayerId, msg: ServerMessage) {
        if let Some(seat) = self.players.iter().find(|seat| seat.player == player) {
            let _ = seat.sender.send(msg);
        }
    }
}
