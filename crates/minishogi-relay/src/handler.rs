//! Per-connection handler: the message router and connection state machine.
//!
//! Each accepted connection gets its own task running [`handle_connection`],
//! plus a writer task that drains the connection's outbound channel into
//! the socket. The read loop decodes each frame and routes it:
//!
//! ```text
//! Unjoined --create-room--> Joined(role 1)
//! Unjoined --join-room----> Joined(role 2)
//! Joined   --move---------> relayed to the opponent
//! Joined   --reset--------> broadcast to the room
//! ```
//!
//! `Joined` is terminal: there is no leave, only disconnect, which tears
//! the room down for both players.

use std::sync::Arc;

use minishogi_protocol::{
    ClientMessage, Codec, PlayerId, Recipient, Role, RoomId, ServerMessage,
};
use minishogi_room::{PlayerSender, RoomError};
use minishogi_transport::{Connection, WebSocketConnection};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::RelayError;
use crate::server::ServerState;

/// Where a connection stands in its lifetime: not yet in any room, or
/// holding a seat. The role is fixed at join time and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConnState {
    Unjoined,
    Joined { room_id: RoomId, role: Role },
}

/// Drop guard that tears down the player's room when the handler exits.
///
/// This ensures the surviving opponent is notified and the room removed
/// even if the handler panics. Since `Drop` is synchronous, the async
/// teardown is spawned fire-and-forget.
struct DisconnectGuard<C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for DisconnectGuard<C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut rooms = state.rooms.lock().await;
            if let Some(room) = rooms.disconnect(player_id) {
                tracing::info!(
                    room_id = %room.id(),
                    %player_id,
                    "player disconnected, room torn down"
                );
                room.dispatch(vec![(
                    Recipient::AllExcept(player_id),
                    ServerMessage::OpponentDisconnected,
                )]);
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), RelayError> {
    // No authentication layer: the connection id is the player identity.
    let player_id = PlayerId(conn.id().into_inner());
    tracing::debug!(%player_id, "handling new connection");

    // Everything addressed to this player (replies, relays from the
    // opponent, the disconnect notice) funnels through one unbounded
    // channel into a writer task owning the sink half of the socket.
    // The task ends when the last sender clone is dropped, which happens
    // no later than room teardown.
    let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<ServerMessage>();
    {
        let conn = conn.clone();
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                let text = match state.codec.encode(&msg) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(%player_id, error = %e, "failed to encode outbound message");
                        continue;
                    }
                };
                if conn.send(&text).await.is_err() {
                    break;
                }
            }
        });
    }

    let _guard = DisconnectGuard {
        player_id,
        state: Arc::clone(&state),
    };

    let mut conn_state = ConnState::Unjoined;

    loop {
        match conn.recv().await {
            Ok(Some(frame)) => {
                route_frame(&state, player_id, &outbound, &mut conn_state, &frame).await;
            }
            Ok(None) => {
                tracing::info!(%player_id, "connection closed");
                break;
            }
            Err(e) => return Err(RelayError::Transport(e)),
        }
    }

    // _guard drops here → room teardown and peer notification fire.
    Ok(())
}

/// Decodes one inbound frame and routes it by type and connection state.
///
/// Messages inconsistent with the current state, and frames that don't
/// decode at all, are dropped without a response; the connection stays
/// open either way.
async fn route_frame<C: Codec>(
    state: &Arc<ServerState<C>>,
    player_id: PlayerId,
    outbound: &PlayerSender,
    conn_state: &mut ConnState,
    frame: &str,
) {
    let msg: ClientMessage = match state.codec.decode(frame) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::debug!(%player_id, error = %e, "ignoring undecodable frame");
            return;
        }
    };

    match msg {
        ClientMessage::CreateRoom { room_id, board } => {
            create_room(state, player_id, outbound, conn_state, room_id, board).await;
        }
        ClientMessage::JoinRoom { room_id } => {
            join_room(state, player_id, outbound, conn_state, room_id).await;
        }
        ClientMessage::Move {
            board,
            current_player,
            captured1,
            captured2,
            winner,
        } => {
            relay_move(
                state,
                player_id,
                conn_state,
                board,
                current_player,
                captured1,
                captured2,
                winner,
            )
            .await;
        }
        ClientMessage::Reset { board } => {
            relay_reset(state, player_id, conn_state, board).await;
        }
    }
}

async fn create_room<C: Codec>(
    state: &Arc<ServerState<C>>,
    player_id: PlayerId,
    outbound: &PlayerSender,
    conn_state: &mut ConnState,
    room_id: RoomId,
    board: Value,
) {
    if let ConnState::Joined { .. } = conn_state {
        tracing::debug!(%player_id, %room_id, "ignoring create-room from a seated player");
        return;
    }

    let mut rooms = state.rooms.lock().await;
    match rooms.create(room_id.clone(), player_id, outbound.clone(), board) {
        Ok(()) => {
            *conn_state = ConnState::Joined {
                room_id: room_id.clone(),
                role: Role::ONE,
            };
            let _ = outbound.send(ServerMessage::RoomCreated { room_id });
        }
        Err(e) => reject(outbound, player_id, &e),
    }
}

async fn join_room<C: Codec>(
    state: &Arc<ServerState<C>>,
    player_id: PlayerId,
    outbound: &PlayerSender,
    conn_state: &mut ConnState,
    room_id: RoomId,
) {
    if let ConnState::Joined { .. } = conn_state {
        tracing::debug!(%player_id, %room_id, "ignoring join-room from a seated player");
        return;
    }

    let mut rooms = state.rooms.lock().await;
    match rooms.join(&room_id, player_id, outbound.clone()) {
        Ok(role) => {
            *conn_state = ConnState::Joined {
                room_id: room_id.clone(),
                role,
            };

            // Both seats are taken: each player learns the board and its
            // own role.
            if let Some(room) = rooms.get(&room_id) {
                let msgs = room
                    .seats()
                    .iter()
                    .enumerate()
                    .map(|(index, seat)| {
                        (
                            Recipient::Player(seat.player()),
                            ServerMessage::GameStart {
                                board: room.board().clone(),
                                player_role: Role::from_seat_index(index),
                            },
                        )
                    })
                    .collect();
                room.dispatch(msgs);
            }
        }
        Err(e) => reject(outbound, player_id, &e),
    }
}

#[allow(clippy::too_many_arguments)]
async fn relay_move<C: Codec>(
    state: &Arc<ServerState<C>>,
    player_id: PlayerId,
    conn_state: &ConnState,
    board: Value,
    current_player: u8,
    captured1: Vec<Value>,
    captured2: Vec<Value>,
    winner: Option<Value>,
) {
    let ConnState::Joined { room_id, .. } = conn_state else {
        tracing::debug!(%player_id, "ignoring move from an unseated player");
        return;
    };

    let mut rooms = state.rooms.lock().await;
    // The room is gone once the opponent disconnects; the survivor's
    // moves silently no-op.
    let Some(room) = rooms.get_mut(room_id) else {
        return;
    };

    room.apply_move(
        board.clone(),
        current_player,
        captured1.clone(),
        captured2.clone(),
    );
    room.dispatch(vec![(
        Recipient::AllExcept(player_id),
        ServerMessage::OpponentMove {
            board,
            current_player,
            captured1,
            captured2,
            winner,
        },
    )]);
}

async fn relay_reset<C: Codec>(
    state: &Arc<ServerState<C>>,
    player_id: PlayerId,
    conn_state: &ConnState,
    board: Value,
) {
    let ConnState::Joined { room_id, .. } = conn_state else {
        tracing::debug!(%player_id, "ignoring reset from an unseated player");
        return;
    };

    let mut rooms = state.rooms.lock().await;
    let Some(room) = rooms.get_mut(room_id) else {
        return;
    };

    room.reset(board.clone());
    room.dispatch(vec![(Recipient::All, ServerMessage::GameReset { board })]);
}

/// Reports a protocol error to the offending sender. The connection stays
/// open and room state is unchanged.
fn reject(outbound: &PlayerSender, player_id: PlayerId, err: &RoomError) {
    let message = match err {
        RoomError::NotFound(_) => "room not found",
        RoomError::RoomFull(_) => "room full",
        RoomError::Duplicate(_) => "room already exists",
        // Guarded by ConnState; reaching this arm means a router bug.
        RoomError::AlreadySeated(_) => {
            tracing::warn!(%player_id, error = %err, "unexpected room error");
            return;
        }
    };
    let _ = outbound.send(ServerMessage::Error {
        message: message.to_owned(),
    });
}

// =========================================================================
// Tests
// =========================================================================
