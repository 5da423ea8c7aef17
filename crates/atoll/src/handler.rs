//! Per-connection event handling: decode, dispatch, error reporting.
//!
//! The transport calls [`handle_frame`] for every inbound frame, passing
//! the connection's id and its outbound channel. Recoverable failures
//! (unknown room, full room) come back to the requester as
//! [`ServerEvent::Error`]; events from connections that are not room
//! members are dropped with a debug log, since they usually lose a race
//! against a disconnect.

use atoll_protocol::{
    ClientEvent, Codec, JsonCodec, PlayerId, ProtocolError, ServerEvent,
};
use atoll_room::{Player, PlayerSender, RoomError};

use crate::ServerContext;

/// Decodes one inbound frame and handles the event it carries.
///
/// # Errors
/// [`ProtocolError::Decode`] if the frame is not a valid event. The
/// transport decides whether that warrants closing the connection.
pub async fn handle_frame(
    ctx: &ServerContext,
    player_id: PlayerId,
    sender: &PlayerSender,
    frame: &[u8],
) -> Result<(), ProtocolError> {
    let event: ClientEvent = JsonCodec.decode(frame)?;
    handle_event(ctx, player_id, sender, event).await;
    Ok(())
}

/// Handles one already-decoded event, converting recoverable failures
/// into [`ServerEvent::Error`] for the requester.
pub async fn handle_event(
    ctx: &ServerContext,
    player_id: PlayerId,
    sender: &PlayerSender,
    event: ClientEvent,
) {
    if let Err(e) = dispatch(ctx, player_id, sender, event).await {
        match e.kind() {
            Some(kind) => {
                let _ = sender.send(ServerEvent::Error {
                    kind,
                    message: e.to_string(),
                });
            }
            // Unknown-player failures are expected during disconnect
            // races and are never reported to the sender.
            None => tracing::debug!(%player_id, error = %e, "dropping event"),
        }
    }
}

async fn dispatch(
    ctx: &ServerContext,
    player_id: PlayerId,
    sender: &PlayerSender,
    event: ClientEvent,
) -> Result<(), RoomError> {
    match event {
        ClientEvent::CreateRoom {
            island_name,
            save_state,
        } => {
            let room_id = ctx.registry().create_room().await;
            let player = Player::new(player_id, island_name, save_state, sender.clone());
            if let Err(e) = ctx.registry().join_room(&room_id, player).await {
                // Nobody ever entered; don't leave the room behind.
                ctx.registry().remove_room_if_empty(&room_id).await;
                return Err(e);
            }
            let _ = sender.send(ServerEvent::RoomJoined {
                room_id,
                is_host: true,
            });
        }

        ClientEvent::JoinRoom {
            room_id,
            island_name,
            save_state,
        } => {
            let player = Player::new(player_id, island_name, save_state, sender.clone());
            ctx.registry().join_room(&room_id, player).await?;
            let _ = sender.send(ServerEvent::RoomJoined {
                room_id,
                is_host: false,
            });
        }

        ClientEvent::UpdateState {
            room_id,
            save_state,
        } => {
            let room = ctx
                .registry()
                .get_room(&room_id)
                .await
                .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
            let mut room = room.lock().await;
            let player = room
                .player_mut(player_id)
                .ok_or(RoomError::UnknownPlayer(player_id, room_id))?;
            player.save_state = save_state;
        }

        ClientEvent::GetPlayerList { room_id } => {
            let room = ctx
                .registry()
                .get_room(&room_id)
                .await
                .ok_or(RoomError::NotFound(room_id))?;
            let players = room.lock().await.player_entries();
            let _ = sender.send(ServerEvent::PlayerList { players });
        }

        ClientEvent::SubmitTurn {
            room_id,
            save_state,
            actions,
        } => {
            let room = ctx
                .registry()
                .get_room(&room_id)
                .await
                .ok_or(RoomError::NotFound(room_id))?;
            let mut room = room.lock().await;
            ctx.coordinator()
                .submit(&mut room, player_id, save_state, actions)?;
        }

        ClientEvent::Disconnect => {
            if let Some(room_id) = ctx.registry().disconnect(player_id).await {
                tracing::debug!(%player_id, %room_id, "player disconnected");
            }
        }
    }

    Ok(())
}
