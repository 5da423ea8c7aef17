//! The per-connection player record.

use atoll_protocol::{Action, PlayerId, SaveState, ServerEvent};
use tokio::sync::mpsc;

/// Channel sender for delivering outbound events to one player.
///
/// This is the coordinator's half of the message bus: the transport
/// collaborator owns the receiving half and the actual delivery.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// One connected player inside a room.
///
/// Created on join, mutated only by that player's own submissions,
/// destroyed on disconnect or room teardown.
#[derive(Debug)]
pub struct Player {
    /// The connection handle this player arrived on.
    pub id: PlayerId,

    /// Display name of the player's island.
    pub island_name: String,

    /// Latest save state, an opaque blob the core never inspects.
    pub save_state: SaveState,

    /// Whether this player has finished the current turn.
    pub turn_done: bool,

    /// Incoming cross-player actions addressed to this island.
    ///
    /// The current delivery policy broadcasts actions room-wide and lets
    /// each client filter for itself, so this queue is not written by the
    /// coordinator; it is the hook for per-target routing.
    pub action_queue: Vec<Action>,

    sender: PlayerSender,
}

impl Player {
    /// A new player record bound to its outbound channel.
    pub fn new(
        id: PlayerId,
        island_name: impl Into<String>,
        save_state: SaveState,
        sender: PlayerSender,
    ) -> Self {
        Self {
            id,
            island_name: island_name.into(),
            save_state,
            turn_done: false,
            action_queue: Vec::new(),
            sender,
        }
    }

    /// Sends an event to this player. Fire-and-forget: if the receiving
    /// half is gone (the connection is tearing down), the event is dropped.
    pub fn send(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (PlayerSender, mpsc::UnboundedReceiver<ServerEvent>) {
        mpsc::unbounded_channel()
    }

    #[test]
    fn test_new_player_has_not_finished_turn() {
        let (tx, _rx) = channel();
        let player = Player::new(PlayerId(1), "Tortimer", SaveState::default(), tx);
        assert!(!player.turn_done);
        assert!(player.action_queue.is_empty());
    }

    #[test]
    fn test_send_delivers_to_channel() {
        let (tx, mut rx) = channel();
        let player = Player::new(PlayerId(1), "Tortimer", SaveState::default(), tx);

        player.send(ServerEvent::ProceedTurn { turn: 1 });

        assert_eq!(rx.try_recv().unwrap(), ServerEvent::ProceedTurn { turn: 1 });
    }

    #[test]
    fn test_send_to_dropped_receiver_is_silent() {
        let (tx, rx) = channel();
        drop(rx);
        let player = Player::new(PlayerId(1), "Tortimer", SaveState::default(), tx);

        // Must not panic: the player is mid-disconnect.
        player.send(ServerEvent::ProceedTurn { turn: 1 });
    }
}
