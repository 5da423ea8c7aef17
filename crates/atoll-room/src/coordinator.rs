//! The turn-advance decision engine.
//!
//! After any state-changing event the coordinator decides whether a room's
//! turn should advance, and performs the advance. It holds no per-room
//! state of its own — everything lives in the [`Room`], and the caller's
//! room lock serializes access.

use std::time::{SystemTime, UNIX_EPOCH};

use atoll_protocol::{Action, PlayerId, SaveState, ServerEvent};
use tokio::time::{Duration, Instant};

use crate::{Room, RoomError};

/// Decides when a room's turn advances.
///
/// Cheap to clone; one instance is shared between the event handler and
/// the timer supervisor.
#[derive(Debug, Clone)]
pub struct TurnCoordinator {
    grace_period: Duration,
}

impl TurnCoordinator {
    /// A coordinator enforcing the given grace period.
    pub fn new(grace_period: Duration) -> Self {
        Self { grace_period }
    }

    /// The configured grace period.
    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// Records one player's turn submission and re-evaluates the room.
    ///
    /// Stores the save state, marks the player done, arms the grace timer
    /// on the first completion of a turn (when at least one other player
    /// is still unfinished), fans out any cross-player actions to the
    /// whole room, and announces the completion ratio. Returns whether the
    /// submission caused the turn to advance.
    ///
    /// # Errors
    /// [`RoomError::UnknownPlayer`] if the sender is not a member — the
    /// caller drops this silently, since it can follow a disconnect race.
    pub fn submit(
        &self,
        room: &mut Room,
        player_id: PlayerId,
        save_state: SaveState,
        actions: Vec<Action>,
    ) -> Result<bool, RoomError> {
        let total = room.len();
        let Some(player) = room.player_mut(player_id) else {
            return Err(RoomError::UnknownPlayer(player_id, room.id().clone()));
        };
        player.save_state = save_state;
        player.turn_done = true;
        let island_name = player.island_name.clone();

        let done = room.done_count();

        // First finisher of this turn, with others still playing: arm the
        // grace timer. `done == 1 && !timer_active` is exactly the 0 → 1
        // transition — a re-submission keeps the original deadline.
        if done == 1 && done < total && !room.timer_active() {
            let deadline = Instant::now() + self.grace_period;
            room.arm_timer(deadline);
            room.broadcast(ServerEvent::TimerStart {
                deadline_unix_ms: unix_ms_after(self.grace_period),
            });
            tracing::info!(
                room_id = %room.id(),
                grace_secs = self.grace_period.as_secs(),
                "grace timer armed"
            );
        }

        if !actions.is_empty() {
            // Broadcast-and-filter: every member receives the actions and
            // self-selects the ones aimed at their island.
            room.broadcast(ServerEvent::ExternalActions {
                actions,
                from: island_name.clone(),
            });
        }

        room.broadcast(ServerEvent::SystemMessage {
            text: format!("{island_name} finished their turn ({done}/{total})"),
        });

        Ok(self.evaluate(room))
    }

    /// Re-evaluates the turn-advance condition against the current time.
    ///
    /// Returns `true` if the turn advanced. Calling this when the
    /// condition does not hold performs no mutation, so the supervisor can
    /// sweep every room unconditionally.
    pub fn evaluate(&self, room: &mut Room) -> bool {
        self.evaluate_at(room, Instant::now())
    }

    /// [`evaluate`](Self::evaluate) with an explicit clock, for tests.
    pub fn evaluate_at(&self, room: &mut Room, now: Instant) -> bool {
        let total = room.len();
        if total == 0 {
            return false;
        }

        let done = room.done_count();
        let deadline_hit = room.deadline().is_some_and(|d| now >= d);
        if done < total && !(done > 0 && deadline_hit) {
            return false;
        }

        let turn = room.advance_turn();
        room.broadcast(ServerEvent::ProceedTurn { turn });
        tracing::info!(room_id = %room.id(), turn, done, total, "turn advanced");
        true
    }
}

/// Wall-clock timestamp `period` from now, in milliseconds since the Unix
/// epoch. This is what clients display; the internal deadline comparison
/// uses the monotonic clock.
fn unix_ms_after(period: Duration) -> u64 {
    (SystemTime::now() + period)
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, RoomConfig};
    use atoll_protocol::RoomId;
    use tokio::sync::mpsc;

    const GRACE: Duration = Duration::from_secs(180);

    fn coordinator() -> TurnCoordinator {
        TurnCoordinator::new(GRACE)
    }

    fn room_with(names: &[&str]) -> Room {
        let mut room = Room::new(RoomId::new("123AB"), RoomConfig::default());
        for (i, name) in names.iter().enumerate() {
            let (tx, _rx) = mpsc::unbounded_channel();
            room.add_player(Player::new(
                PlayerId(i as u64 + 1),
                *name,
                atoll_protocol::SaveState::default(),
                tx,
            ))
            .unwrap();
        }
        room
    }

    fn submit(
        coordinator: &TurnCoordinator,
        room: &mut Room,
        id: u64,
    ) -> Result<bool, RoomError> {
        coordinator.submit(
            room,
            PlayerId(id),
            atoll_protocol::SaveState(vec![id as u8]),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn test_evaluate_empty_room_is_noop() {
        let mut room = Room::new(RoomId::new("123AB"), RoomConfig::default());
        assert!(!coordinator().evaluate(&mut room));
        assert_eq!(room.turn(), 0);
    }

    #[tokio::test]
    async fn test_solo_player_advances_immediately_without_timer() {
        let mut room = room_with(&["solo"]);

        let advanced = submit(&coordinator(), &mut room, 1).unwrap();

        assert!(advanced);
        assert_eq!(room.turn(), 1);
        assert!(!room.timer_active());
        assert_eq!(room.done_count(), 0);
    }

    #[tokio::test]
    async fn test_first_submission_arms_timer_and_holds_turn() {
        let coordinator = coordinator();
        let mut room = room_with(&["a", "b"]);

        let advanced = submit(&coordinator, &mut room, 1).unwrap();

        assert!(!advanced);
        assert_eq!(room.turn(), 0);
        assert!(room.timer_active());
    }

    #[tokio::test]
    async fn test_all_submitted_advances_and_disarms() {
        let coordinator = coordinator();
        let mut room = room_with(&["a", "b"]);

        submit(&coordinator, &mut room, 1).unwrap();
        let advanced = submit(&coordinator, &mut room, 2).unwrap();

        assert!(advanced);
        assert_eq!(room.turn(), 1);
        assert!(!room.timer_active());
        assert_eq!(room.done_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_forces_advance_with_partial_completion() {
        let coordinator = coordinator();
        let mut room = room_with(&["a", "b"]);
        submit(&coordinator, &mut room, 1).unwrap();

        // One second short of the deadline: nothing moves.
        let before = Instant::now() + GRACE - Duration::from_secs(1);
        assert!(!coordinator.evaluate_at(&mut room, before));
        assert_eq!(room.turn(), 0);

        // At the deadline: forced advance with done_count 1 < total 2,
        // and the slow player's flag stays false through the reset.
        let at = Instant::now() + GRACE;
        assert!(coordinator.evaluate_at(&mut room, at));
        assert_eq!(room.turn(), 1);
        assert!(!room.timer_active());
        assert!(!room.player(PlayerId(2)).unwrap().turn_done);
    }

    #[tokio::test]
    async fn test_deadline_alone_never_advances_without_a_finisher() {
        let coordinator = coordinator();
        let mut room = room_with(&["a", "b"]);

        // No one finished, so no deadline exists; far-future clock is moot.
        let later = Instant::now() + Duration::from_secs(3600);
        assert!(!coordinator.evaluate_at(&mut room, later));
        assert_eq!(room.turn(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmission_does_not_extend_the_deadline() {
        let coordinator = coordinator();
        let mut room = room_with(&["a", "b"]);

        submit(&coordinator, &mut room, 1).unwrap();
        let armed = room.deadline().unwrap();

        tokio::time::advance(Duration::from_secs(60)).await;
        submit(&coordinator, &mut room, 1).unwrap();

        assert_eq!(room.deadline(), Some(armed));
    }

    #[tokio::test]
    async fn test_submit_from_non_member_is_unknown_player() {
        let coordinator = coordinator();
        let mut room = room_with(&["a"]);

        let result = submit(&coordinator, &mut room, 99);

        assert!(matches!(result, Err(RoomError::UnknownPlayer(p, _)) if p == PlayerId(99)));
        // No mutation happened.
        assert_eq!(room.done_count(), 0);
        assert_eq!(room.turn(), 0);
    }

    #[tokio::test]
    async fn test_submit_records_save_state() {
        let coordinator = coordinator();
        let mut room = room_with(&["a", "b"]);

        submit(&coordinator, &mut room, 1).unwrap();

        assert_eq!(
            room.player(PlayerId(1)).unwrap().save_state,
            atoll_protocol::SaveState(vec![1])
        );
    }

    #[tokio::test]
    async fn test_turn_counter_increments_by_one_per_advance() {
        let coordinator = coordinator();
        let mut room = room_with(&["solo"]);

        for expected in 1..=5 {
            assert!(submit(&coordinator, &mut room, 1).unwrap());
            assert_eq!(room.turn(), expected);
        }
    }
}
