//! The room: one shared island session.

use std::collections::HashMap;

use atoll_protocol::{PlayerEntry, PlayerId, RoomId, ServerEvent};
use tokio::time::Instant;

use crate::{Player, RoomConfig, RoomError};

/// One multiplayer session: its players, turn counter, and grace-timer
/// state.
///
/// A room never locks itself — the registry hands it out behind a
/// `tokio::sync::Mutex`, and every mutation happens under that lock.
///
/// The grace timer is `deadline`: `Some` means armed. Keeping the deadline
/// inside the `Option` makes "a deadline exists only while the timer is
/// active" impossible to violate.
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    config: RoomConfig,
    players: HashMap<PlayerId, Player>,
    turn: u64,
    deadline: Option<Instant>,
}

impl Room {
    /// A new, empty room on turn 0 with the timer disarmed.
    pub fn new(id: RoomId, config: RoomConfig) -> Self {
        Self {
            id,
            config,
            players: HashMap::new(),
            turn: 0,
            deadline: None,
        }
    }

    /// The room's code.
    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// The settings this room was created with.
    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Current turn number. Starts at 0, increments by exactly 1 per
    /// advance.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// The armed grace deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the grace timer is armed.
    pub fn timer_active(&self) -> bool {
        self.deadline.is_some()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the room has no members (and should be torn down).
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Number of members who have finished the current turn.
    pub fn done_count(&self) -> usize {
        self.players.values().filter(|p| p.turn_done).count()
    }

    /// Whether the given connection is a member.
    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.players.contains_key(&player_id)
    }

    /// Looks up a member.
    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.get(&player_id)
    }

    /// Looks up a member for mutation.
    pub fn player_mut(&mut self, player_id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&player_id)
    }

    /// Adds a member, enforcing the capacity limit.
    ///
    /// A connection that is already a member occupies its existing slot:
    /// the record is refreshed in place (name, save state, channel) with
    /// turn progress kept, and the capacity check does not apply.
    pub fn add_player(&mut self, mut player: Player) -> Result<(), RoomError> {
        if let Some(existing) = self.players.get_mut(&player.id) {
            player.turn_done = existing.turn_done;
            player.action_queue = std::mem::take(&mut existing.action_queue);
            *existing = player;
            return Ok(());
        }
        if self.players.len() >= self.config.max_players {
            return Err(RoomError::RoomFull(self.id.clone()));
        }
        self.players.insert(player.id, player);
        Ok(())
    }

    /// Removes a member. Returns the removed record, or `None` if the
    /// connection wasn't a member (removal is idempotent).
    ///
    /// The grace timer only means something while a finisher remains: if
    /// the departing player was the last one done, the deadline is
    /// cleared, and the next first finisher arms a fresh one.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Option<Player> {
        let removed = self.players.remove(&player_id)?;
        if removed.turn_done && self.done_count() == 0 {
            self.deadline = None;
        }
        Some(removed)
    }

    /// A snapshot of the member list, sorted by id for stable output.
    pub fn player_entries(&self) -> Vec<PlayerEntry> {
        let mut entries: Vec<PlayerEntry> = self
            .players
            .values()
            .map(|p| PlayerEntry {
                id: p.id,
                name: p.island_name.clone(),
                save_state: p.save_state.clone(),
            })
            .collect();
        entries.sort_by_key(|e| e.id);
        entries
    }

    /// Sends an event to every member.
    pub fn broadcast(&self, event: ServerEvent) {
        for player in self.players.values() {
            player.send(event.clone());
        }
    }

    /// Sends an event to every member except one (e.g. announcing an
    /// arrival to the members who were already present).
    pub fn broadcast_except(&self, excluded: PlayerId, event: ServerEvent) {
        for player in self.players.values() {
            if player.id != excluded {
                player.send(event.clone());
            }
        }
    }

    /// Sends an event to a single member. Silently drops if the
    /// connection is not (or no longer) a member.
    pub fn send_to(&self, player_id: PlayerId, event: ServerEvent) {
        if let Some(player) = self.players.get(&player_id) {
            player.send(event);
        }
    }

    /// Arms the grace timer. Only the coordinator calls this, and only on
    /// the first turn completion while others are still playing.
    pub(crate) fn arm_timer(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    /// Advances to the next turn: bumps the counter, disarms the timer,
    /// and clears every member's completion flag. Returns the new turn
    /// number.
    pub(crate) fn advance_turn(&mut self) -> u64 {
        self.turn += 1;
        self.deadline = None;
        for player in self.players.values_mut() {
            player.turn_done = false;
        }
        self.turn
    }
}
