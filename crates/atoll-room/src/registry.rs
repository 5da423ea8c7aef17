//! The session registry: every active room, and who is in which one.
//!
//! The registry is an explicit object owned by the server's top-level
//! context — never a process-wide global. Its own lock covers room
//! creation/teardown and the membership index only; each room has its own
//! lock, so unrelated games never serialize against each other. Lock order
//! is always registry → room.

use std::collections::HashMap;
use std::sync::Arc;

use atoll_protocol::{PlayerId, RoomId, ServerEvent};
use tokio::sync::Mutex;

use crate::{Player, Room, RoomConfig, RoomError, RoomIdGenerator};

/// Mutable registry state, guarded by one lock so the room map and the
/// membership index can never disagree.
#[derive(Default)]
struct RegistryInner {
    /// Active rooms, keyed by room code.
    rooms: HashMap<RoomId, Arc<Mutex<Room>>>,

    /// Maps each connection to the room it is currently in. A connection
    /// is in at most one room at a time.
    memberships: HashMap<PlayerId, RoomId>,
}

/// Owns all active rooms: creation, membership, and teardown rules.
pub struct SessionRegistry {
    inner: Mutex<RegistryInner>,
    config: RoomConfig,
    idgen: RoomIdGenerator,
}

impl SessionRegistry {
    /// An empty registry that stamps every new room with `config`.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
            config,
            idgen: RoomIdGenerator::default(),
        }
    }

    /// The config applied to new rooms.
    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Creates an empty room under a fresh, collision-checked code.
    ///
    /// Regenerates on collision against the live key set; with the default
    /// ~36^5 code space a retry is already rare, so the loop is expected
    /// to run once.
    pub async fn create_room(&self) -> RoomId {
        let mut inner = self.inner.lock().await;
        let room_id = loop {
            let candidate = self.idgen.generate();
            if !inner.rooms.contains_key(&candidate) {
                break candidate;
            }
            tracing::debug!(room_id = %candidate, "room code collision, regenerating");
        };

        let room = Room::new(room_id.clone(), self.config.clone());
        inner
            .rooms
            .insert(room_id.clone(), Arc::new(Mutex::new(room)));
        tracing::info!(%room_id, "room created");
        room_id
    }

    /// Adds a player to a room and announces the arrival to the members
    /// already present.
    ///
    /// A connection is in at most one room at a time: joining while still
    /// a member elsewhere first removes the player from the old room (with
    /// the usual departure notice and empty-room teardown).
    ///
    /// # Errors
    /// [`RoomError::NotFound`] if the code is unknown, [`RoomError::RoomFull`]
    /// at capacity. Neither mutates anything.
    pub async fn join_room(
        &self,
        room_id: &RoomId,
        player: Player,
    ) -> Result<(), RoomError> {
        let mut inner = self.inner.lock().await;

        let room = inner
            .rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        let player_id = player.id;
        let island_name = player.island_name.clone();
        {
            let mut room = room.lock().await;
            let rejoin = room.contains(player_id);
            room.add_player(player)?;
            // A rejoin refreshes the existing record; the arrival notice
            // is for genuinely new members only.
            if !rejoin {
                room.broadcast_except(
                    player_id,
                    ServerEvent::SystemMessage {
                        text: format!("{island_name} joined the island"),
                    },
                );
            }
        }

        // A rejected join must leave the old membership intact, so the
        // previous room is vacated only after the add succeeds.
        if let Some(previous) = inner.memberships.get(&player_id).cloned() {
            if previous != *room_id {
                Self::remove_locked(&mut inner, &previous, player_id).await;
            }
        }
        inner.memberships.insert(player_id, room_id.clone());

        tracing::info!(%room_id, %player_id, island = %island_name, "player joined");
        Ok(())
    }

    /// Removes a player from a room, announcing the departure to the
    /// remaining members and tearing the room down once it is empty.
    /// Idempotent: removing an absent player or from an absent room is a
    /// no-op.
    pub async fn remove_player(&self, room_id: &RoomId, player_id: PlayerId) {
        let mut inner = self.inner.lock().await;
        Self::remove_locked(&mut inner, room_id, player_id).await;
    }

    /// Removes a player by connection alone, resolving their room through
    /// the membership index. Used for disconnects, which arrive without a
    /// room code. No-op for unknown connections.
    pub async fn disconnect(&self, player_id: PlayerId) -> Option<RoomId> {
        let mut inner = self.inner.lock().await;
        let room_id = inner.memberships.get(&player_id).cloned()?;
        Self::remove_locked(&mut inner, &room_id, player_id).await;
        Some(room_id)
    }

    /// Removal body shared by the three paths above. Caller holds the
    /// registry lock.
    async fn remove_locked(
        inner: &mut RegistryInner,
        room_id: &RoomId,
        player_id: PlayerId,
    ) {
        let Some(room) = inner.rooms.get(room_id).cloned() else {
            return;
        };

        let emptied = {
            let mut room = room.lock().await;
            let Some(removed) = room.remove_player(player_id) else {
                return;
            };
            room.broadcast(ServerEvent::SystemMessage {
                text: format!("{} left the island", removed.island_name),
            });
            tracing::info!(
                %room_id,
                %player_id,
                remaining = room.len(),
                "player left"
            );
            room.is_empty()
        };

        inner.memberships.remove(&player_id);
        if emptied {
            inner.rooms.remove(room_id);
            tracing::info!(%room_id, "room emptied, destroyed");
        }
    }

    /// Drops a room if it has no members. Returns whether it was removed.
    ///
    /// Backs out of a failed create-and-join, so a room nobody could
    /// enter does not linger in the registry. A room with members is
    /// left alone.
    pub async fn remove_room_if_empty(&self, room_id: &RoomId) -> bool {
        let mut inner = self.inner.lock().await;
        let Some(room) = inner.rooms.get(room_id).cloned() else {
            return false;
        };
        if !room.lock().await.is_empty() {
            return false;
        }
        inner.rooms.remove(room_id);
        tracing::info!(%room_id, "empty room discarded");
        true
    }

    /// Shared handle to a room, if it exists. All access to the room goes
    /// through its own lock.
    pub async fn get_room(&self, room_id: &RoomId) -> Option<Arc<Mutex<Room>>> {
        self.inner.lock().await.rooms.get(room_id).cloned()
    }

    /// Snapshot of the current room codes. The supervisor sweeps this
    /// list, tolerating rooms created or destroyed after the snapshot.
    pub async fn room_ids(&self) -> Vec<RoomId> {
        self.inner.lock().await.rooms.keys().cloned().collect()
    }

    /// The room a connection is currently in, if any.
    pub async fn player_room(&self, player_id: PlayerId) -> Option<RoomId> {
        self.inner.lock().await.memberships.get(&player_id).cloned()
    }

    /// Number of active rooms.
    pub async fn room_count(&self) -> usize {
        self.inner.lock().await.rooms.len()
    }
}
