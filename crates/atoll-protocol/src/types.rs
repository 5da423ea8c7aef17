//! Core types for atoll's event vocabulary.
//!
//! Everything here is serializable: these are the structures that travel
//! between the coordinator core and the transport collaborator. The
//! internally tagged (`tag = "type"`) representation keeps the JSON easy
//! to dispatch on from a JavaScript client.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a connected player.
///
/// This is the opaque connection handle assigned by the transport when a
/// client connects. The core never derives meaning from it — it is only a
/// map key and a routing address.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A human-shareable room code, e.g. `123AB`.
///
/// Generated by the registry (three digits followed by two uppercase
/// letters in the default policy). The exact format is a convention, not a
/// contract — clients treat it as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wraps an existing code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Opaque payloads
// ---------------------------------------------------------------------------

/// A player's island save data.
///
/// An uninterpreted byte sequence: the simulation layer on the client
/// chooses the encoding, and the coordinator passes it through unmodified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaveState(pub Vec<u8>);

impl SaveState {
    /// Size of the blob in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the blob is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One cross-player action payload (e.g. an attack on another island).
///
/// Opaque to the core: the coordinator routes actions, recipients interpret
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(pub Vec<u8>);

// ---------------------------------------------------------------------------
// Inbound events (player → coordinator)
// ---------------------------------------------------------------------------

/// Events a connected player can send to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Create a fresh room and join it as host.
    CreateRoom {
        island_name: String,
        save_state: SaveState,
    },

    /// Join an existing room by its code.
    JoinRoom {
        room_id: RoomId,
        island_name: String,
        save_state: SaveState,
    },

    /// Replace this player's stored save state (e.g. after resolving a
    /// turn locally). Does not touch the turn-completion flag.
    UpdateState {
        room_id: RoomId,
        save_state: SaveState,
    },

    /// Request the current member list, including save states for
    /// island-visiting.
    GetPlayerList { room_id: RoomId },

    /// Finish the current turn: store the final save state and hand over
    /// any actions aimed at other islands.
    SubmitTurn {
        room_id: RoomId,
        save_state: SaveState,
        actions: Vec<Action>,
    },

    /// The connection is going away.
    Disconnect,
}

// ---------------------------------------------------------------------------
// Outbound events (coordinator → player(s))
// ---------------------------------------------------------------------------

/// One entry in a [`ServerEvent::PlayerList`] response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    /// The member's connection handle.
    pub id: PlayerId,
    /// The member's island name.
    pub name: String,
    /// The member's latest save state (tourism data).
    pub save_state: SaveState,
}

/// The kind of a recoverable error reported to a requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The requested room code is not registered.
    RoomNotFound,
    /// The room is at capacity.
    RoomFull,
}

/// Events the coordinator emits, addressed either to one connection or to
/// all members of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// To the requester: you are now a member of this room.
    RoomJoined { room_id: RoomId, is_host: bool },

    /// To the requester only: the operation failed. Never broadcast.
    Error { kind: ErrorKind, message: String },

    /// To a room: a human-readable notice (joins, departures, turn
    /// completion ratios).
    SystemMessage { text: String },

    /// To the requester: the current member list.
    PlayerList { players: Vec<PlayerEntry> },

    /// To a room: the grace timer is armed; the turn force-advances at
    /// this wall-clock deadline (milliseconds since the Unix epoch).
    TimerStart { deadline_unix_ms: u64 },

    /// To a room: actions one player directed at other islands. Recipients
    /// decide which of them apply to their own island.
    ExternalActions { actions: Vec<Action>, from: String },

    /// To a room: the turn advanced; this is the new turn number.
    ProceedTurn { turn: u64 },
}

// =========================================================================
// Tests
// =========================================================================
