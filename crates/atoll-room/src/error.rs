//! Error types for the room layer.

use atoll_protocol::{ErrorKind, PlayerId, RoomId};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The room is full — no more player slots available.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The sender is not a member of this room. Legitimate after a race
    /// between a disconnect and a late-arriving message, so callers drop
    /// it rather than report it.
    #[error("player {0} is not a member of room {1}")]
    UnknownPlayer(PlayerId, RoomId),
}

impl RoomError {
    /// The wire error kind to report to the requester, or `None` for
    /// errors that are silently ignored.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::NotFound(_) => Some(ErrorKind::RoomNotFound),
            Self::RoomFull(_) => Some(ErrorKind::RoomFull),
            Self::UnknownPlayer(..) => None,
        }
    }
}
