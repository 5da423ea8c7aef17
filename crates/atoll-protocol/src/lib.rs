//! Event vocabulary for the atoll session coordinator.
//!
//! This crate defines everything that crosses the transport boundary:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`PlayerId`], [`RoomId`],
//!   [`SaveState`], [`Action`]) — the messages and identifiers the
//!   coordinator speaks.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how events are converted
//!   to and from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while doing so.
//!
//! The crate knows nothing about rooms, timers, or connections — it only
//! describes the wire vocabulary. Save states and cross-player actions are
//! opaque byte blobs here and stay opaque everywhere else in the system.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Action, ClientEvent, ErrorKind, PlayerEntry, PlayerId, RoomId,
    SaveState, ServerEvent,
};
