//! Room and turn-synchronization core for atoll.
//!
//! A room is one shared island session: a set of players, a turn counter,
//! and a grace-period timer. Players submit their turns independently; the
//! room advances once everyone has finished, or once the grace period runs
//! out with at least one finisher.
//!
//! # Key types
//!
//! - [`SessionRegistry`] — owns every active room, creation/teardown rules
//! - [`TurnCoordinator`] — the turn-advance decision engine
//! - [`Room`] / [`Player`] — the per-session state
//! - [`RoomIdGenerator`] — human-shareable room codes
//! - [`RoomConfig`] — capacity and grace-period settings

mod config;
mod coordinator;
mod error;
mod idgen;
mod player;
mod registry;
mod room;

pub use config::RoomConfig;
pub use coordinator::TurnCoordinator;
pub use error::RoomError;
pub use idgen::RoomIdGenerator;
pub use player::{Player, PlayerSender};
pub use registry::SessionRegistry;
pub use room::Room;
