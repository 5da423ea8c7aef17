//! # Atoll
//!
//! Session coordinator for turn-based multiplayer island simulations.
//!
//! Players run their island locally and meet here to share one world:
//! the coordinator groups them into rooms, relays their save states and
//! cross-island actions, and decides when the shared turn advances —
//! either because everyone finished, or because a grace deadline expired
//! on the stragglers.
//!
//! Atoll is transport-agnostic. A WebSocket (or any other) front end owns
//! the connections; it feeds inbound frames to [`handler::handle_frame`]
//! and drains each player's outbound channel back to the socket.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use atoll::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     atoll::init_tracing();
//!     let ctx = ServerContext::new(RoomConfig::default());
//!     let _supervisor = ctx.spawn_supervisor(SweepConfig::default());
//!     // accept connections, then per frame:
//!     // handler::handle_frame(&ctx, player_id, &sender, &frame).await?;
//! }
//! ```

mod context;
pub mod handler;

pub use context::ServerContext;

pub mod prelude {
    //! The common imports for wiring a transport onto the coordinator.

    pub use crate::ServerContext;
    pub use crate::handler::{handle_event, handle_frame};
    pub use atoll_protocol::{
        Action, ClientEvent, Codec, ErrorKind, JsonCodec, PlayerEntry, PlayerId,
        RoomId, SaveState, ServerEvent,
    };
    pub use atoll_room::{Player, PlayerSender, RoomConfig};
    pub use atoll_sweep::SweepConfig;
}

/// Installs the global `tracing` subscriber: fmt output filtered by
/// `RUST_LOG`, defaulting to `info`.
///
/// Safe to call when a subscriber is already installed (tests do this);
/// the second installation is simply ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}
