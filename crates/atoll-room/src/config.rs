//! Room configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings applied to every room a registry creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Maximum players allowed in one room.
    pub max_players: usize,

    /// How long the remaining players get to finish once the first player
    /// has submitted their turn. After this the turn force-advances.
    pub grace_period: Duration,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_players: 7,
            grace_period: Duration::from_secs(180),
        }
    }
}
