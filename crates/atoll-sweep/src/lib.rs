//! Periodic grace-deadline sweeper for Atoll rooms.
//!
//! Turn advances are normally driven by submissions, but a room whose
//! grace deadline expires while everyone is idle has no event to wake it.
//! The [`TimerSupervisor`] closes that gap: a single background task that
//! sweeps every room on a fixed cadence and asks the coordinator to
//! re-evaluate each one. Evaluation is a no-op unless a room's advance
//! condition actually holds, so the sweep is safe to run unconditionally.
//!
//! One supervisor serves the whole registry; it is not per-room.

use std::sync::Arc;

use atoll_room::{SessionRegistry, TurnCoordinator};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Supervisor settings.
///
/// The interval bounds how late a deadline-forced advance can fire: a room
/// whose deadline expires just after a sweep waits one full interval for
/// the next. The default 5 s is negligible against a 180 s grace period.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Time between sweeps.
    pub interval: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}

impl SweepConfig {
    /// Fix any unusable values so the config is safe to run with.
    ///
    /// Called automatically by [`TimerSupervisor::new`]. A zero interval
    /// would turn the sweep into a busy loop, so it falls back to the
    /// default.
    pub fn validated(mut self) -> Self {
        if self.interval.is_zero() {
            warn!("sweep interval is zero, falling back to default");
            self.interval = Self::default().interval;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Supervisor
// ---------------------------------------------------------------------------

/// Background task that periodically re-evaluates every room's turn.
pub struct TimerSupervisor {
    registry: Arc<SessionRegistry>,
    coordinator: TurnCoordinator,
    config: SweepConfig,
}

impl TimerSupervisor {
    /// A supervisor over the given registry.
    ///
    /// The coordinator must be the same one the event handler uses so
    /// both paths apply identical advance rules.
    pub fn new(
        registry: Arc<SessionRegistry>,
        coordinator: TurnCoordinator,
        config: SweepConfig,
    ) -> Self {
        Self {
            registry,
            coordinator,
            config: config.validated(),
        }
    }

    /// The effective (validated) configuration.
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Spawns the sweep loop onto the current runtime.
    ///
    /// The loop runs until the task is aborted or the runtime shuts down.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// The sweep loop. Prefer [`spawn`](Self::spawn); exposed for callers
    /// that want to drive it inside their own select loop.
    pub async fn run(self) {
        let mut interval = time::interval(self.config.interval);
        // A stalled sweep must not be followed by a catch-up burst.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!(interval_secs = self.config.interval.as_secs_f64(), "timer supervisor started");

        loop {
            interval.tick().await;
            self.sweep().await;
        }
    }

    /// Re-evaluates every room once. Returns how many rooms advanced.
    ///
    /// Works on a snapshot of the room list: rooms created after the
    /// snapshot are caught next sweep, and rooms destroyed since simply
    /// resolve to nothing.
    pub async fn sweep(&self) -> usize {
        let mut advanced = 0;
        for room_id in self.registry.room_ids().await {
            let Some(room) = self.registry.get_room(&room_id).await else {
                continue;
            };
            let mut room = room.lock().await;
            if self.coordinator.evaluate(&mut room) {
                advanced += 1;
            }
        }
        if advanced > 0 {
            debug!(advanced, "sweep forced turn advances");
        }
        advanced
    }
}
