//! Top-level server state: one registry, one coordinator, one supervisor.

use std::sync::Arc;

use atoll_room::{RoomConfig, SessionRegistry, TurnCoordinator};
use atoll_sweep::{SweepConfig, TimerSupervisor};
use tokio::task::JoinHandle;

/// Everything a connection handler needs, bundled for cheap cloning into
/// per-connection tasks.
///
/// The registry is the explicit owner of all session state; nothing in
/// atoll is process-global, so tests (and multi-tenant embeddings) can run
/// several contexts side by side.
#[derive(Clone)]
pub struct ServerContext {
    registry: Arc<SessionRegistry>,
    coordinator: TurnCoordinator,
}

impl ServerContext {
    /// A fresh context whose rooms all use `config`.
    pub fn new(config: RoomConfig) -> Self {
        let coordinator = TurnCoordinator::new(config.grace_period);
        Self {
            registry: Arc::new(SessionRegistry::new(config)),
            coordinator,
        }
    }

    /// The session registry.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// The turn coordinator. The same instance backs the event handler
    /// and the timer supervisor, so both apply identical advance rules.
    pub fn coordinator(&self) -> &TurnCoordinator {
        &self.coordinator
    }

    /// Starts the background deadline sweeper for this context's rooms.
    ///
    /// Call once at startup. The loop runs until the returned handle is
    /// aborted or the runtime shuts down.
    pub fn spawn_supervisor(&self, config: SweepConfig) -> JoinHandle<()> {
        TimerSupervisor::new(self.registry.clone(), self.coordinator.clone(), config)
            .spawn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_contexts_are_isolated() {
        let a = ServerContext::new(RoomConfig::default());
        let b = ServerContext::new(RoomConfig::default());

        a.registry().create_room().await;

        assert_eq!(a.registry().room_count().await, 1);
        assert_eq!(b.registry().room_count().await, 0);
    }

    #[tokio::test]
    async fn test_coordinator_uses_configured_grace_period() {
        let config = RoomConfig {
            grace_period: std::time::Duration::from_secs(30),
            ..RoomConfig::default()
        };
        let ctx = ServerContext::new(config);

        assert_eq!(
            ctx.coordinator().grace_period(),
            std::time::Duration::from_secs(30)
        );
    }
}
