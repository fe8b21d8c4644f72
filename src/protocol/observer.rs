use crate::protocol::phase::PingPhase;
use uuid::Uuid;

/// One state transition of a ping attempt, delivered to the host surface
/// (UI, CLI) so it can render progress without participating in the
/// protocol itself.
#[derive(Debug, Clone)]
pub struct PingUpdate {
    pub attempt_id: Uuid,
    pub phase: PingPhase,
}

/// Subscriber for attempt state transitions. A plain callback contract, not
/// a queue: updates are delivered inline, in order, on the attempt's task.
pub trait ProtocolObserver: Send + Sync {
    fn on_update(&self, update: PingUpdate);
}

/// Discards every update.
pub struct NoopObserver;

impl ProtocolObserver for NoopObserver {
    fn on_update(&self, _update: PingUpdate) {}
}
