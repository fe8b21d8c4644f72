pub mod coordinator;
pub mod observer;
pub mod phase;

pub use coordinator::{PingCoordinator, ProtocolSettings};
pub use observer::{NoopObserver, PingUpdate, ProtocolObserver};
pub use phase::PingPhase;
