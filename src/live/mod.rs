//! Live stat aggregation from a replayed game feed.

pub mod aggregator;
pub mod connection;
pub mod deltas;
pub mod message;
pub mod replay;
pub mod resolver;
pub mod rules;
pub mod session;
pub mod websocket;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{AppliedStat, StatAggregator};
pub use connection::{Outbound, ReplayConnector, ReplayLink};
pub use deltas::{DeltaAnnotation, DeltaBoard, DELTA_DISPLAY_DURATION};
pub use message::{ControlMessage, GameEvent, InboundMessage, ServerStatus};
pub use replay::{ReplayPhase, ReplayState, DEFAULT_SPEED};
pub use session::{LiveSession, LiveSnapshot, LoadState, SessionCommand, SessionHandle};
pub use websocket::WebSocketConnector;
