//! Stateless pub-sub hooks for marketplace events.
//!
//! Components can subscribe to moderation and purchase events and react to them (send a push message, update an
//! external feed, and so on). Handlers only receive the event payload; they have no access to engine internals, but
//! they may be async.

mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
