//! Location capability consumed by the proximity flow.
//!
//! # Responsibility
//! - Model one-shot and continuous position delivery as explicit events.
//! - Map host error codes to distinct, user-facing error kinds.
//! - Guarantee at most one active watch subscription per watcher.
//!
//! # Invariants
//! - Events from a subscription are consumed one at a time in arrival order.
//! - Cancellation is an explicit handle release.

pub mod channel;
pub mod error;
pub mod source;
pub mod watcher;

pub use channel::ChannelLocationSource;
pub use error::LocationError;
pub use source::{
    LocationEvent, LocationOptions, LocationSource, Position, WatchHandle, WatchSubscription,
};
pub use watcher::LocationWatcher;
