//! Push-fed location source backed by std channels.
//!
//! Used by shells that receive positions from outside the process (stdin,
//! FFI callbacks) and by tests.

use super::error::LocationError;
use super::source::{
    LocationEvent, LocationOptions, LocationSource, Position, WatchHandle, WatchSubscription,
};
use log::{debug, warn};
use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{self, Sender};

/// Location source whose positions are pushed in by the owner.
#[derive(Debug, Default)]
pub struct ChannelLocationSource {
    unsupported: bool,
    next_handle: u64,
    subscribers: HashMap<WatchHandle, Sender<LocationEvent>>,
    one_shot: VecDeque<Result<Position, LocationError>>,
    last_position: Option<Position>,
}

impl ChannelLocationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source for hosts without any geolocation facility.
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    /// Queues the result returned by the next `current_position` call.
    pub fn queue_one_shot(&mut self, result: Result<Position, LocationError>) {
        self.one_shot.push_back(result);
    }

    /// Delivers an event to every active subscription.
    ///
    /// Returns how many subscriptions received it.
    pub fn push(&mut self, event: LocationEvent) -> usize {
        if let LocationEvent::Position(position) = event {
            self.last_position = Some(position);
        }

        let mut delivered = 0;
        self.subscribers.retain(|handle, sender| {
            if sender.send(event).is_ok() {
                delivered += 1;
                true
            } else {
                warn!(
                    "event=location_push module=location status=dropped handle={}",
                    handle.0
                );
                false
            }
        });
        delivered
    }

    pub fn active_subscriptions(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_active(&self, handle: WatchHandle) -> bool {
        self.subscribers.contains_key(&handle)
    }
}

impl LocationSource for ChannelLocationSource {
    fn current_position(&mut self, _options: &LocationOptions) -> Result<Position, LocationError> {
        if self.unsupported {
            return Err(LocationError::Unsupported);
        }
        match self.one_shot.pop_front() {
            Some(result) => {
                if let Ok(position) = result {
                    self.last_position = Some(position);
                }
                result
            }
            None => self.last_position.ok_or(LocationError::PositionUnavailable),
        }
    }

    fn watch(&mut self, _options: &LocationOptions) -> Result<WatchSubscription, LocationError> {
        if self.unsupported {
            return Err(LocationError::Unsupported);
        }
        self.next_handle += 1;
        let handle = WatchHandle(self.next_handle);
        let (sender, events) = mpsc::channel();
        self.subscribers.insert(handle, sender);
        debug!(
            "event=location_watch module=location status=started handle={}",
            handle.0
        );
        Ok(WatchSubscription { handle, events })
    }

    fn cancel(&mut self, handle: WatchHandle) {
        if self.subscribers.remove(&handle).is_some() {
            debug!(
                "event=location_watch module=location status=cancelled handle={}",
                handle.0
            );
        }
    }
}
