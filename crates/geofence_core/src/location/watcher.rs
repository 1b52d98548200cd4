//! Single-subscription owner for continuous location updates.
//!
//! # Invariants
//! - At most one subscription is active at any time.
//! - Starting a new watch releases the previous handle first.
//! - Dropping the watcher releases its handle.

use super::error::LocationError;
use super::source::{
    LocationEvent, LocationOptions, LocationSource, Position, WatchHandle, WatchSubscription,
};
use std::sync::mpsc::TryRecvError;

/// Owns a location source and its one active watch.
pub struct LocationWatcher<S: LocationSource> {
    source: S,
    active: Option<WatchSubscription>,
}

impl<S: LocationSource> LocationWatcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            active: None,
        }
    }

    /// Starts watching, replacing any existing subscription.
    ///
    /// # Errors
    /// Returns the source error; no subscription is active afterwards.
    pub fn start(&mut self, options: &LocationOptions) -> Result<WatchHandle, LocationError> {
        self.stop();
        let subscription = self.source.watch(options)?;
        let handle = subscription.handle;
        self.active = Some(subscription);
        Ok(handle)
    }

    /// Releases the active subscription, if any.
    pub fn stop(&mut self) {
        if let Some(subscription) = self.active.take() {
            self.source.cancel(subscription.handle);
        }
    }

    pub fn active_handle(&self) -> Option<WatchHandle> {
        self.active.as_ref().map(|subscription| subscription.handle)
    }

    /// Returns the next queued event without blocking.
    pub fn try_next(&mut self) -> Option<LocationEvent> {
        let subscription = self.active.as_ref()?;
        match subscription.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.active = None;
                None
            }
        }
    }

    /// One-shot request through the owned source.
    pub fn current_position(
        &mut self,
        options: &LocationOptions,
    ) -> Result<Position, LocationError> {
        self.source.current_position(options)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: LocationSource> Drop for LocationWatcher<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
