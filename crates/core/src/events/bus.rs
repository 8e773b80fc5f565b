// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus for dispatching adapter events to handlers

use super::{EventKind, MessagingEvent};
use parking_lot::{ReentrantMutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by an event handler
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type HandlerResult = Result<(), HandlerError>;

type HandlerFn = dyn Fn(&MessagingEvent) -> HandlerResult + Send + Sync;

/// A registered callback
///
/// Clones share the same callback and count as the same handler for
/// registration purposes.
#[derive(Clone)]
pub struct Handler {
    callback: Arc<HandlerFn>,
}

impl Handler {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&MessagingEvent) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    pub fn call(&self, event: &MessagingEvent) -> HandlerResult {
        (self.callback)(event)
    }

    /// True when both handles refer to the same callback
    pub fn same_as(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("callback", &Arc::as_ptr(&self.callback))
            .finish()
    }
}

/// The event bus dispatches events to handlers registered for their kind
///
/// The registry is copy-on-write: `emit` dispatches from a snapshot, so
/// handlers may register further handlers while an emission is in progress.
/// Dispatch is serialized per bus; a handler emitting on the same bus from
/// inside its callback re-enters rather than deadlocks.
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<EventKind, Arc<Vec<Handler>>>>>,
    dispatch: Arc<ReentrantMutex<()>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            dispatch: Arc::new(ReentrantMutex::new(())),
        }
    }

    /// Register a handler for events of `kind`
    ///
    /// Returns false if this exact handler is already registered for `kind`.
    pub fn register(&self, kind: EventKind, handler: Handler) -> bool {
        let mut handlers = self.handlers.write();
        let current = handlers.entry(kind).or_default();

        if current.iter().any(|h| h.same_as(&handler)) {
            return false;
        }

        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(handler);
        *current = Arc::new(next);
        true
    }

    /// Invoke every handler registered for the event's kind, in registration order
    ///
    /// A failing handler is logged and does not stop delivery to the rest.
    /// Returns the number of handlers invoked.
    pub fn emit(&self, event: &MessagingEvent) -> usize {
        let kind = event.kind();
        let snapshot = self.handlers.read().get(&kind).cloned();

        let Some(snapshot) = snapshot else {
            tracing::trace!(event = %kind, "no handlers registered");
            return 0;
        };

        let _dispatching = self.dispatch.lock();
        for (index, handler) in snapshot.iter().enumerate() {
            if let Err(e) = handler.call(event) {
                tracing::warn!(event = %kind, handler = index, error = %e, "handler failed");
            }
        }

        snapshot.len()
    }

    /// Number of handlers registered for `kind`
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers
            .read()
            .get(&kind)
            .map_or(0, |handlers| handlers.len())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("connected", &self.handler_count(EventKind::Connected))
            .field("subscribed", &self.handler_count(EventKind::Subscribed))
            .field("message", &self.handler_count(EventKind::Message))
            .field("error", &self.handler_count(EventKind::Error))
            .finish()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
