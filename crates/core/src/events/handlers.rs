// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed handler slots, one per event kind

use super::{EventBus, EventKind, Handler, HandlerResult, MessagingEvent};
use crate::error::TransportError;
use crate::message::MessageEnvelope;
use crate::subscription::Subscription;
use std::fmt;

/// Caller-supplied handlers, at most one per event kind
///
/// Attaching is additive: handlers already on the bus are kept.
#[derive(Clone, Default)]
pub struct EventHandlers {
    connected: Option<Handler>,
    subscribed: Option<Handler>,
    message: Option<Handler>,
    error: Option<Handler>,
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_connected<F>(mut self, callback: F) -> Self
    where
        F: Fn() -> HandlerResult + Send + Sync + 'static,
    {
        self.connected = Some(Handler::new(move |event| match event {
            MessagingEvent::Connected => callback(),
            _ => Ok(()),
        }));
        self
    }

    pub fn on_subscribed<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Subscription) -> HandlerResult + Send + Sync + 'static,
    {
        self.subscribed = Some(Handler::new(move |event| match event {
            MessagingEvent::Subscribed(subscription) => callback(subscription),
            _ => Ok(()),
        }));
        self
    }

    pub fn on_message<F>(mut self, callback: F) -> Self
    where
        F: Fn(&MessageEnvelope) -> HandlerResult + Send + Sync + 'static,
    {
        self.message = Some(Handler::new(move |event| match event {
            MessagingEvent::Message(message) => callback(message),
            _ => Ok(()),
        }));
        self
    }

    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TransportError) -> HandlerResult + Send + Sync + 'static,
    {
        self.error = Some(Handler::new(move |event| match event {
            MessagingEvent::Error(error) => callback(error),
            _ => Ok(()),
        }));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.slots().next().is_none()
    }

    /// Register every filled slot on `bus`, returning how many were newly added
    pub fn attach(&self, bus: &EventBus) -> usize {
        let mut added = 0;
        for (kind, handler) in self.slots() {
            if bus.register(kind, handler.clone()) {
                added += 1;
            }
        }
        added
    }

    fn slots(&self) -> impl Iterator<Item = (EventKind, &Handler)> + '_ {
        [
            (EventKind::Connected, self.connected.as_ref()),
            (EventKind::Subscribed, self.subscribed.as_ref()),
            (EventKind::Message, self.message.as_ref()),
            (EventKind::Error, self.error.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, handler)| handler.map(|h| (kind, h)))
    }
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<String> = self.slots().map(|(kind, _)| kind.to_string()).collect();
        f.debug_struct("EventHandlers").field("kinds", &kinds).finish()
    }
}
