// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events emitted by messaging adapters
//!
//! This module provides:
//! - `MessagingEvent` - The fixed set of events every adapter emits
//! - `EventBus` - Synchronous, ordered dispatch of events to registered handlers
//! - `EventHandlers` - Typed per-event handler slots, used by configuration

mod bus;
mod handlers;

pub use bus::{EventBus, Handler, HandlerError, HandlerResult};
pub use handlers::EventHandlers;

use crate::error::TransportError;
use crate::message::MessageEnvelope;
use crate::subscription::Subscription;
use std::fmt;

/// Discriminant of a [`MessagingEvent`], used as the registration key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connected,
    Subscribed,
    Message,
    Error,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Connected => "connected",
            EventKind::Subscribed => "subscribed",
            EventKind::Message => "message",
            EventKind::Error => "error",
        };
        f.write_str(name)
    }
}

/// Events an adapter emits over the lifetime of its connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagingEvent {
    /// The connection handshake completed
    Connected,
    /// The broker confirmed a subscription
    Subscribed(Subscription),
    /// An application message arrived on a subscription
    Message(MessageEnvelope),
    /// The transport reported an error outside of any pending operation
    Error(TransportError),
}

impl MessagingEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            MessagingEvent::Connected => EventKind::Connected,
            MessagingEvent::Subscribed(_) => EventKind::Subscribed,
            MessagingEvent::Message(_) => EventKind::Message,
            MessagingEvent::Error(_) => EventKind::Error,
        }
    }
}
