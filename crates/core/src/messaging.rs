// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The capability contract every protocol adapter implements

use crate::config::ConnectionOptions;
use crate::error::MessagingError;
use crate::events::EventBus;
use crate::subscription::{SubscriptionKind, SubscriptionRequest};
use async_trait::async_trait;
use std::fmt;

/// Uniform publish/subscribe contract over a concrete messaging protocol
///
/// Adapters emit `connected`, `subscribed`, `message` and `error` events on
/// the bus returned by [`Messaging::events`]. Handlers registered before
/// `connect` observe every event, including the first `connected`.
#[async_trait]
pub trait Messaging: Send + Sync {
    /// Protocol identifier, e.g. "AMQP"
    fn protocol(&self) -> &'static str;

    /// Kind given to subscriptions requested by bare name
    fn default_kind(&self) -> SubscriptionKind;

    /// The bus this adapter emits events on
    fn events(&self) -> &EventBus;

    /// Establish the connection. Resolves immediately when already connected.
    async fn connect(&self, credentials: &ConnectionOptions) -> Result<(), MessagingError>;

    /// Subscribe to a topic or queue; resolves once the broker confirms it
    async fn subscribe(&self, request: SubscriptionRequest) -> Result<(), MessagingError>;

    /// Cancel the subscription with the given name
    async fn unsubscribe(&self, name: &str) -> Result<(), MessagingError>;

    /// Publish a message; resolves once the broker acknowledges it
    async fn publish(&self, topic: &str, message: &[u8]) -> Result<(), MessagingError>;
}

impl fmt::Debug for dyn Messaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messaging")
            .field("protocol", &self.protocol())
            .finish_non_exhaustive()
    }
}
