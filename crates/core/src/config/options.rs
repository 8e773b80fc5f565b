// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection and messaging options

use crate::events::EventHandlers;
use crate::subscription::Subscriptions;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Broker address and credentials
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionOptions {
    /// Broker hostname
    pub hostname: String,
    /// Broker port
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Unique id the broker recognizes this client by
    #[serde(alias = "clientId", default = "generated_client_id")]
    pub client_id: String,
}

impl ConnectionOptions {
    pub fn new(
        hostname: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            username: username.into(),
            password: password.into(),
            client_id: client_id.into(),
        }
    }
}

impl fmt::Debug for ConnectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionOptions")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("client_id", &self.client_id)
            .finish()
    }
}

fn generated_client_id() -> String {
    format!("relay-{}", uuid::Uuid::new_v4().simple())
}

/// Upper bounds for operations that wait on the broker
///
/// `None` waits indefinitely. Callers may also cancel any operation by
/// dropping its future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Bound on the connect handshake
    #[serde(with = "humantime_serde")]
    pub connect: Option<Duration>,
    /// Bound on subscribe, unsubscribe and publish acknowledgments
    #[serde(with = "humantime_serde")]
    pub operation: Option<Duration>,
}

impl Timeouts {
    pub const DEFAULT_CONNECT: Duration = Duration::from_secs(10);
    pub const DEFAULT_OPERATION: Duration = Duration::from_secs(30);

    /// No bounds at all
    pub fn none() -> Self {
        Self {
            connect: None,
            operation: None,
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Some(Self::DEFAULT_CONNECT),
            operation: Some(Self::DEFAULT_OPERATION),
        }
    }
}

/// Everything needed to build, connect and subscribe one adapter
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingOptions {
    #[serde(flatten)]
    pub connection: ConnectionOptions,
    /// Predefined topic/queue subscriptions
    #[serde(default)]
    pub subscriptions: Option<Subscriptions>,
    #[serde(default)]
    pub timeouts: Timeouts,
    /// Predefined event handlers; code-only
    #[serde(skip)]
    pub handlers: EventHandlers,
}

impl MessagingOptions {
    pub fn new(connection: ConnectionOptions) -> Self {
        Self {
            connection,
            subscriptions: None,
            timeouts: Timeouts::default(),
            handlers: EventHandlers::default(),
        }
    }

    pub fn with_subscriptions(mut self, subscriptions: impl Into<Subscriptions>) -> Self {
        self.subscriptions = Some(subscriptions.into());
        self
    }

    pub fn with_handlers(mut self, handlers: EventHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
