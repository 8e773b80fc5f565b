// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! relay-core: Protocol-agnostic publish/subscribe façade
//!
//! This crate provides:
//! - The typed event bus adapters emit `connected` / `subscribed` / `message` events on
//! - Subscription descriptors and normalization of shorthand inputs
//! - The `Messaging` capability contract every protocol adapter implements
//! - The `MessagingFactory` that constructs, wires and connects adapters
//! - Endpoint configuration (TOML)
//!
//! Protocol adapters live in `relay-adapters`.

pub mod config;
pub mod error;
pub mod events;
pub mod factory;
pub mod message;
pub mod messaging;
pub mod subscription;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::{ConfigError, ConnectionOptions, EndpointConfig, MessagingOptions, Timeouts};
pub use error::{MessagingError, TransportError};
pub use events::{EventBus, EventHandlers, EventKind, Handler, HandlerError, MessagingEvent};
pub use factory::{AdapterConstructor, MessagingFactory};
pub use message::MessageEnvelope;
pub use messaging::Messaging;
pub use subscription::{
    Subscription, SubscriptionError, SubscriptionKind, SubscriptionRequest, Subscriptions,
};
