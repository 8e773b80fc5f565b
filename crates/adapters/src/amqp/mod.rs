// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! AMQP 1.0 adapter

mod adapter;
mod control;
mod transport;

pub use adapter::{routing_address, AmqpMessaging, PROTOCOL, TOPIC_SCHEME};
pub use control::{ControlSignal, ControlSignals};
pub use transport::{
    AmqpConnectParams, AmqpConnection, AmqpReceiver, AmqpTransport, ConnectionEvent,
    ConnectionEvents, Deliveries, Durability, ExpiryPolicy, ReceiverOptions,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{AmqpCall, FakeAmqpConnection, FakeAmqpLink, FakeAmqpReceiver, FakeAmqpTransport};
