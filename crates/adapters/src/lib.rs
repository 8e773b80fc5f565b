// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Protocol adapters for the messaging façade

pub mod amqp;
mod deadline;
pub mod mqtt;
pub mod registry;
mod report;
pub mod traced;

pub use amqp::{AmqpMessaging, AmqpTransport, ControlSignal, ControlSignals};
pub use mqtt::{MqttConnectOptions, MqttMessaging, MqttTransport, QoS};
pub use registry::{register_amqp, register_mqtt};
pub use traced::TracedMessaging;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use amqp::{AmqpCall, FakeAmqpReceiver, FakeAmqpTransport};
#[cfg(any(test, feature = "test-support"))]
pub use mqtt::{FakeMqttTransport, MqttCall};
