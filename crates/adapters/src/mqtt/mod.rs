// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! MQTT 3.1.1 adapter

mod adapter;
mod options;
mod transport;

pub use adapter::{MqttMessaging, PROTOCOL};
pub use options::{LastWill, MqttConnectOptions, QoS};
pub use transport::{Granted, MqttClient, MqttEvent, MqttEvents, MqttTransport};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{topic_matches, FakeMqttClient, FakeMqttTransport, MqttCall};
