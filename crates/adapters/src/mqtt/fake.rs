// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory MQTT transport for testing
//!
//! Publishes are echoed to every active filter they match, the way a broker
//! echoes to a client subscribed to its own topic.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::options::{MqttConnectOptions, QoS};
use super::transport::{Granted, MqttClient, MqttEvent, MqttEvents, MqttTransport};
use async_trait::async_trait;
use bytes::Bytes;
use relay_core::TransportError;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;

/// Recorded client call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MqttCall {
    Connect {
        url: String,
        client_id: String,
    },
    Reconnect,
    Subscribe {
        filter: String,
        qos: QoS,
    },
    Unsubscribe {
        filter: String,
    },
    Publish {
        topic: String,
        payload: Bytes,
        qos: QoS,
        retain: bool,
    },
}

#[derive(Default)]
struct FakeState {
    calls: Vec<MqttCall>,
    connections: u32,
    connected: bool,
    connect_delay: Option<Duration>,
    connect_error: Option<TransportError>,
    subscribe_error: Option<TransportError>,
    refused: HashSet<String>,
    filters: Vec<String>,
    events: Option<mpsc::UnboundedSender<MqttEvent>>,
    last_options: Option<MqttConnectOptions>,
}

impl FakeState {
    fn deliver(&self, topic: &str, payload: Bytes) -> bool {
        let Some(tx) = &self.events else {
            return false;
        };
        if !self.connected || !self.filters.iter().any(|f| topic_matches(f, topic)) {
            return false;
        }
        tx.send(MqttEvent::Message {
            topic: topic.to_string(),
            payload,
        })
        .is_ok()
    }
}

type Shared = Arc<Mutex<FakeState>>;

fn lock(state: &Shared) -> MutexGuard<'_, FakeState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// MQTT topic filter matching with `+` and `#` wildcards
pub fn topic_matches(filter: &str, topic: &str) -> bool {
    let mut levels = topic.split('/');
    for part in filter.split('/') {
        match (part, levels.next()) {
            ("#", _) => return true,
            ("+", Some(_)) => {}
            (expected, Some(level)) if expected == level => {}
            _ => return false,
        }
    }
    levels.next().is_none()
}

/// Fake MQTT transport for testing
#[derive(Clone, Default)]
pub struct FakeMqttTransport {
    state: Shared,
}

impl FakeMqttTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<MqttCall> {
        lock(&self.state).calls.clone()
    }

    /// Number of successful dials (reconnects excluded)
    pub fn connection_count(&self) -> u32 {
        lock(&self.state).connections
    }

    /// Options passed to the most recent dial
    pub fn last_options(&self) -> Option<MqttConnectOptions> {
        lock(&self.state).last_options.clone()
    }

    /// Active subscription filters
    pub fn filters(&self) -> Vec<String> {
        lock(&self.state).filters.clone()
    }

    /// Topics and payloads published through the client
    pub fn published(&self) -> Vec<(String, Bytes)> {
        lock(&self.state)
            .calls
            .iter()
            .filter_map(|call| match call {
                MqttCall::Publish { topic, payload, .. } => Some((topic.clone(), payload.clone())),
                _ => None,
            })
            .collect()
    }

    /// Delay every dial by `delay`
    pub fn set_connect_delay(&self, delay: Duration) {
        lock(&self.state).connect_delay = Some(delay);
    }

    /// Fail the next dial or reconnect
    pub fn fail_connect(&self, error: TransportError) {
        lock(&self.state).connect_error = Some(error);
    }

    /// Fail the next subscribe outright
    pub fn fail_subscribe(&self, error: TransportError) {
        lock(&self.state).subscribe_error = Some(error);
    }

    /// Answer subscribes to `filter` with the SUBACK failure code
    pub fn refuse_filter(&self, filter: &str) {
        lock(&self.state).refused.insert(filter.to_string());
    }

    /// Drop the connection, keeping the client handle
    pub fn disconnect(&self) {
        let mut state = lock(&self.state);
        state.connected = false;
        if let Some(tx) = &state.events {
            let _ = tx.send(MqttEvent::Disconnected);
        }
    }

    /// Deliver a message on `topic` if an active filter matches it
    pub fn deliver(&self, topic: &str, payload: impl Into<Bytes>) -> bool {
        lock(&self.state).deliver(topic, payload.into())
    }

    /// Report a client error
    pub fn raise_error(&self, error: TransportError) -> bool {
        match &lock(&self.state).events {
            Some(tx) => tx.send(MqttEvent::Error(error)).is_ok(),
            None => false,
        }
    }
}

#[async_trait]
impl MqttTransport for FakeMqttTransport {
    type Client = FakeMqttClient;

    async fn connect(
        &self,
        options: &MqttConnectOptions,
    ) -> Result<(FakeMqttClient, MqttEvents), TransportError> {
        let delay = {
            let mut state = lock(&self.state);
            state.calls.push(MqttCall::Connect {
                url: options.url.clone(),
                client_id: options.client_id.clone(),
            });
            state.connect_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = lock(&self.state);
        if let Some(error) = state.connect_error.take() {
            return Err(error);
        }
        let (tx, rx) = mpsc::unbounded_channel();
        state.events = Some(tx);
        state.connected = true;
        state.connections += 1;
        state.last_options = Some(options.clone());

        Ok((
            FakeMqttClient {
                state: Arc::clone(&self.state),
            },
            rx,
        ))
    }
}

/// Client handed out by [`FakeMqttTransport`]
pub struct FakeMqttClient {
    state: Shared,
}

#[async_trait]
impl MqttClient for FakeMqttClient {
    fn is_connected(&self) -> bool {
        lock(&self.state).connected
    }

    async fn reconnect(&self) -> Result<(), TransportError> {
        let mut state = lock(&self.state);
        state.calls.push(MqttCall::Reconnect);
        if let Some(error) = state.connect_error.take() {
            return Err(error);
        }
        state.connected = true;
        Ok(())
    }

    async fn subscribe(&self, filter: &str, qos: QoS) -> Result<Vec<Granted>, TransportError> {
        let mut state = lock(&self.state);
        state.calls.push(MqttCall::Subscribe {
            filter: filter.to_string(),
            qos,
        });
        if let Some(error) = state.subscribe_error.take() {
            return Err(error);
        }
        if !state.connected {
            return Err(TransportError::Closed("client disconnected".to_string()));
        }

        if state.refused.contains(filter) {
            return Ok(vec![Granted {
                topic: filter.to_string(),
                qos: None,
            }]);
        }
        if !state.filters.iter().any(|f| f == filter) {
            state.filters.push(filter.to_string());
        }
        Ok(vec![Granted {
            topic: filter.to_string(),
            qos: Some(qos),
        }])
    }

    async fn unsubscribe(&self, filter: &str) -> Result<(), TransportError> {
        let mut state = lock(&self.state);
        state.calls.push(MqttCall::Unsubscribe {
            filter: filter.to_string(),
        });
        state.filters.retain(|f| f != filter);
        Ok(())
    }

    async fn publish(
        &self,
        topic: &str,
        payload: Bytes,
        qos: QoS,
        retain: bool,
    ) -> Result<(), TransportError> {
        let mut state = lock(&self.state);
        state.calls.push(MqttCall::Publish {
            topic: topic.to_string(),
            payload: payload.clone(),
            qos,
            retain,
        });
        if !state.connected {
            return Err(TransportError::Closed("client disconnected".to_string()));
        }
        state.deliver(topic, payload);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
