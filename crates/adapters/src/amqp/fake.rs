// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory AMQP transport for testing
//!
//! Sends are looped back to live receivers whose source address matches the
//! target, so a single fake behaves like a tiny broker.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::transport::{
    AmqpConnectParams, AmqpConnection, AmqpReceiver, AmqpTransport, ConnectionEvent,
    ConnectionEvents, Deliveries, ReceiverOptions,
};
use async_trait::async_trait;
use bytes::Bytes;
use relay_core::TransportError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;

/// Recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmqpCall {
    Connect {
        host: String,
        port: u16,
        container_id: String,
        connection_id: String,
    },
    OpenReceiver {
        name: String,
        address: String,
    },
    Send {
        target: String,
        body: Bytes,
    },
    Detach {
        name: String,
    },
    Close {
        name: String,
    },
}

/// Fake receiver link state
#[derive(Debug, Clone)]
pub struct FakeAmqpReceiver {
    pub options: ReceiverOptions,
    pub detached: bool,
    pub closed: bool,
}

impl FakeAmqpReceiver {
    fn is_live(&self) -> bool {
        !self.detached && !self.closed
    }
}

#[derive(Default)]
struct FakeState {
    calls: Vec<AmqpCall>,
    connections: u32,
    connect_delay: Option<Duration>,
    attach_delay: Option<Duration>,
    connect_error: Option<TransportError>,
    receiver_errors: HashMap<String, TransportError>,
    send_error: Option<TransportError>,
    receivers: HashMap<String, FakeAmqpReceiver>,
    deliveries: HashMap<String, mpsc::UnboundedSender<Bytes>>,
    events: Option<mpsc::UnboundedSender<ConnectionEvent>>,
}

type Shared = Arc<Mutex<FakeState>>;

fn lock(state: &Shared) -> MutexGuard<'_, FakeState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Fake AMQP transport for testing
#[derive(Clone, Default)]
pub struct FakeAmqpTransport {
    state: Shared,
}

impl FakeAmqpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<AmqpCall> {
        lock(&self.state).calls.clone()
    }

    /// Number of successful connection opens
    pub fn connection_count(&self) -> u32 {
        lock(&self.state).connections
    }

    /// Get a receiver by link name
    pub fn receiver(&self, name: &str) -> Option<FakeAmqpReceiver> {
        lock(&self.state).receivers.get(name).cloned()
    }

    /// Bodies sent, with their target address
    pub fn sent(&self) -> Vec<(String, Bytes)> {
        lock(&self.state)
            .calls
            .iter()
            .filter_map(|call| match call {
                AmqpCall::Send { target, body } => Some((target.clone(), body.clone())),
                _ => None,
            })
            .collect()
    }

    /// Delay every connection open by `delay`
    pub fn set_connect_delay(&self, delay: Duration) {
        lock(&self.state).connect_delay = Some(delay);
    }

    /// Delay every receiver attach by `delay`
    pub fn set_attach_delay(&self, delay: Duration) {
        lock(&self.state).attach_delay = Some(delay);
    }

    /// Fail the next connection open
    pub fn fail_connect(&self, error: TransportError) {
        lock(&self.state).connect_error = Some(error);
    }

    /// Fail the next receiver attach on `address`
    pub fn fail_receiver(&self, address: &str, error: TransportError) {
        lock(&self.state)
            .receiver_errors
            .insert(address.to_string(), error);
    }

    /// Fail the next send
    pub fn fail_send(&self, error: TransportError) {
        lock(&self.state).send_error = Some(error);
    }

    /// Deliver `body` on the live receiver named `name`
    pub fn deliver(&self, name: &str, body: impl Into<Bytes>) -> bool {
        let state = lock(&self.state);
        match state.deliveries.get(name) {
            Some(tx) => tx.send(body.into()).is_ok(),
            None => false,
        }
    }

    /// Report a connection-level error
    pub fn raise_error(&self, error: TransportError) -> bool {
        match &lock(&self.state).events {
            Some(tx) => tx.send(ConnectionEvent::Error(error)).is_ok(),
            None => false,
        }
    }

    /// Simulate the peer closing the connection
    pub fn close_connection(&self) {
        let mut state = lock(&self.state);
        if let Some(tx) = state.events.take() {
            let _ = tx.send(ConnectionEvent::Closed);
        }
        state.deliveries.clear();
        for receiver in state.receivers.values_mut() {
            receiver.closed = true;
        }
    }
}

#[async_trait]
impl AmqpTransport for FakeAmqpTransport {
    type Connection = FakeAmqpConnection;

    async fn connect(
        &self,
        params: &AmqpConnectParams,
    ) -> Result<(FakeAmqpConnection, ConnectionEvents), TransportError> {
        let delay = {
            let mut state = lock(&self.state);
            state.calls.push(AmqpCall::Connect {
                host: params.host.clone(),
                port: params.port,
                container_id: params.container_id.clone(),
                connection_id: params.connection_id.clone(),
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
        state.connections += 1;

        Ok((
            FakeAmqpConnection {
                state: Arc::clone(&self.state),
            },
            rx,
        ))
    }
}

/// Connection handed out by [`FakeAmqpTransport`]
pub struct FakeAmqpConnection {
    state: Shared,
}

#[async_trait]
impl AmqpConnection for FakeAmqpConnection {
    type Receiver = FakeAmqpLink;

    async fn open_receiver(
        &self,
        options: &ReceiverOptions,
    ) -> Result<(FakeAmqpLink, Deliveries), TransportError> {
        let delay = {
            let mut state = lock(&self.state);
            state.calls.push(AmqpCall::OpenReceiver {
                name: options.name.clone(),
                address: options.address.clone(),
            });
            state.attach_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = lock(&self.state);
        if let Some(error) = state.receiver_errors.remove(&options.address) {
            return Err(error);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        state.deliveries.insert(options.name.clone(), tx);
        state.receivers.insert(
            options.name.clone(),
            FakeAmqpReceiver {
                options: options.clone(),
                detached: false,
                closed: false,
            },
        );

        Ok((
            FakeAmqpLink {
                name: options.name.clone(),
                state: Arc::clone(&self.state),
            },
            rx,
        ))
    }

    async fn send(&self, target: &str, body: Bytes) -> Result<(), TransportError> {
        let mut state = lock(&self.state);
        state.calls.push(AmqpCall::Send {
            target: target.to_string(),
            body: body.clone(),
        });
        if let Some(error) = state.send_error.take() {
            return Err(error);
        }

        let state = &*state;
        for (name, receiver) in &state.receivers {
            if receiver.is_live() && receiver.options.address == target {
                if let Some(tx) = state.deliveries.get(name) {
                    let _ = tx.send(body.clone());
                }
            }
        }
        Ok(())
    }
}

/// Receiver link handed out by [`FakeAmqpConnection`]
pub struct FakeAmqpLink {
    name: String,
    state: Shared,
}

#[async_trait]
impl AmqpReceiver for FakeAmqpLink {
    async fn detach(&self) -> Result<(), TransportError> {
        let mut state = lock(&self.state);
        state.calls.push(AmqpCall::Detach {
            name: self.name.clone(),
        });
        state.deliveries.remove(&self.name);
        if let Some(receiver) = state.receivers.get_mut(&self.name) {
            receiver.detached = true;
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        let mut state = lock(&self.state);
        state.calls.push(AmqpCall::Close {
            name: self.name.clone(),
        });
        state.deliveries.remove(&self.name);
        if let Some(receiver) = state.receivers.get_mut(&self.name) {
            receiver.closed = true;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
