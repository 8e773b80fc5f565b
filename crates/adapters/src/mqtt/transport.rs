// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boundary with the MQTT client library

use super::options::{MqttConnectOptions, QoS};
use async_trait::async_trait;
use bytes::Bytes;
use relay_core::TransportError;
use tokio::sync::mpsc;

/// Inbound traffic and state changes reported by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MqttEvent {
    Message { topic: String, payload: Bytes },
    Error(TransportError),
    /// Connection lost; the client may reconnect on its own
    Disconnected,
}

/// Client events, in the order the client observed them
pub type MqttEvents = mpsc::UnboundedReceiver<MqttEvent>;

/// One entry of a SUBACK
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Granted {
    pub topic: String,
    /// Granted level; `None` when the broker refused the filter
    pub qos: Option<QoS>,
}

/// Dials the broker
#[async_trait]
pub trait MqttTransport: Clone + Send + Sync + 'static {
    type Client: MqttClient;

    /// Resolves once the broker acknowledges CONNECT
    async fn connect(
        &self,
        options: &MqttConnectOptions,
    ) -> Result<(Self::Client, MqttEvents), TransportError>;
}

/// A client handle; survives disconnects
#[async_trait]
pub trait MqttClient: Send + Sync + 'static {
    fn is_connected(&self) -> bool;

    /// Re-dial with the options the handle was created with
    async fn reconnect(&self) -> Result<(), TransportError>;

    /// Resolves with the broker's SUBACK entries.
    ///
    /// Deliveries matching `filter` may be reported before this resolves.
    async fn subscribe(&self, filter: &str, qos: QoS) -> Result<Vec<Granted>, TransportError>;

    async fn unsubscribe(&self, filter: &str) -> Result<(), TransportError>;

    /// Resolves once the QoS handshake for `qos` completes
    async fn publish(
        &self,
        topic: &str,
        payload: Bytes,
        qos: QoS,
        retain: bool,
    ) -> Result<(), TransportError>;
}
