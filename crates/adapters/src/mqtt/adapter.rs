// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! MQTT 3.1.1 messaging adapter
//!
//! MQTT has no queues: every subscription is a topic filter, and queue
//! descriptors are refused up front.

use super::options::{MqttConnectOptions, QoS};
use super::transport::{MqttClient, MqttEvent, MqttEvents, MqttTransport};
use crate::deadline::within;
use crate::report;
use async_trait::async_trait;
use bytes::Bytes;
use relay_core::{
    ConnectionOptions, EventBus, MessageEnvelope, Messaging, MessagingError, MessagingEvent,
    MessagingOptions, Subscription, SubscriptionKind, SubscriptionRequest, Timeouts,
    TransportError,
};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const PROTOCOL: &str = "MQTT";

/// Messaging over an MQTT broker
pub struct MqttMessaging<T: MqttTransport> {
    transport: T,
    connect_options: MqttConnectOptions,
    bus: EventBus,
    qos: QoS,
    timeouts: Timeouts,
    client: Mutex<Option<Arc<T::Client>>>,
    // Held by `subscribe` until `subscribed` is out; inbound dispatch waits on it
    delivery_gate: Arc<Mutex<()>>,
}

impl<T: MqttTransport> MqttMessaging<T> {
    pub fn new(options: &MessagingOptions, transport: T) -> Self {
        Self {
            transport,
            connect_options: MqttConnectOptions::from_options(options),
            bus: EventBus::new(),
            qos: QoS::ExactlyOnce,
            timeouts: options.timeouts,
            client: Mutex::new(None),
            delivery_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Override the level used for subscribe and publish
    pub fn with_qos(mut self, qos: QoS) -> Self {
        self.qos = qos;
        self
    }

    pub fn connect_options(&self) -> &MqttConnectOptions {
        &self.connect_options
    }

    pub async fn is_connected(&self) -> bool {
        self.client
            .lock()
            .await
            .as_ref()
            .is_some_and(|client| client.is_connected())
    }

    /// Connected client handle, dialing or re-dialing as needed
    async fn ensure_connected(&self) -> Result<Arc<T::Client>, MessagingError> {
        let mut slot = self.client.lock().await;

        if let Some(client) = slot.as_ref() {
            if client.is_connected() {
                return Ok(Arc::clone(client));
            }
            tracing::debug!(protocol = PROTOCOL, url = %self.connect_options.url, "reconnecting");
            within("connect", self.timeouts.connect, client.reconnect()).await?;
            tracing::info!(protocol = PROTOCOL, url = %self.connect_options.url, "reconnected");
            self.bus.emit(&MessagingEvent::Connected);
            return Ok(Arc::clone(client));
        }

        tracing::debug!(protocol = PROTOCOL, url = %self.connect_options.url, "connecting");
        let (client, events) = within(
            "connect",
            self.timeouts.connect,
            self.transport.connect(&self.connect_options),
        )
        .await?;
        let client = Arc::new(client);
        *slot = Some(Arc::clone(&client));

        tokio::spawn(dispatch_inbound(
            events,
            self.bus.clone(),
            Arc::clone(&self.delivery_gate),
        ));

        tracing::info!(protocol = PROTOCOL, url = %self.connect_options.url, "connected");
        self.bus.emit(&MessagingEvent::Connected);
        Ok(client)
    }

    async fn current_client(&self) -> Result<Arc<T::Client>, MessagingError> {
        self.client
            .lock()
            .await
            .clone()
            .ok_or(MessagingError::NotConnected)
    }
}

#[async_trait]
impl<T: MqttTransport> Messaging for MqttMessaging<T> {
    fn protocol(&self) -> &'static str {
        PROTOCOL
    }

    fn default_kind(&self) -> SubscriptionKind {
        SubscriptionKind::Topic
    }

    fn events(&self) -> &EventBus {
        &self.bus
    }

    /// Credentials are fixed at construction; `credentials` is not consulted
    async fn connect(&self, credentials: &ConnectionOptions) -> Result<(), MessagingError> {
        if credentials.client_id != self.connect_options.client_id {
            tracing::debug!(
                protocol = PROTOCOL,
                client_id = %self.connect_options.client_id,
                "ignoring per-call client id"
            );
        }
        self.ensure_connected().await.map(|_| ())
    }

    async fn subscribe(&self, request: SubscriptionRequest) -> Result<(), MessagingError> {
        let subscription = request.normalize(SubscriptionKind::Topic)?;
        if subscription.kind() == SubscriptionKind::Queue {
            return Err(MessagingError::UnsupportedKind {
                protocol: PROTOCOL,
                kind: subscription.kind(),
                name: subscription.name().to_string(),
            });
        }

        let client = self.ensure_connected().await?;

        // The filter is live once the broker acks; hold deliveries until `subscribed` is out
        let _gate = self.delivery_gate.lock().await;
        let granted = within(
            "subscribe",
            self.timeouts.operation,
            client.subscribe(subscription.name(), self.qos),
        )
        .await?;

        if let Some(refused) = granted.iter().find(|grant| grant.qos.is_none()) {
            tracing::warn!(protocol = PROTOCOL, topic = %refused.topic, "subscription refused");
            return Err(TransportError::SubscriptionRejected(refused.topic.clone()).into());
        }

        for grant in granted {
            let topic = Subscription::topic(grant.topic).unwrap_or_else(|_| subscription.clone());
            tracing::info!(protocol = PROTOCOL, subscription = %topic, qos = ?grant.qos, "subscribed");
            self.bus.emit(&MessagingEvent::Subscribed(topic));
        }
        Ok(())
    }

    async fn unsubscribe(&self, name: &str) -> Result<(), MessagingError> {
        let client = self.current_client().await?;
        within("unsubscribe", self.timeouts.operation, client.unsubscribe(name)).await?;
        tracing::info!(protocol = PROTOCOL, name, "unsubscribed");
        Ok(())
    }

    async fn publish(&self, topic: &str, message: &[u8]) -> Result<(), MessagingError> {
        let client = self.current_client().await?;
        tracing::debug!(protocol = PROTOCOL, topic, len = message.len(), "publishing");
        within(
            "publish",
            self.timeouts.operation,
            client.publish(topic, Bytes::copy_from_slice(message), self.qos, false),
        )
        .await
    }
}

async fn dispatch_inbound(mut events: MqttEvents, bus: EventBus, gate: Arc<Mutex<()>>) {
    while let Some(event) = events.recv().await {
        match event {
            MqttEvent::Message { topic, payload } => match Subscription::topic(topic) {
                Ok(subscription) => {
                    let _gate = gate.lock().await;
                    bus.emit(&MessagingEvent::Message(MessageEnvelope::new(
                        subscription,
                        payload,
                    )));
                }
                Err(e) => tracing::warn!(protocol = PROTOCOL, error = %e, "dropping delivery"),
            },
            MqttEvent::Error(error) => report::transport_error(&bus, PROTOCOL, error),
            MqttEvent::Disconnected => tracing::info!(protocol = PROTOCOL, "disconnected"),
        }
    }
    tracing::debug!(protocol = PROTOCOL, "client event stream ended");
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
