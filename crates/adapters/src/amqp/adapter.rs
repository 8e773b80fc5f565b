// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! AMQP 1.0 messaging adapter
//!
//! Queues are addressed by name; topics by name behind the `topic://` scheme.
//! Every receiver is durable and never expires, so messages published while
//! it is detached wait at the broker.

use super::control::{ControlSignal, ControlSignals};
use super::transport::{
    AmqpConnectParams, AmqpConnection, AmqpReceiver, AmqpTransport, ConnectionEvent,
    ConnectionEvents, Deliveries, Durability, ExpiryPolicy, ReceiverOptions,
};
use crate::deadline::within;
use crate::report;
use async_trait::async_trait;
use bytes::Bytes;
use relay_core::{
    ConnectionOptions, EventBus, MessageEnvelope, Messaging, MessagingError, MessagingEvent,
    MessagingOptions, Subscription, SubscriptionKind, SubscriptionRequest, Timeouts,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const PROTOCOL: &str = "AMQP";

/// Address prefix that routes to a topic rather than a queue
pub const TOPIC_SCHEME: &str = "topic://";

type ReceiverOf<T> = <<T as AmqpTransport>::Connection as AmqpConnection>::Receiver;
type Slot<C> = Arc<tokio::sync::Mutex<Option<Arc<C>>>>;
type Receivers<R> = Arc<Mutex<HashMap<String, Arc<R>>>>;

/// Address a subscription resolves to at the broker
pub fn routing_address(subscription: &Subscription) -> String {
    match subscription.kind() {
        SubscriptionKind::Queue => subscription.name().to_string(),
        SubscriptionKind::Topic => format!("{}{}", TOPIC_SCHEME, subscription.name()),
    }
}

/// Messaging over an AMQP 1.0 broker
pub struct AmqpMessaging<T: AmqpTransport> {
    transport: T,
    container_id: String,
    bus: EventBus,
    control: ControlSignals,
    timeouts: Timeouts,
    connection: Slot<T::Connection>,
    receivers: Receivers<ReceiverOf<T>>,
    // Serializes receiver attach so a repeated name finds the first link
    attach: tokio::sync::Mutex<()>,
}

impl<T: AmqpTransport> AmqpMessaging<T> {
    pub fn new(options: &MessagingOptions, transport: T) -> Self {
        Self {
            transport,
            container_id: options.connection.client_id.clone(),
            bus: EventBus::new(),
            control: ControlSignals::default(),
            timeouts: options.timeouts,
            connection: Arc::new(tokio::sync::Mutex::new(None)),
            receivers: Arc::new(Mutex::new(HashMap::new())),
            attach: tokio::sync::Mutex::new(()),
        }
    }

    /// Replace the in-band control signal policy
    pub fn with_control_signals(mut self, control: ControlSignals) -> Self {
        self.control = control;
        self
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    /// Names of subscriptions with an attached receiver, sorted
    pub fn attached(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.receivers).keys().cloned().collect();
        names.sort();
        names
    }

    /// Publish to the address `subscription` routes to
    pub async fn publish_to(
        &self,
        subscription: &Subscription,
        message: &[u8],
    ) -> Result<(), MessagingError> {
        let address = routing_address(subscription);
        self.send(&address, Bytes::copy_from_slice(message)).await
    }

    async fn current_connection(&self) -> Result<Arc<T::Connection>, MessagingError> {
        self.connection
            .lock()
            .await
            .clone()
            .ok_or(MessagingError::NotConnected)
    }

    async fn send(&self, address: &str, body: Bytes) -> Result<(), MessagingError> {
        let connection = self.current_connection().await?;
        tracing::debug!(protocol = PROTOCOL, address, len = body.len(), "sending");
        within(
            "publish",
            self.timeouts.operation,
            connection.send(address, body),
        )
        .await
    }
}

#[async_trait]
impl<T: AmqpTransport> Messaging for AmqpMessaging<T> {
    fn protocol(&self) -> &'static str {
        PROTOCOL
    }

    fn default_kind(&self) -> SubscriptionKind {
        SubscriptionKind::Queue
    }

    fn events(&self) -> &EventBus {
        &self.bus
    }

    async fn connect(&self, credentials: &ConnectionOptions) -> Result<(), MessagingError> {
        // Held for the whole handshake: at most one dial in flight
        let mut slot = self.connection.lock().await;
        if slot.is_some() {
            tracing::debug!(protocol = PROTOCOL, "already connected");
            return Ok(());
        }

        let params = AmqpConnectParams {
            host: credentials.hostname.clone(),
            port: credentials.port,
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            container_id: self.container_id.clone(),
            connection_id: credentials.client_id.clone(),
            tls: true,
        };
        tracing::debug!(protocol = PROTOCOL, host = %params.host, port = params.port, "connecting");

        let (connection, events) = within(
            "connect",
            self.timeouts.connect,
            self.transport.connect(&params),
        )
        .await?;
        *slot = Some(Arc::new(connection));

        tokio::spawn(watch_connection(
            events,
            self.bus.clone(),
            Arc::clone(&self.connection),
            Arc::clone(&self.receivers),
        ));

        tracing::info!(protocol = PROTOCOL, host = %params.host, "connected");
        self.bus.emit(&MessagingEvent::Connected);
        Ok(())
    }

    async fn subscribe(&self, request: SubscriptionRequest) -> Result<(), MessagingError> {
        let subscription = request.normalize(SubscriptionKind::Queue)?;
        let connection = self.current_connection().await?;

        let _attaching = self.attach.lock().await;
        if lock(&self.receivers).contains_key(subscription.name()) {
            tracing::debug!(protocol = PROTOCOL, %subscription, "receiver already attached");
            return Ok(());
        }

        let options = ReceiverOptions {
            name: subscription.name().to_string(),
            address: routing_address(&subscription),
            durable: Durability::UnsettledState,
            expiry_policy: ExpiryPolicy::Never,
        };
        let (receiver, deliveries) = within(
            "subscribe",
            self.timeouts.operation,
            connection.open_receiver(&options),
        )
        .await?;

        let receiver = Arc::new(receiver);
        lock(&self.receivers).insert(subscription.name().to_string(), Arc::clone(&receiver));
        tracing::info!(protocol = PROTOCOL, %subscription, address = %options.address, "subscribed");

        // Forwarding starts only after `subscribed` went out
        self.bus.emit(&MessagingEvent::Subscribed(subscription.clone()));
        tokio::spawn(forward_deliveries(Forwarder {
            subscription,
            receiver,
            deliveries,
            bus: self.bus.clone(),
            control: self.control.clone(),
            receivers: Arc::clone(&self.receivers),
        }));
        Ok(())
    }

    async fn unsubscribe(&self, name: &str) -> Result<(), MessagingError> {
        let receiver = lock(&self.receivers)
            .remove(name)
            .ok_or_else(|| MessagingError::UnknownSubscription(name.to_string()))?;

        within("unsubscribe", self.timeouts.operation, receiver.close()).await?;
        tracing::info!(protocol = PROTOCOL, name, "unsubscribed");
        Ok(())
    }

    async fn publish(&self, topic: &str, message: &[u8]) -> Result<(), MessagingError> {
        let target = SubscriptionRequest::from(topic).normalize(SubscriptionKind::Queue)?;
        self.publish_to(&target, message).await
    }
}

fn lock<R>(receivers: &Receivers<R>) -> std::sync::MutexGuard<'_, HashMap<String, Arc<R>>> {
    receivers.lock().unwrap_or_else(|e| e.into_inner())
}

/// Drop `name` from the table if it still maps to `receiver`
fn forget<R>(receivers: &Receivers<R>, name: &str, receiver: &Arc<R>) {
    let mut receivers = lock(receivers);
    if receivers
        .get(name)
        .is_some_and(|current| Arc::ptr_eq(current, receiver))
    {
        receivers.remove(name);
    }
}

async fn watch_connection<C, R>(
    mut events: ConnectionEvents,
    bus: EventBus,
    connection: Slot<C>,
    receivers: Receivers<R>,
) {
    while let Some(event) = events.recv().await {
        match event {
            ConnectionEvent::Error(error) => report::transport_error(&bus, PROTOCOL, error),
            ConnectionEvent::Closed => break,
        }
    }

    tracing::info!(protocol = PROTOCOL, "connection closed");
    connection.lock().await.take();
    lock(&receivers).clear();
}

struct Forwarder<R> {
    subscription: Subscription,
    receiver: Arc<R>,
    deliveries: Deliveries,
    bus: EventBus,
    control: ControlSignals,
    receivers: Receivers<R>,
}

async fn forward_deliveries<R: AmqpReceiver>(mut forwarder: Forwarder<R>) {
    let name = forwarder.subscription.name().to_string();

    while let Some(body) = forwarder.deliveries.recv().await {
        let Some(signal) = forwarder.control.classify(&body) else {
            forwarder.bus.emit(&MessagingEvent::Message(MessageEnvelope::new(
                forwarder.subscription.clone(),
                body,
            )));
            continue;
        };

        forget(&forwarder.receivers, &name, &forwarder.receiver);
        let result = match signal {
            ControlSignal::Detach => forwarder.receiver.detach().await,
            ControlSignal::Close => forwarder.receiver.close().await,
        };
        match result {
            Ok(()) => tracing::info!(protocol = PROTOCOL, name = %name, ?signal, "control signal applied"),
            Err(e) => report::transport_error(&forwarder.bus, PROTOCOL, e),
        }
        return;
    }

    tracing::debug!(protocol = PROTOCOL, name = %name, "delivery stream ended");
    forget(&forwarder.receivers, &name, &forwarder.receiver);
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
