// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced messaging wrapper for consistent observability

use async_trait::async_trait;
use relay_core::{
    ConnectionOptions, EventBus, Messaging, MessagingError, SubscriptionError, SubscriptionKind,
    SubscriptionRequest,
};
use std::time::Instant;
use tracing::Instrument;

/// Wrapper that adds spans and timing to any `Messaging` adapter
#[derive(Clone)]
pub struct TracedMessaging<M> {
    inner: M,
}

impl<M> TracedMessaging<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

#[async_trait]
impl<M: Messaging> Messaging for TracedMessaging<M> {
    fn protocol(&self) -> &'static str {
        self.inner.protocol()
    }

    fn default_kind(&self) -> SubscriptionKind {
        self.inner.default_kind()
    }

    fn events(&self) -> &EventBus {
        self.inner.events()
    }

    async fn connect(&self, credentials: &ConnectionOptions) -> Result<(), MessagingError> {
        let span = tracing::info_span!(
            "messaging.connect",
            protocol = self.inner.protocol(),
            host = %credentials.hostname,
            port = credentials.port,
        );

        async {
            tracing::info!("connecting");
            let start = Instant::now();
            let result = self.inner.connect(credentials).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "connect finished"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "connect failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn subscribe(&self, request: SubscriptionRequest) -> Result<(), MessagingError> {
        let span = tracing::info_span!(
            "messaging.subscribe",
            protocol = self.inner.protocol(),
            name = request.name(),
        );

        async {
            let start = Instant::now();
            let result = self.inner.subscribe(request).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "subscribe finished"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "subscribe failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn unsubscribe(&self, name: &str) -> Result<(), MessagingError> {
        let span = tracing::info_span!(
            "messaging.unsubscribe",
            protocol = self.inner.protocol(),
            name,
        );

        async {
            let result = self.inner.unsubscribe(name).await;
            // Unknown names are usually a caller bookkeeping slip, not a fault
            match &result {
                Ok(()) => tracing::info!("unsubscribed"),
                Err(e) => tracing::warn!(error = %e, "unsubscribe failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn publish(&self, topic: &str, message: &[u8]) -> Result<(), MessagingError> {
        let span = tracing::info_span!(
            "messaging.publish",
            protocol = self.inner.protocol(),
            topic,
        );

        async {
            // Precondition: the destination must be named
            if topic.is_empty() {
                tracing::error!("publish without a destination");
                return Err(SubscriptionError::EmptyName.into());
            }

            tracing::debug!(len = message.len(), "publishing");
            let result = self.inner.publish(topic, message).await;
            match &result {
                Ok(()) => tracing::debug!("published"),
                Err(e) => tracing::error!(error = %e, "publish failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
