// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Messaging factory: builds, wires, connects and subscribes adapters
//!
//! Protocols are looked up in a registration table, so adding a protocol
//! means registering a constructor, not changing the factory.

use crate::config::{EndpointConfig, MessagingOptions};
use crate::error::MessagingError;
use crate::messaging::Messaging;
use futures::future::try_join_all;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

/// Builds a configured-but-disconnected adapter from options
pub type AdapterConstructor =
    Arc<dyn Fn(&MessagingOptions) -> Result<Arc<dyn Messaging>, MessagingError> + Send + Sync>;

/// Registration table from protocol identifier to adapter constructor
#[derive(Clone, Default)]
pub struct MessagingFactory {
    constructors: HashMap<String, AdapterConstructor>,
}

impl MessagingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the constructor for `protocol`
    ///
    /// Identifiers are case-insensitive.
    pub fn register<F>(&mut self, protocol: &str, constructor: F) -> &mut Self
    where
        F: Fn(&MessagingOptions) -> Result<Arc<dyn Messaging>, MessagingError>
            + Send
            + Sync
            + 'static,
    {
        let key = protocol_key(protocol);
        if self
            .constructors
            .insert(key.clone(), Arc::new(constructor))
            .is_some()
        {
            tracing::debug!(protocol = %key, "replaced adapter constructor");
        }
        self
    }

    pub fn supports(&self, protocol: &str) -> bool {
        self.constructors.contains_key(&protocol_key(protocol))
    }

    /// Registered protocol identifiers, sorted
    pub fn protocols(&self) -> Vec<String> {
        let mut protocols: Vec<String> = self.constructors.keys().cloned().collect();
        protocols.sort();
        protocols
    }

    /// Construct the adapter for `protocol`, attach handlers, connect, then subscribe
    ///
    /// Handlers from `options.handlers` are attached before any network I/O so
    /// the first `connected` event is observed. Configured subscriptions are
    /// issued concurrently; the first rejection fails the whole call and
    /// subscriptions already established are left in place.
    pub async fn create(
        &self,
        protocol: &str,
        options: &MessagingOptions,
    ) -> Result<Arc<dyn Messaging>, MessagingError> {
        let key = protocol_key(protocol);
        let constructor = self
            .constructors
            .get(&key)
            .ok_or_else(|| MessagingError::UnknownProtocol(protocol.to_string()))?;

        let span = tracing::info_span!(
            "messaging.create",
            protocol = %key,
            host = %options.connection.hostname,
            port = options.connection.port,
        );

        async move {
            let adapter = constructor(options)?;
            let attached = options.handlers.attach(adapter.events());

            // Invalid names fail here, before anything touches the network
            let subscriptions = match &options.subscriptions {
                Some(subscriptions) => subscriptions.normalize(adapter.default_kind())?,
                None => Vec::new(),
            };
            tracing::debug!(
                handlers = attached,
                subscriptions = subscriptions.len(),
                "adapter constructed"
            );

            adapter.connect(&options.connection).await?;

            if !subscriptions.is_empty() {
                try_join_all(
                    subscriptions
                        .into_iter()
                        .map(|subscription| adapter.subscribe(subscription.into())),
                )
                .await?;
            }

            tracing::info!("adapter ready");
            Ok::<_, MessagingError>(adapter)
        }
        .instrument(span)
        .await
    }

    /// Like [`MessagingFactory::create`], with the protocol named by the endpoint
    pub async fn create_from_config(
        &self,
        endpoint: &EndpointConfig,
    ) -> Result<Arc<dyn Messaging>, MessagingError> {
        self.create(&endpoint.protocol, &endpoint.options).await
    }
}

impl fmt::Debug for MessagingFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessagingFactory")
            .field("protocols", &self.protocols())
            .finish()
    }
}

fn protocol_key(protocol: &str) -> String {
    protocol.trim().to_ascii_uppercase()
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
