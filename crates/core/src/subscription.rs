// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription descriptors and normalization
//!
//! Callers may name what they listen to in shorthand: a bare name, a list of
//! bare names, or full descriptors. Every shape normalizes to [`Subscription`]
//! using the default kind of the adapter servicing the request.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Errors from building a subscription descriptor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    #[error("subscription name must not be empty")]
    EmptyName,
}

/// Whether a subscription addresses a topic (fan-out) or a queue (point-to-point)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionKind {
    Topic,
    Queue,
}

impl fmt::Display for SubscriptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionKind::Topic => write!(f, "topic"),
            SubscriptionKind::Queue => write!(f, "queue"),
        }
    }
}

/// Normalized subscription identity
///
/// Echoed back unmodified in `subscribed` and `message` events so callers can
/// correlate them with the request that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    name: String,
    kind: SubscriptionKind,
}

impl Subscription {
    pub fn new(name: impl Into<String>, kind: SubscriptionKind) -> Result<Self, SubscriptionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SubscriptionError::EmptyName);
        }
        Ok(Self { name, kind })
    }

    pub fn topic(name: impl Into<String>) -> Result<Self, SubscriptionError> {
        Self::new(name, SubscriptionKind::Topic)
    }

    pub fn queue(name: impl Into<String>) -> Result<Self, SubscriptionError> {
        Self::new(name, SubscriptionKind::Queue)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SubscriptionKind {
        self.kind
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// What a caller asks to subscribe to, before normalization
///
/// A descriptor without a kind behaves like a bare name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SubscriptionRequest {
    Name(String),
    Descriptor {
        name: String,
        #[serde(default)]
        kind: Option<SubscriptionKind>,
    },
}

impl SubscriptionRequest {
    /// Resolve this request into a descriptor, applying `default` where no kind was given
    pub fn normalize(self, default: SubscriptionKind) -> Result<Subscription, SubscriptionError> {
        match self {
            SubscriptionRequest::Name(name) => Subscription::new(name, default),
            SubscriptionRequest::Descriptor { name, kind } => {
                Subscription::new(name, kind.unwrap_or(default))
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SubscriptionRequest::Name(name) => name,
            SubscriptionRequest::Descriptor { name, .. } => name,
        }
    }
}

impl From<&str> for SubscriptionRequest {
    fn from(name: &str) -> Self {
        SubscriptionRequest::Name(name.to_string())
    }
}

impl From<String> for SubscriptionRequest {
    fn from(name: String) -> Self {
        SubscriptionRequest::Name(name)
    }
}

impl From<Subscription> for SubscriptionRequest {
    fn from(subscription: Subscription) -> Self {
        SubscriptionRequest::Descriptor {
            name: subscription.name,
            kind: Some(subscription.kind),
        }
    }
}

impl From<&Subscription> for SubscriptionRequest {
    fn from(subscription: &Subscription) -> Self {
        subscription.clone().into()
    }
}

/// Configuration-level subscriptions: one bare name, or a list of requests
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Subscriptions {
    One(String),
    Many(Vec<SubscriptionRequest>),
}

impl Subscriptions {
    /// Normalize every entry, preserving order. A single name becomes a one-element list.
    pub fn normalize(&self, default: SubscriptionKind) -> Result<Vec<Subscription>, SubscriptionError> {
        self.requests()
            .into_iter()
            .map(|request| request.normalize(default))
            .collect()
    }

    pub fn requests(&self) -> Vec<SubscriptionRequest> {
        match self {
            Subscriptions::One(name) => vec![SubscriptionRequest::Name(name.clone())],
            Subscriptions::Many(requests) => requests.clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Subscriptions::One(_) => 1,
            Subscriptions::Many(requests) => requests.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for Subscriptions {
    fn from(name: &str) -> Self {
        Subscriptions::One(name.to_string())
    }
}

impl From<String> for Subscriptions {
    fn from(name: String) -> Self {
        Subscriptions::One(name)
    }
}

impl From<Vec<&str>> for Subscriptions {
    fn from(names: Vec<&str>) -> Self {
        Subscriptions::Many(names.into_iter().map(SubscriptionRequest::from).collect())
    }
}

impl From<Vec<String>> for Subscriptions {
    fn from(names: Vec<String>) -> Self {
        Subscriptions::Many(names.into_iter().map(SubscriptionRequest::from).collect())
    }
}

impl From<Vec<Subscription>> for Subscriptions {
    fn from(subscriptions: Vec<Subscription>) -> Self {
        Subscriptions::Many(
            subscriptions
                .into_iter()
                .map(SubscriptionRequest::from)
                .collect(),
        )
    }
}

impl From<Vec<SubscriptionRequest>> for Subscriptions {
    fn from(requests: Vec<SubscriptionRequest>) -> Self {
        Subscriptions::Many(requests)
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
