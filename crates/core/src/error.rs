// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types shared by the façade and its adapters

use crate::subscription::{SubscriptionError, SubscriptionKind};
use std::time::Duration;
use thiserror::Error;

/// Errors reported by a transport (the wire-protocol client an adapter drives)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection refused: {0}")]
    ConnectionRefused(String),
    #[error("tls failure: {0}")]
    Tls(String),
    #[error("subscription rejected by broker: {0}")]
    SubscriptionRejected(String),
    #[error("link error: {0}")]
    Link(String),
    #[error("connection closed: {0}")]
    Closed(String),
    #[error("{0}")]
    Other(String),
}

/// Errors returned by `Messaging` operations and the factory
#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("{protocol} cannot subscribe to {kind} '{name}'")]
    UnsupportedKind {
        protocol: &'static str,
        kind: SubscriptionKind,
        name: String,
    },
    #[error("{protocol} does not support {operation}")]
    UnsupportedOperation {
        protocol: &'static str,
        operation: &'static str,
    },
    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),
    #[error("not connected")]
    NotConnected,
    #[error("no subscription named '{0}'")]
    UnknownSubscription(String),
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
    #[error("invalid subscription: {0}")]
    Subscription(#[from] SubscriptionError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}
