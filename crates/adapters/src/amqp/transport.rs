// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boundary with the AMQP 1.0 client library
//!
//! The adapter drives the wire protocol through these traits only. Framing,
//! TLS and link flow control belong to the implementation behind them.

use async_trait::async_trait;
use bytes::Bytes;
use relay_core::TransportError;
use std::fmt;
use tokio::sync::mpsc;

/// Parameters for opening a connection
#[derive(Clone, PartialEq, Eq)]
pub struct AmqpConnectParams {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Container id, fixed when the adapter is constructed
    pub container_id: String,
    /// Connection id, taken from the credentials passed to `connect`
    pub connection_id: String,
    pub tls: bool,
}

impl fmt::Debug for AmqpConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmqpConnectParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("container_id", &self.container_id)
            .field("connection_id", &self.connection_id)
            .field("tls", &self.tls)
            .finish()
    }
}

/// Terminus durability (AMQP 1.0 `terminus-durability`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    None = 0,
    Configuration = 1,
    UnsettledState = 2,
}

/// Terminus expiry policy (AMQP 1.0 `terminus-expiry-policy`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    LinkDetach,
    SessionEnd,
    ConnectionClose,
    Never,
}

/// Parameters for attaching a receiver link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverOptions {
    /// Link name; durable subscriptions are resumed by name
    pub name: String,
    /// Source address
    pub address: String,
    pub durable: Durability,
    pub expiry_policy: ExpiryPolicy,
}

/// Connection-level events the transport reports after the open handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Error(TransportError),
    Closed,
}

/// Connection-level events, in the order the transport observed them
pub type ConnectionEvents = mpsc::UnboundedReceiver<ConnectionEvent>;

/// Message bodies delivered on one receiver link; ends when the link is gone
pub type Deliveries = mpsc::UnboundedReceiver<Bytes>;

/// Opens connections (the "container")
#[async_trait]
pub trait AmqpTransport: Clone + Send + Sync + 'static {
    type Connection: AmqpConnection;

    /// Resolves once the peer confirms the connection is open
    async fn connect(
        &self,
        params: &AmqpConnectParams,
    ) -> Result<(Self::Connection, ConnectionEvents), TransportError>;
}

/// An open connection
#[async_trait]
pub trait AmqpConnection: Send + Sync + 'static {
    type Receiver: AmqpReceiver;

    /// Resolves once the peer confirms the receiver link is attached
    async fn open_receiver(
        &self,
        options: &ReceiverOptions,
    ) -> Result<(Self::Receiver, Deliveries), TransportError>;

    /// Send `body` to `target`; resolves once the peer settles the delivery
    async fn send(&self, target: &str, body: Bytes) -> Result<(), TransportError>;
}

/// An attached receiver link
#[async_trait]
pub trait AmqpReceiver: Send + Sync + 'static {
    /// Detach the link; a durable subscription keeps collecting messages
    async fn detach(&self) -> Result<(), TransportError>;

    /// Close the link, cancelling the subscription
    async fn close(&self) -> Result<(), TransportError>;
}
