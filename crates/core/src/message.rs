// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound message envelope

use crate::subscription::Subscription;
use bytes::Bytes;

/// One inbound application message
///
/// The payload is a shared, reference-counted buffer: every handler sees the
/// same bytes and none of them owns it exclusively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEnvelope {
    pub subscription: Subscription,
    pub payload: Bytes,
}

impl MessageEnvelope {
    pub fn new(subscription: Subscription, payload: impl Into<Bytes>) -> Self {
        Self {
            subscription,
            payload: payload.into(),
        }
    }

    /// Payload as UTF-8 text, if it is valid UTF-8
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}
