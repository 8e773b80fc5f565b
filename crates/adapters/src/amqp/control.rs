// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Receiver control signals carried in message bodies
//!
//! Some deployments drive receivers in-band: a message whose body is a
//! control word detaches or closes the receiver instead of being delivered.

use std::fmt;
use std::sync::Arc;

/// What a control body asks the receiver to do
///
/// Only the receiver is affected; the connection and other receivers stay up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Detach the link; the durable subscription keeps queueing messages
    Detach,
    /// Close the link and cancel the subscription
    Close,
}

type Classifier = dyn Fn(&[u8]) -> Option<ControlSignal> + Send + Sync;

/// Decides which inbound bodies are control signals
#[derive(Clone)]
pub struct ControlSignals {
    classifier: Option<Arc<Classifier>>,
}

impl ControlSignals {
    /// Literal `detach` and `close` bodies
    pub fn literal() -> Self {
        Self::custom(|body| match body {
            b"detach" => Some(ControlSignal::Detach),
            b"close" => Some(ControlSignal::Close),
            _ => None,
        })
    }

    /// Every body is application data
    pub fn disabled() -> Self {
        Self { classifier: None }
    }

    pub fn custom<F>(classifier: F) -> Self
    where
        F: Fn(&[u8]) -> Option<ControlSignal> + Send + Sync + 'static,
    {
        Self {
            classifier: Some(Arc::new(classifier)),
        }
    }

    pub fn classify(&self, body: &[u8]) -> Option<ControlSignal> {
        self.classifier.as_ref().and_then(|classify| classify(body))
    }
}

impl Default for ControlSignals {
    fn default() -> Self {
        Self::literal()
    }
}

impl fmt::Debug for ControlSignals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlSignals")
            .field("enabled", &self.classifier.is_some())
            .finish()
    }
}
