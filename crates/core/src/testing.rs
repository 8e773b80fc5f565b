// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test helpers for observing adapter events
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::events::{EventBus, EventKind, Handler, MessagingEvent};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records every event emitted on the buses it is attached to
#[derive(Clone)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<MessagingEvent>>>,
    handler: Handler,
}

impl EventRecorder {
    pub fn new() -> Self {
        let events: Arc<Mutex<Vec<MessagingEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let handler = Handler::new(move |event| {
            sink.lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(event.clone());
            Ok(())
        });
        Self { events, handler }
    }

    /// Register for every event kind on `bus`
    pub fn attach(&self, bus: &EventBus) {
        for kind in [
            EventKind::Connected,
            EventKind::Subscribed,
            EventKind::Message,
            EventKind::Error,
        ] {
            bus.register(kind, self.handler.clone());
        }
    }

    /// The handler, for registering on selected kinds only
    pub fn handler(&self) -> Handler {
        self.handler.clone()
    }

    /// All recorded events, in emission order
    pub fn events(&self) -> Vec<MessagingEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Recorded events of one kind
    pub fn of_kind(&self, kind: EventKind) -> Vec<MessagingEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.kind() == kind)
            .collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.of_kind(kind).len()
    }

    /// Wait until at least `n` events of `kind` were recorded
    pub async fn wait_for(&self, kind: EventKind, n: usize) -> bool {
        eventually(|| self.count(kind) >= n).await
    }
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Poll `condition` until it holds, giving up after one second
pub async fn eventually<F>(condition: F) -> bool
where
    F: Fn() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
