// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Surfacing transport errors that arrive outside any pending operation

use relay_core::{EventBus, MessagingEvent, TransportError};

/// Emit `error` on the bus; log it when nobody is listening
pub(crate) fn transport_error(bus: &EventBus, protocol: &'static str, error: TransportError) {
    let message = error.to_string();
    if bus.emit(&MessagingEvent::Error(error)) == 0 {
        tracing::error!(protocol, error = %message, "unhandled transport error");
    } else {
        tracing::warn!(protocol, error = %message, "transport error");
    }
}
