// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounding transport round trips by the configured timeouts

use relay_core::{MessagingError, TransportError};
use std::future::Future;
use std::time::Duration;

/// Await `fut`, failing with `MessagingError::Timeout` once `limit` elapses
pub(crate) async fn within<T, F>(
    operation: &'static str,
    limit: Option<Duration>,
    fut: F,
) -> Result<T, MessagingError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    let Some(limit) = limit else {
        return Ok(fut.await?);
    };

    match tokio::time::timeout(limit, fut).await {
        Ok(result) => Ok(result?),
        Err(_) => {
            tracing::warn!(operation, limit_ms = limit.as_millis() as u64, "timed out");
            Err(MessagingError::Timeout {
                operation,
                after: limit,
            })
        }
    }
}
