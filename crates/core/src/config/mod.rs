// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration modules

mod endpoint;
mod options;

pub use endpoint::{ConfigError, EndpointConfig};
pub use options::{ConnectionOptions, MessagingOptions, Timeouts};
