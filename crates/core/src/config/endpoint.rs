// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Endpoint configuration files
//!
//! An endpoint names its protocol next to the messaging options:
//!
//! ```toml
//! protocol = "MQTT"
//! hostname = "broker.example.com"
//! port = 8443
//! username = "solace-cloud-client"
//! password = "secret"
//! client_id = "raprincis"
//! subscriptions = ["try-me"]
//!
//! [timeouts]
//! connect = "10s"
//! ```

use super::MessagingOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading an endpoint configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid endpoint configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A logical endpoint: which protocol services it, and how to reach it
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    /// Protocol identifier registered with the factory, e.g. "AMQP" or "MQTT"
    pub protocol: String,
    #[serde(flatten)]
    pub options: MessagingOptions,
}

impl EndpointConfig {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod tests;
