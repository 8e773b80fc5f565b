// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! MQTT client parameters

use bytes::Bytes;
use relay_core::{MessagingOptions, Timeouts};
use std::fmt;
use std::time::Duration;

/// Delivery guarantee for a subscription or publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum QoS {
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

impl QoS {
    /// Decode a SUBACK return code; `None` for the failure code (0x80)
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(QoS::AtMostOnce),
            1 => Some(QoS::AtLeastOnce),
            2 => Some(QoS::ExactlyOnce),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Message the broker publishes on our behalf if we vanish without a DISCONNECT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastWill {
    pub topic: String,
    pub payload: Bytes,
    pub qos: QoS,
    pub retain: bool,
}

impl Default for LastWill {
    fn default() -> Self {
        Self {
            topic: "WillMsg".to_string(),
            payload: Bytes::from_static(b"Connection Closed abnormally..!"),
            qos: QoS::AtMostOnce,
            retain: false,
        }
    }
}

/// Everything the transport needs to dial the broker
#[derive(Clone, PartialEq, Eq)]
pub struct MqttConnectOptions {
    /// Broker URL, `wss://host:port`
    pub url: String,
    pub client_id: String,
    pub username: String,
    pub password: String,
    pub keep_alive: Duration,
    pub clean_session: bool,
    /// Delay between automatic reconnect attempts
    pub reconnect_period: Duration,
    pub connect_timeout: Duration,
    /// Protocol identifier sent in CONNECT
    pub protocol_name: &'static str,
    /// 4 is MQTT 3.1.1
    pub protocol_version: u8,
    pub last_will: LastWill,
    /// Verify the broker certificate chain
    pub reject_unauthorized: bool,
}

impl MqttConnectOptions {
    pub const KEEP_ALIVE: Duration = Duration::from_secs(10);
    pub const RECONNECT_PERIOD: Duration = Duration::from_secs(1);

    pub fn from_options(options: &MessagingOptions) -> Self {
        let connection = &options.connection;
        Self {
            url: format!("wss://{}:{}", connection.hostname, connection.port),
            client_id: connection.client_id.clone(),
            username: connection.username.clone(),
            password: connection.password.clone(),
            keep_alive: Self::KEEP_ALIVE,
            clean_session: true,
            reconnect_period: Self::RECONNECT_PERIOD,
            connect_timeout: options
                .timeouts
                .connect
                .unwrap_or(Timeouts::DEFAULT_CONNECT),
            protocol_name: "MQTT",
            protocol_version: 4,
            last_will: LastWill::default(),
            reject_unauthorized: false,
        }
    }
}

impl fmt::Debug for MqttConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MqttConnectOptions")
            .field("url", &self.url)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("keep_alive", &self.keep_alive)
            .field("clean_session", &self.clean_session)
            .field("reconnect_period", &self.reconnect_period)
            .field("connect_timeout", &self.connect_timeout)
            .field("protocol_version", &self.protocol_version)
            .field("last_will", &self.last_will)
            .field("reject_unauthorized", &self.reject_unauthorized)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::ConnectionOptions;

    fn options() -> MessagingOptions {
        MessagingOptions::new(ConnectionOptions::new(
            "broker.local",
            8884,
            "user",
            "hunter2",
            "sensor-7",
        ))
    }

    #[test]
    fn built_from_messaging_options() {
        let mqtt = MqttConnectOptions::from_options(&options());

        assert_eq!(mqtt.url, "wss://broker.local:8884");
        assert_eq!(mqtt.client_id, "sensor-7");
        assert_eq!(mqtt.keep_alive, Duration::from_secs(10));
        assert_eq!(mqtt.reconnect_period, Duration::from_secs(1));
        assert_eq!(mqtt.connect_timeout, Duration::from_secs(10));
        assert_eq!(mqtt.protocol_version, 4);
        assert!(mqtt.clean_session);
        assert!(!mqtt.reject_unauthorized);
    }

    #[test]
    fn last_will_defaults() {
        let will = MqttConnectOptions::from_options(&options()).last_will;

        assert_eq!(will.topic, "WillMsg");
        assert_eq!(&will.payload[..], b"Connection Closed abnormally..!");
        assert_eq!(will.qos, QoS::AtMostOnce);
        assert!(!will.retain);
    }

    #[test]
    fn connect_timeout_follows_timeouts() {
        let custom = options().with_timeouts(Timeouts {
            connect: Some(Duration::from_secs(3)),
            operation: None,
        });
        let unbounded = options().with_timeouts(Timeouts::none());

        assert_eq!(
            MqttConnectOptions::from_options(&custom).connect_timeout,
            Duration::from_secs(3)
        );
        assert_eq!(
            MqttConnectOptions::from_options(&unbounded).connect_timeout,
            Timeouts::DEFAULT_CONNECT
        );
    }

    #[test]
    fn debug_redacts_password() {
        let debug = format!("{:?}", MqttConnectOptions::from_options(&options()));

        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn suback_codes() {
        assert_eq!(QoS::from_code(2), Some(QoS::ExactlyOnce));
        assert_eq!(QoS::from_code(0x80), None);
        assert_eq!(QoS::AtLeastOnce.code(), 1);
    }
}
