// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Installs the built-in adapters into a [`MessagingFactory`]

use crate::amqp::{self, AmqpMessaging, AmqpTransport};
use crate::mqtt::{self, MqttMessaging, MqttTransport};
use crate::traced::TracedMessaging;
use relay_core::{Messaging, MessagingFactory};
use std::sync::Arc;

/// Register the AMQP adapter under `"AMQP"`, dialing through `transport`
pub fn register_amqp<T: AmqpTransport>(factory: &mut MessagingFactory, transport: T) {
    factory.register(amqp::PROTOCOL, move |options| {
        let adapter = AmqpMessaging::new(options, transport.clone());
        Ok(Arc::new(TracedMessaging::new(adapter)) as Arc<dyn Messaging>)
    });
}

/// Register the MQTT adapter under `"MQTT"`, dialing through `transport`
pub fn register_mqtt<T: MqttTransport>(factory: &mut MessagingFactory, transport: T) {
    factory.register(mqtt::PROTOCOL, move |options| {
        let adapter = MqttMessaging::new(options, transport.clone());
        Ok(Arc::new(TracedMessaging::new(adapter)) as Arc<dyn Messaging>)
    });
}
