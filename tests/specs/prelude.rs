//! Shared harness for messaging specs

pub use relay_adapters::{register_amqp, register_mqtt, FakeAmqpTransport, FakeMqttTransport};
pub use relay_core::testing::{eventually, EventRecorder};
pub use relay_core::{
    ConnectionOptions, EndpointConfig, EventHandlers, EventKind, HandlerError, MessageEnvelope,
    Messaging, MessagingError, MessagingEvent, MessagingFactory, MessagingOptions, Subscription,
    SubscriptionKind, TransportError,
};
pub use std::sync::{Arc, Mutex};

/// A factory wired to fake brokers for both built-in protocols
pub struct Brokers {
    pub factory: MessagingFactory,
    pub amqp: FakeAmqpTransport,
    pub mqtt: FakeMqttTransport,
}

impl Brokers {
    pub fn new() -> Self {
        let amqp = FakeAmqpTransport::new();
        let mqtt = FakeMqttTransport::new();
        let mut factory = MessagingFactory::new();
        register_amqp(&mut factory, amqp.clone());
        register_mqtt(&mut factory, mqtt.clone());
        Self {
            factory,
            amqp,
            mqtt,
        }
    }
}

pub fn connection() -> ConnectionOptions {
    ConnectionOptions::new(
        "mr-broker.messaging.solace.cloud",
        8443,
        "solace-cloud-client",
        "secret",
        "raprincis",
    )
}

pub fn options() -> MessagingOptions {
    MessagingOptions::new(connection())
}

/// Handlers that push a short description of every event into `log`
pub fn logging_handlers(log: &Arc<Mutex<Vec<String>>>) -> EventHandlers {
    let connected = Arc::clone(log);
    let subscribed = Arc::clone(log);
    let message = Arc::clone(log);
    let error = Arc::clone(log);
    EventHandlers::new()
        .on_connected(move || {
            connected.lock().unwrap().push("connected".to_string());
            Ok(())
        })
        .on_subscribed(move |subscription| {
            subscribed
                .lock()
                .unwrap()
                .push(format!("subscribed {}", subscription));
            Ok(())
        })
        .on_message(move |envelope| {
            message.lock().unwrap().push(format!(
                "message {} {}",
                envelope.subscription.name(),
                envelope.payload_str().unwrap_or("<binary>")
            ));
            Ok(())
        })
        .on_error(move |e| {
            error.lock().unwrap().push(format!("error {}", e));
            Ok(())
        })
}

pub fn snapshot(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    log.lock().unwrap().clone()
}
