//! Event delivery specs
//!
//! Verify when handlers observe events and how failures are contained.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn configured_handlers_see_first_connected() {
    let brokers = Brokers::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    let _amqp = brokers
        .factory
        .create("AMQP", &options().with_handlers(logging_handlers(&log)))
        .await
        .unwrap();

    assert_eq!(snapshot(&log), vec!["connected".to_string()]);
}

#[tokio::test]
async fn late_handlers_miss_past_events() {
    let brokers = Brokers::new();
    let mqtt = brokers
        .factory
        .create("MQTT", &options().with_subscriptions("weather"))
        .await
        .unwrap();

    let recorder = EventRecorder::new();
    recorder.attach(mqtt.events());
    mqtt.connect(&connection()).await.unwrap();

    assert!(recorder.events().is_empty());
}

#[tokio::test]
async fn failing_handler_does_not_starve_others() {
    let brokers = Brokers::new();
    let options = options()
        .with_subscriptions("weather")
        .with_handlers(
            EventHandlers::new().on_message(|_| Err(HandlerError::new("handler blew up"))),
        );
    let mqtt = brokers.factory.create("MQTT", &options).await.unwrap();
    let recorder = EventRecorder::new();
    recorder.attach(mqtt.events());

    brokers.mqtt.deliver("weather", "72F");
    brokers.mqtt.deliver("weather", "73F");

    assert!(recorder.wait_for(EventKind::Message, 2).await);
}

#[tokio::test]
async fn transport_errors_reach_error_handler() {
    let brokers = Brokers::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let _amqp = brokers
        .factory
        .create("AMQP", &options().with_handlers(logging_handlers(&log)))
        .await
        .unwrap();

    brokers
        .amqp
        .raise_error(TransportError::Link("credit exhausted".to_string()));

    assert!(eventually(|| snapshot(&log).len() == 2).await);
    assert_eq!(snapshot(&log)[1].as_str(), "error link error: credit exhausted");
}

#[tokio::test]
async fn subscribed_precedes_message_per_subscription() {
    let brokers = Brokers::new();
    let amqp = brokers.factory.create("AMQP", &options()).await.unwrap();
    let recorder = EventRecorder::new();
    recorder.attach(amqp.events());

    for name in ["a", "b", "c"] {
        amqp.subscribe(name.into()).await.unwrap();
        brokers.amqp.deliver(name, format!("to {}", name));
    }

    assert!(recorder.wait_for(EventKind::Message, 3).await);
    let events = recorder.events();
    for name in ["a", "b", "c"] {
        let subscription = Subscription::queue(name).unwrap();
        let subscribed = events
            .iter()
            .position(|e| *e == MessagingEvent::Subscribed(subscription.clone()))
            .unwrap();
        let message = events
            .iter()
            .position(|e| matches!(e, MessagingEvent::Message(m) if m.subscription == subscription))
            .unwrap();
        assert!(subscribed < message, "{} delivered before subscribed", name);
    }
}
