//! MQTT endpoint specs
//!
//! Verify topic subscriptions, queue rejection and delivery over MQTT.

use crate::prelude::*;
use similar_asserts::assert_eq;
use relay_adapters::MqttCall;

#[tokio::test]
async fn weather_reading_reaches_message_handler() {
    let brokers = Brokers::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let options = options()
        .with_subscriptions(vec!["weather"])
        .with_handlers(logging_handlers(&log));

    let _mqtt = brokers.factory.create("MQTT", &options).await.unwrap();
    assert!(brokers.mqtt.deliver("weather", "72F"));

    assert!(eventually(|| snapshot(&log).len() == 3).await);
    assert_eq!(
        snapshot(&log),
        vec![
            "connected".to_string(),
            "subscribed topic weather".to_string(),
            "message weather 72F".to_string(),
        ]
    );
}

#[tokio::test]
async fn queue_subscription_is_refused_before_the_wire() {
    let brokers = Brokers::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let options = options()
        .with_subscriptions(vec![Subscription::queue("tasks").unwrap()])
        .with_handlers(logging_handlers(&log));

    let err = brokers.factory.create("MQTT", &options).await.unwrap_err();

    assert!(matches!(
        err,
        MessagingError::UnsupportedKind {
            kind: SubscriptionKind::Queue,
            ..
        }
    ));
    assert_eq!(snapshot(&log), vec!["connected".to_string()]);
    assert!(!brokers
        .mqtt
        .calls()
        .iter()
        .any(|call| matches!(call, MqttCall::Subscribe { .. })));
}

#[tokio::test]
async fn bare_name_and_topic_descriptor_are_equivalent() {
    let brokers = Brokers::new();
    let mqtt = brokers.factory.create("mqtt", &options()).await.unwrap();
    let recorder = EventRecorder::new();
    recorder.attach(mqtt.events());

    mqtt.subscribe("weather".into()).await.unwrap();
    mqtt.subscribe(Subscription::topic("weather").unwrap().into())
        .await
        .unwrap();

    let subscribed = recorder.of_kind(EventKind::Subscribed);
    assert_eq!(subscribed.len(), 2);
    assert_eq!(subscribed[0], subscribed[1]);
}

#[tokio::test]
async fn published_message_comes_back_on_matching_filter() {
    let brokers = Brokers::new();
    let mqtt = brokers
        .factory
        .create("MQTT", &options().with_subscriptions("sensors/#"))
        .await
        .unwrap();
    let recorder = EventRecorder::new();
    recorder.attach(mqtt.events());

    mqtt.publish("sensors/kitchen/temp", b"21C").await.unwrap();

    assert!(recorder.wait_for(EventKind::Message, 1).await);
    assert_eq!(
        recorder.of_kind(EventKind::Message),
        vec![MessagingEvent::Message(MessageEnvelope::new(
            Subscription::topic("sensors/kitchen/temp").unwrap(),
            "21C"
        ))]
    );
}

#[tokio::test]
async fn dropped_connection_is_restored_on_connect() {
    let brokers = Brokers::new();
    let mqtt = brokers.factory.create("MQTT", &options()).await.unwrap();
    let recorder = EventRecorder::new();
    recorder.attach(mqtt.events());

    brokers.mqtt.disconnect();
    mqtt.connect(&connection()).await.unwrap();

    assert_eq!(brokers.mqtt.connection_count(), 1);
    assert_eq!(recorder.events(), vec![MessagingEvent::Connected]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn retained_reading_follows_subscribed_on_parallel_runtime() {
    for _ in 0..10 {
        let brokers = Brokers::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let options = options().with_handlers(logging_handlers(&log));
        let mqtt = brokers.factory.create("MQTT", &options).await.unwrap();

        let transport = brokers.mqtt.clone();
        let sender = std::thread::spawn(move || {
            let deadline = std::time::Instant::now() + std::time::Duration::from_secs(1);
            while std::time::Instant::now() < deadline {
                if transport.deliver("weather", "72F") {
                    return true;
                }
                std::hint::spin_loop();
            }
            false
        });

        mqtt.subscribe("weather".into()).await.unwrap();
        assert!(sender.join().unwrap());
        assert!(eventually(|| snapshot(&log).len() == 3).await);
        assert_eq!(
            snapshot(&log),
            vec![
                "connected".to_string(),
                "subscribed topic weather".to_string(),
                "message weather 72F".to_string(),
            ]
        );
    }
}
