//! AMQP endpoint specs
//!
//! Verify durable queue and topic receivers, control signals and publishing.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn close_signal_closes_receiver_without_delivery() {
    let brokers = Brokers::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let options = options()
        .with_subscriptions(vec![Subscription::queue("orders").unwrap()])
        .with_handlers(logging_handlers(&log));

    let _amqp = brokers.factory.create("AMQP", &options).await.unwrap();
    assert!(brokers.amqp.deliver("orders", "close"));

    assert!(eventually(|| brokers.amqp.receiver("orders").is_some_and(|r| r.closed)).await);
    assert_eq!(
        snapshot(&log),
        vec![
            "connected".to_string(),
            "subscribed queue orders".to_string(),
        ]
    );
}

#[tokio::test]
async fn bare_names_are_durable_queues() {
    let brokers = Brokers::new();
    let options = options().with_subscriptions(vec!["orders", "audit"]);

    let _amqp = brokers.factory.create("AMQP", &options).await.unwrap();

    for name in ["orders", "audit"] {
        let receiver = brokers.amqp.receiver(name).unwrap();
        assert_eq!(receiver.options.address.as_str(), name);
        assert!(!receiver.detached);
    }
}

#[tokio::test]
async fn topic_descriptor_routes_through_topic_scheme() {
    let brokers = Brokers::new();
    let options = options().with_subscriptions(vec![Subscription::topic("alerts").unwrap()]);

    let _amqp = brokers.factory.create("AMQP", &options).await.unwrap();

    assert_eq!(
        brokers.amqp.receiver("alerts").unwrap().options.address.as_str(),
        "topic://alerts"
    );
}

#[tokio::test]
async fn detached_receiver_can_be_resumed() {
    let brokers = Brokers::new();
    let amqp = brokers
        .factory
        .create("AMQP", &options().with_subscriptions("orders"))
        .await
        .unwrap();
    let recorder = EventRecorder::new();
    recorder.attach(amqp.events());

    brokers.amqp.deliver("orders", "detach");
    assert!(eventually(|| brokers.amqp.receiver("orders").is_some_and(|r| r.detached)).await);

    amqp.subscribe("orders".into()).await.unwrap();
    brokers.amqp.deliver("orders", "after resume");

    assert!(recorder.wait_for(EventKind::Message, 1).await);
    assert_eq!(
        recorder.events(),
        vec![
            MessagingEvent::Subscribed(Subscription::queue("orders").unwrap()),
            MessagingEvent::Message(MessageEnvelope::new(
                Subscription::queue("orders").unwrap(),
                "after resume"
            )),
        ]
    );
}

#[tokio::test]
async fn publish_to_queue_is_received() {
    let brokers = Brokers::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let options = options()
        .with_subscriptions("orders")
        .with_handlers(logging_handlers(&log));
    let amqp = brokers.factory.create("AMQP", &options).await.unwrap();

    amqp.publish("orders", b"order #1").await.unwrap();

    assert!(eventually(|| snapshot(&log).len() == 3).await);
    assert_eq!(snapshot(&log)[2].as_str(), "message orders order #1");
}

#[tokio::test]
async fn unsubscribe_unknown_name_is_an_error() {
    let brokers = Brokers::new();
    let amqp = brokers.factory.create("AMQP", &options()).await.unwrap();

    let err = amqp.unsubscribe("never-subscribed").await.unwrap_err();

    assert!(matches!(err, MessagingError::UnknownSubscription(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn queued_message_follows_subscribed_on_parallel_runtime() {
    for _ in 0..10 {
        let brokers = Brokers::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let options = options().with_handlers(logging_handlers(&log));
        let amqp = brokers.factory.create("AMQP", &options).await.unwrap();

        let transport = brokers.amqp.clone();
        let sender = std::thread::spawn(move || {
            let deadline = std::time::Instant::now() + std::time::Duration::from_secs(1);
            while std::time::Instant::now() < deadline {
                if transport.deliver("orders", "order #1") {
                    return true;
                }
                std::hint::spin_loop();
            }
            false
        });

        amqp.subscribe("orders".into()).await.unwrap();
        assert!(sender.join().unwrap());
        assert!(eventually(|| snapshot(&log).len() == 3).await);
        assert_eq!(
            snapshot(&log),
            vec![
                "connected".to_string(),
                "subscribed queue orders".to_string(),
                "message orders order #1".to_string(),
            ]
        );
    }
}
