//! Endpoint configuration specs
//!
//! Verify endpoints loaded from TOML are built, connected and subscribed.

use crate::prelude::*;
use relay_adapters::AmqpCall;
use similar_asserts::assert_eq;
use std::io::Write;

const MQTT_ENDPOINT: &str = r#"
protocol = "mqtt"
hostname = "mr-broker.messaging.solace.cloud"
port = 8443
username = "solace-cloud-client"
password = "secret"
client_id = "raprincis"
subscriptions = ["try-me", "weather"]

[timeouts]
connect = "2s"
operation = "5s"
"#;

#[tokio::test]
async fn endpoint_file_builds_subscribed_adapter() {
    let brokers = Brokers::new();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(MQTT_ENDPOINT.as_bytes()).unwrap();

    let endpoint = EndpointConfig::load(file.path()).unwrap();
    let mqtt = brokers.factory.create_from_config(&endpoint).await.unwrap();

    assert_eq!(mqtt.protocol(), "MQTT");
    let mut filters = brokers.mqtt.filters();
    filters.sort();
    assert_eq!(filters, vec!["try-me".to_string(), "weather".to_string()]);
    let dialed = brokers.mqtt.last_options().unwrap();
    assert_eq!(dialed.url.as_str(), "wss://mr-broker.messaging.solace.cloud:8443");
    assert_eq!(dialed.connect_timeout, std::time::Duration::from_secs(2));
}

#[tokio::test]
async fn unknown_protocol_is_reported() {
    let brokers = Brokers::new();
    let endpoint = EndpointConfig::parse(&MQTT_ENDPOINT.replace("\"mqtt\"", "\"stomp\"")).unwrap();

    let err = brokers.factory.create_from_config(&endpoint).await.unwrap_err();

    assert!(matches!(err, MessagingError::UnknownProtocol(p) if p == "stomp"));
}

#[tokio::test]
async fn empty_subscription_name_fails_before_connecting() {
    let brokers = Brokers::new();
    let options = options().with_subscriptions(vec!["weather", ""]);

    let err = brokers.factory.create("MQTT", &options).await.unwrap_err();

    assert!(matches!(err, MessagingError::Subscription(_)));
    assert!(brokers.mqtt.calls().is_empty());
}

#[tokio::test]
async fn refused_subscription_fails_create_without_rollback() {
    let brokers = Brokers::new();
    brokers.mqtt.refuse_filter("secret");
    let options = options().with_subscriptions(vec!["weather", "secret"]);

    let err = brokers.factory.create("MQTT", &options).await.unwrap_err();

    assert!(matches!(
        err,
        MessagingError::Transport(TransportError::SubscriptionRejected(_))
    ));
    assert_eq!(brokers.mqtt.filters(), vec!["weather".to_string()]);
}

#[tokio::test]
async fn connect_failure_fails_create() {
    let brokers = Brokers::new();
    brokers
        .amqp
        .fail_connect(TransportError::ConnectionRefused("no route".to_string()));

    let err = brokers
        .factory
        .create("AMQP", &options().with_subscriptions("orders"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MessagingError::Transport(TransportError::ConnectionRefused(_))
    ));
    assert!(brokers.amqp.receiver("orders").is_none());
}

#[tokio::test]
async fn repeated_name_attaches_one_receiver() {
    let brokers = Brokers::new();
    brokers.amqp.set_attach_delay(std::time::Duration::from_millis(20));
    let log = Arc::new(Mutex::new(Vec::new()));
    let options = options()
        .with_subscriptions(vec!["orders", "orders"])
        .with_handlers(logging_handlers(&log));

    let amqp = brokers.factory.create("AMQP", &options).await.unwrap();
    assert!(brokers.amqp.deliver("orders", "order #1"));
    assert!(eventually(|| snapshot(&log).len() == 3).await);

    let attaches = brokers
        .amqp
        .calls()
        .into_iter()
        .filter(|call| matches!(call, AmqpCall::OpenReceiver { .. }))
        .count();
    assert_eq!(attaches, 1);
    assert_eq!(
        snapshot(&log),
        vec![
            "connected".to_string(),
            "subscribed queue orders".to_string(),
            "message orders order #1".to_string(),
        ]
    );

    amqp.unsubscribe("orders").await.unwrap();
    assert!(!brokers.amqp.deliver("orders", "order #2"));
}
