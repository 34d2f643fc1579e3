//! tests/api/helpers.rs

use fedex_notify::configuration::{get_configuration, ApiEnvironment, FedexSettings};
use fedex_notify::domain::{OrderId, TrackingNumber};
use fedex_notify::startup::build_with_store;
use fedex_notify::telemetry::{get_subscriber, init_subscriber};
use fedex_notify::tracking::{InMemoryTrackingStore, PersistOrdering, TrackingStore};
use once_cell::sync::Lazy;
use secrecy::Secret;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    // Set TEST_LOG=true to see logs during tests
    // Use bunyan to format the logs nicely:
    // $ TEST_LOG=true cargo test| bunyan
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to init subscriber");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to init subscriber");
    };
});

pub struct Test {
    pub address: String,
    pub fedex_server: MockServer,
    pub store: Arc<InMemoryTrackingStore>,
}

impl Test {
    pub async fn post_tracking(&self, order_id: u64, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/orders/{}/tracking", self.address, order_id))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}{}", self.address, path))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub fn stored_tracking_number(&self, order_id: u64) -> Option<String> {
        self.store
            .tracking_number(OrderId::new(order_id))
            .map(|tracking_number| tracking_number.as_ref().to_string())
    }

    pub fn store_tracking_number(&self, order_id: u64, tracking_number: &str) {
        self.store.save(
            OrderId::new(order_id),
            TrackingNumber::parse(tracking_number.to_string()).unwrap(),
        );
    }

    pub async fn mount_token(&self) {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "test-token",
                "token_type": "bearer",
                "expires_in": 3599
            })))
            .mount(&self.fedex_server)
            .await;
    }

    /// Number of notification requests FedEx received.
    pub async fn notifications_sent(&self) -> usize {
        self.fedex_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|request| request.url.path() == "/track/v1/notifications")
            .count()
    }
}

pub async fn setup() -> Test {
    setup_with_ordering(PersistOrdering::NotifyThenPersist).await
}

pub async fn setup_with_ordering(ordering: PersistOrdering) -> Test {
    Lazy::force(&TRACING);

    let mut config = get_configuration().expect("Failed to read configuration.");
    config.application.port = 0;
    config.notification.ordering = ordering;
    config.notification.timeout_milliseconds = 2000;
    config.fedex = Some(FedexSettings {
        api_key: Secret::new("test-api-key".to_string()),
        secret_key: Secret::new("test-secret-key".to_string()),
        api_environment: ApiEnvironment::Test,
        base_url: None,
    });

    // Start FedEx server
    let fedex_server = MockServer::start().await;
    config.set_fedex_url(fedex_server.uri());

    let store = Arc::new(InMemoryTrackingStore::new());
    let app_store: Arc<dyn TrackingStore> = store.clone();

    // Launch the server
    let app = build_with_store(config.clone(), app_store).expect("Failed to build server.");
    let address = format!("http://127.0.0.1:{}", app.port());

    tracing::info!("Test running with the following Settings:\n{:#?}", config);

    // Launch the server as a background task
    let _ = tokio::spawn(app.run());

    Test {
        address,
        fedex_server,
        store,
    }
}
