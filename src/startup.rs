//! src/startup.rs
use crate::configuration::{ConfigError, NotificationSettings, Settings};
use crate::fedex::FedexClient;
use crate::routes::{health_check, update_tracking};
use crate::tracking::{InMemoryTrackingStore, TrackingStore};
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub fn build(config: Settings) -> Result<Application, anyhow::Error> {
    let store: Arc<dyn TrackingStore> = Arc::new(InMemoryTrackingStore::new());
    build_with_store(config, store)
}

/// Like [`build`], with the tracking store supplied by the caller.
pub fn build_with_store(
    config: Settings,
    store: Arc<dyn TrackingStore>,
) -> Result<Application, anyhow::Error> {
    let fedex_settings = config.fedex.ok_or(ConfigError::MissingFedexSettings)?;
    let fedex_client =
        FedexClient::from_settings(&fedex_settings, config.notification.timeout())?;

    let address = format!("{}:{}", config.application.host, config.application.port);
    let tcp_listener = TcpListener::bind(address)?;
    let port = tcp_listener.local_addr()?.port();

    tracing::info!(
        port,
        fedex_base_url = fedex_client.base_url(),
        ordering = ?config.notification.ordering,
        "Starting the tracking notification service"
    );

    let server = run(tcp_listener, fedex_client, store, config.notification)?;

    Ok(Application { port, server })
}

pub fn run(
    listener: TcpListener,
    fedex_client: FedexClient,
    store: Arc<dyn TrackingStore>,
    notification_settings: NotificationSettings,
) -> Result<Server, std::io::Error> {
    let fedex_client = web::Data::new(fedex_client);
    let store: web::Data<dyn TrackingStore> = web::Data::from(store);
    let notification_settings = web::Data::new(notification_settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/orders/{order_id}/tracking", web::post().to(update_tracking))
            .app_data(fedex_client.clone())
            .app_data(store.clone())
            .app_data(notification_settings.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
