use fedex_notify::configuration::get_configuration;
use fedex_notify::startup::build;
use fedex_notify::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("fedex-notify".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let config = get_configuration()?;
    let app = build(config)?;
    app.run().await?;

    Ok(())
}
