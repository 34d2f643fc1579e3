//! Sends one tracking notification using the configured FedEx credentials.
//!
//! $ cargo run --example send_notification -- 42 794698765432 ursula@domain.com
use fedex_notify::configuration::{get_configuration, ConfigError};
use fedex_notify::domain::{NotificationRequest, OrderId, TrackingForm};
use fedex_notify::fedex::FedexClient;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let mut args = std::env::args().skip(1);
    let (Some(order_id), Some(tracking_number), Some(recipient_email)) =
        (args.next(), args.next(), args.next())
    else {
        anyhow::bail!("usage: send_notification <order_id> <tracking_number> <recipient_email>");
    };

    let config = get_configuration()?;
    let fedex_settings = config.fedex.ok_or(ConfigError::MissingFedexSettings)?;
    let client = FedexClient::from_settings(&fedex_settings, config.notification.timeout())?;

    let request = NotificationRequest::parse(
        OrderId::new(order_id.parse()?),
        TrackingForm {
            tracking_number,
            recipient_email,
        },
    )?;

    let result = client.send_notification(&request).await;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
