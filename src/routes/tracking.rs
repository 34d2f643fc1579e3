//! src/routes/tracking.rs
use crate::configuration::NotificationSettings;
use crate::domain::{NotificationRequest, OrderId, ParseError, TrackingForm};
use crate::fedex::FedexClient;
use crate::routes::error_chain_fmt;
use crate::tracking::{save_tracking_number, TrackingStore};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

#[derive(thiserror::Error)]
pub enum TrackingError {
    #[error("{0}")]
    ValidationError(#[from] ParseError),
}

impl std::fmt::Debug for TrackingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for TrackingError {
    fn status_code(&self) -> StatusCode {
        match self {
            TrackingError::ValidationError(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

#[tracing::instrument(
    name = "Updating an order tracking number",
    skip(order_id, form, fedex_client, store, settings),
    fields(
        request_id = %uuid::Uuid::new_v4(),
        order_id = %order_id,
        tracking_number = %form.tracking_number
    )
)]
pub async fn update_tracking(
    order_id: web::Path<u64>,
    form: web::Json<TrackingForm>,
    fedex_client: web::Data<FedexClient>,
    store: web::Data<dyn TrackingStore>,
    settings: web::Data<NotificationSettings>,
) -> Result<HttpResponse, TrackingError> {
    let order_id = OrderId::from(order_id.into_inner());
    let request = NotificationRequest::parse(order_id, form.into_inner())?;

    let outcome = save_tracking_number(
        &fedex_client,
        store.get_ref(),
        &request,
        settings.ordering,
    )
    .await;

    // The caller shows carrier_error_messages to whoever saved the order.
    let status = if outcome.notification_failed() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };

    Ok(HttpResponse::build(status).json(&outcome))
}
