//! src/domain/mod.rs
mod order_id;
pub use order_id::OrderId;

pub mod recipient_email;
pub use recipient_email::RecipientEmail;

pub mod tracking_number;
pub use tracking_number::TrackingNumber;

use serde::Deserialize;

/// Raw tracking update as submitted by the integration layer.
#[derive(Debug, Deserialize)]
pub struct TrackingForm {
    pub tracking_number: String,
    pub recipient_email: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    TrackingNumber(#[from] tracking_number::Error),
    #[error(transparent)]
    RecipientEmail(#[from] recipient_email::Error),
}

/// A single notification attempt. Built fresh per save event and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub order_id: OrderId,
    pub tracking_number: TrackingNumber,
    pub recipient_email: RecipientEmail,
}

impl NotificationRequest {
    pub fn parse(order_id: OrderId, form: TrackingForm) -> Result<Self, ParseError> {
        Ok(Self {
            order_id,
            tracking_number: TrackingNumber::parse(form.tracking_number)?,
            recipient_email: RecipientEmail::parse(form.recipient_email)?,
        })
    }
}
