//! src/fedex/notification.rs
use super::error::{AuthError, NotifyError};
use crate::domain::NotificationRequest;
use serde::{Deserialize, Serialize};

const SENDER_EMAIL_ADDRESS: &str = "notification@fedex.com";
const SENDER_CONTACT_NAME: &str = "FedEx";
const NOTIFICATION_EVENT_TYPES: [&str; 4] = [
    "ON_ESTIMATED_DELIVERY",
    "ON_TENDER",
    "ON_EXCEPTION",
    "ON_DELIVERY",
];

/// Body of `POST track/v1/notifications`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload<'a> {
    tracking_number_info: TrackingNumberInfo<'a>,
    #[serde(rename = "senderEMailAddress")]
    sender_email_address: &'a str,
    sender_contact_name: &'a str,
    tracking_event_notification_detail: TrackingEventNotificationDetail<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackingNumberInfo<'a> {
    tracking_number: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackingEventNotificationDetail<'a> {
    tracking_notifications: Vec<TrackingNotification<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackingNotification<'a> {
    notification_event_types: &'a [&'a str],
    notification_detail: NotificationDetail<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationDetail<'a> {
    notification_type: &'a str,
    email_detail: EmailDetail<'a>,
    localization: Localization<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailDetail<'a> {
    email_address: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Localization<'a> {
    language_code: &'a str,
    locale_code: &'a str,
}

impl<'a> NotificationPayload<'a> {
    pub fn new(request: &'a NotificationRequest) -> Self {
        Self {
            tracking_number_info: TrackingNumberInfo {
                tracking_number: request.tracking_number.as_ref(),
            },
            sender_email_address: SENDER_EMAIL_ADDRESS,
            sender_contact_name: SENDER_CONTACT_NAME,
            tracking_event_notification_detail: TrackingEventNotificationDetail {
                tracking_notifications: vec![TrackingNotification {
                    notification_event_types: &NOTIFICATION_EVENT_TYPES,
                    notification_detail: NotificationDetail {
                        notification_type: "HTML",
                        email_detail: EmailDetail {
                            email_address: request.recipient_email.as_ref(),
                        },
                        localization: Localization {
                            language_code: "en",
                            locale_code: "US",
                        },
                    },
                }],
            },
        }
    }
}

/// Why a notification attempt did not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Authentication,
    Transport,
    CarrierRejected,
    MalformedResponse,
}

/// Outcome of one notification attempt, handed back to the caller.
///
/// `carrier_error_messages` holds the messages FedEx reported, in order, and
/// is meant to be shown to the operator who saved the tracking number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResult {
    pub success: bool,
    pub carrier_error_messages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
}

impl NotificationResult {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            carrier_error_messages: vec![],
            failure: None,
        }
    }

    pub fn failed(reason: FailureReason, carrier_error_messages: Vec<String>) -> Self {
        Self {
            success: false,
            carrier_error_messages,
            failure: Some(reason),
        }
    }
}

impl From<AuthError> for NotificationResult {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Rejected { messages, .. } => {
                Self::failed(FailureReason::Authentication, messages)
            }
            AuthError::Transport(_) | AuthError::MalformedResponse(_) | AuthError::EmptyToken => {
                Self::failed(FailureReason::Authentication, vec![])
            }
        }
    }
}

impl From<NotifyError> for NotificationResult {
    fn from(e: NotifyError) -> Self {
        match e {
            NotifyError::Transport(_) => Self::failed(FailureReason::Transport, vec![]),
            NotifyError::CarrierRejected { messages, .. } => {
                Self::failed(FailureReason::CarrierRejected, messages)
            }
            NotifyError::MalformedResponse { .. } => {
                Self::failed(FailureReason::MalformedResponse, vec![])
            }
        }
    }
}
