//! src/fedex/error.rs
use reqwest::StatusCode;
use serde::Deserialize;

/// Failure to obtain an access token. Aborts the notification attempt.
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Failed to reach the FedEx token endpoint")]
    Transport(#[source] reqwest::Error),
    #[error("The FedEx token response could not be decoded")]
    MalformedResponse(#[source] serde_json::Error),
    #[error("The FedEx token response carried an empty access token")]
    EmptyToken,
    #[error("FedEx refused the credentials with status {status}")]
    Rejected {
        status: StatusCode,
        messages: Vec<String>,
    },
}

/// Failure of the notification request itself.
#[derive(thiserror::Error, Debug)]
pub enum NotifyError {
    #[error("Failed to reach the FedEx notification endpoint")]
    Transport(#[source] reqwest::Error),
    #[error("FedEx rejected the notification with status {status}")]
    CarrierRejected {
        status: StatusCode,
        messages: Vec<String>,
    },
    #[error("FedEx answered with status {status} and a body that is not JSON")]
    MalformedResponse {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct CarrierError {
    message: Option<String>,
}

/// Error document FedEx returns with non-success statuses.
#[derive(Deserialize)]
pub(super) struct CarrierErrors {
    #[serde(default)]
    errors: Vec<CarrierError>,
}

impl CarrierErrors {
    pub fn into_messages(self) -> Vec<String> {
        self.errors.into_iter().filter_map(|e| e.message).collect()
    }
}
