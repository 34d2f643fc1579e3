//! src/fedex/token.rs
use chrono::{DateTime, Utc};
use secrecy::Secret;
use serde::Deserialize;

/// Bearer token for a single notification attempt. Never cached.
#[derive(Debug)]
pub struct AccessToken {
    pub value: Secret<String>,
    pub obtained_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(value: Secret<String>) -> Self {
        Self {
            value,
            obtained_at: Utc::now(),
        }
    }
}

#[derive(Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: Secret<String>,
}
