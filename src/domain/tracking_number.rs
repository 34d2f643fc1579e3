//! src/domain/tracking_number.rs
use serde::{Deserialize, Serialize};

const MAX_LENGTH: usize = 40;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("A tracking number must not be empty")]
    Empty,
    #[error("A tracking number must not be more than 40 characters long")]
    TooLong,
    #[error("A tracking number may only contain ASCII letters and digits")]
    InvalidCharacters,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    pub fn parse(s: String) -> Result<Self, Error> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::Empty);
        }

        if s.chars().count() > MAX_LENGTH {
            return Err(Error::TooLong);
        }

        // FedEx tracking ids are digits, with letters for some ground and
        // freight services. Anything else would be rejected by the carrier.
        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidCharacters);
        }

        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for TrackingNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}
