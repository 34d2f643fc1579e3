//! src/domain/recipient_email.rs
use serde::{Deserialize, Serialize};
use validator::validate_email;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Empty email")]
    Empty,
    #[error("{0}")]
    Invalid(String),
}

/// Address the carrier sends tracking-event emails to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecipientEmail(String);

impl RecipientEmail {
    pub fn parse(s: String) -> Result<Self, Error> {
        let s = s.trim().to_string();
        if s.is_empty() {
            return Err(Error::Empty);
        }

        if validate_email(&s) {
            Ok(Self(s))
        } else {
            Err(Error::Invalid(format!("Invalid email: {}", s)))
        }
    }
}

impl AsRef<str> for RecipientEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecipientEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}
