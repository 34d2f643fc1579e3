//! src/fedex/credentials.rs
use crate::configuration::ConfigError;
use secrecy::{ExposeSecret, Secret};

/// API key and secret used for the client-credentials grant.
#[derive(Debug, Clone)]
pub struct Credentials {
    api_key: Secret<String>,
    secret_key: Secret<String>,
}

impl Credentials {
    pub fn parse(api_key: Secret<String>, secret_key: Secret<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: required(api_key, "FEDEX_API_KEY")?,
            secret_key: required(secret_key, "FEDEX_SECRET_KEY")?,
        })
    }

    pub fn api_key(&self) -> &Secret<String> {
        &self.api_key
    }

    pub fn secret_key(&self) -> &Secret<String> {
        &self.secret_key
    }
}

fn required(value: Secret<String>, name: &'static str) -> Result<Secret<String>, ConfigError> {
    let trimmed = value.expose_secret().trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingCredential(name));
    }
    Ok(Secret::new(trimmed.to_string()))
}
