//! src/configuration.rs
use crate::tracking::PersistOrdering;
use config::{Config, File};
use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine the current directory")]
    CurrentDir(#[source] std::io::Error),
    #[error("{0}")]
    UnsupportedEnvironment(String),
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("Failed to read FedEx settings from the environment")]
    FedexEnv(#[from] envy::Error),
    #[error("FedEx settings are missing. Set FEDEX_API_KEY and FEDEX_SECRET_KEY.")]
    MissingFedexSettings,
    #[error("{0} is required")]
    MissingCredential(&'static str),
    #[error("Failed to build the HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub notification: NotificationSettings,
    #[serde(default)]
    pub fedex: Option<FedexSettings>,
}

impl Settings {
    pub fn set_fedex_url(&mut self, fedex_url: String) {
        if let Some(fedex_settings) = &mut self.fedex {
            fedex_settings.base_url = Some(fedex_url);
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct NotificationSettings {
    pub ordering: PersistOrdering,
    pub timeout_milliseconds: u64,
}

impl NotificationSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

/// FedEx API access, read from `FEDEX_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct FedexSettings {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    #[serde(default)]
    pub api_environment: ApiEnvironment,
    /// Overrides the URL derived from `api_environment`. Must end with `/`.
    pub base_url: Option<String>,
}

impl FedexSettings {
    /// `Ok(None)` when a required `FEDEX_*` variable is not set.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Option<Self>, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        match envy::prefixed("FEDEX_").from_iter::<_, FedexSettings>(vars) {
            Ok(fedex_settings) => Ok(Some(fedex_settings)),
            Err(envy::Error::MissingValue(_)) => Ok(None),
            Err(e) => Err(ConfigError::FedexEnv(e)),
        }
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.api_environment.base_url().to_string())
    }
}

/// The FedEx deployment requests are sent to.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(try_from = "String")]
pub enum ApiEnvironment {
    Test,
    #[default]
    Production,
}

impl ApiEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiEnvironment::Test => "test",
            ApiEnvironment::Production => "production",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            ApiEnvironment::Test => "https://apis-sandbox.fedex.com/",
            ApiEnvironment::Production => "https://apis.fedex.com/",
        }
    }
}

impl TryFrom<String> for ApiEnvironment {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "test" => Ok(ApiEnvironment::Test),
            "production" => Ok(ApiEnvironment::Production),
            _ => Err(format!(
                "{} is not a supported FedEx API environment. Use either `test` or `production`.",
                s
            )),
        }
    }
}

#[derive(PartialEq)]
pub enum Environment {
    Local,
    Production,
}
impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            _ => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                s
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment.
    // Default to `local` if not specified.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::UnsupportedEnvironment)?;

    let settings = Config::builder()
        .add_source(File::from(configuration_directory.join("base")).required(true))
        .add_source(File::from(configuration_directory.join(environment.as_str())).required(true))
        .build()?;

    let mut settings: Settings = settings.try_deserialize()?;

    if environment == Environment::Local {
        let fedex_file_path = configuration_directory.join("fedex");
        if let Err(e) = dotenvy::from_filename(&fedex_file_path) {
            tracing::warn!(
                error.cause_chain = ?e,
                "Could not load FedEx settings from {}", fedex_file_path.display()
            );
        }
    }

    // Missing credentials are reported when the client is built, so the rest
    // of the settings stay usable without them. Invalid values fail here.
    settings.fedex = FedexSettings::from_env()?;
    if settings.fedex.is_none() {
        tracing::warn!("FedEx settings are not configured");
    }

    Ok(settings)
}
