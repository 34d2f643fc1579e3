//! src/fedex/mod.rs
use crate::configuration::{ApiEnvironment, ConfigError, FedexSettings};
use crate::domain::NotificationRequest;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

mod credentials;
pub use credentials::Credentials;

mod error;
pub use error::{AuthError, NotifyError};
use error::CarrierErrors;

mod notification;
pub use notification::{FailureReason, NotificationPayload, NotificationResult};

mod token;
pub use token::AccessToken;
use token::TokenResponse;

/// Client for the FedEx OAuth and Track notification endpoints.
///
/// Every notification attempt fetches its own token. The client keeps no
/// state between attempts, so one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct FedexClient {
    http_client: Client,
    base_url: String,
    credentials: Credentials,
}

impl FedexClient {
    pub fn new(
        credentials: Credentials,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: with_trailing_slash(base_url),
            credentials,
        })
    }

    pub fn from_settings(settings: &FedexSettings, timeout: Duration) -> Result<Self, ConfigError> {
        let credentials =
            Credentials::parse(settings.api_key.clone(), settings.secret_key.clone())?;

        Self::new(credentials, settings.base_url(), timeout).map_err(ConfigError::HttpClient)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replaces the credentials and targets the host of `environment`.
    pub fn set_credentials(
        &mut self,
        api_key: Secret<String>,
        secret_key: Secret<String>,
        environment: ApiEnvironment,
    ) -> Result<(), ConfigError> {
        self.credentials = Credentials::parse(api_key, secret_key)?;
        self.base_url = environment.base_url().to_string();
        Ok(())
    }

    /// Authenticates, then asks FedEx to email `request.recipient_email`
    /// about events on `request.tracking_number`.
    #[tracing::instrument(
        name = "Sending a FedEx tracking notification",
        skip(self, request),
        fields(
            order_id = %request.order_id,
            tracking_number = %request.tracking_number
        )
    )]
    pub async fn send_notification(&self, request: &NotificationRequest) -> NotificationResult {
        let token = match self.authenticate().await {
            Ok(token) => token,
            Err(e) => {
                let status = match &e {
                    AuthError::Rejected { status, .. } => Some(status.as_u16()),
                    _ => None,
                };
                tracing::error!(
                    error.cause_chain = ?e,
                    order_id = %request.order_id,
                    http.status_code = status,
                    "Failed to obtain a FedEx access token, notification not sent"
                );
                return NotificationResult::from(e);
            }
        };

        self.notify(request, &token).await
    }

    #[tracing::instrument(name = "Requesting a FedEx access token", skip(self))]
    pub async fn authenticate(&self) -> Result<AccessToken, AuthError> {
        let url = format!("{}oauth/token", self.base_url);
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.api_key().expose_secret().as_str()),
            (
                "client_secret",
                self.credentials.secret_key().expose_secret().as_str(),
            ),
        ];

        let response = self
            .http_client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(AuthError::Transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(AuthError::Transport)?;

        if !status.is_success() {
            let errors: CarrierErrors =
                serde_json::from_slice(&body).map_err(AuthError::MalformedResponse)?;
            return Err(AuthError::Rejected {
                status,
                messages: errors.into_messages(),
            });
        }

        let token: TokenResponse =
            serde_json::from_slice(&body).map_err(AuthError::MalformedResponse)?;
        if token.access_token.expose_secret().trim().is_empty() {
            return Err(AuthError::EmptyToken);
        }

        Ok(AccessToken::new(token.access_token))
    }

    /// Sends the notification request with an already obtained token and
    /// classifies the answer. Failures are logged here.
    #[tracing::instrument(
        name = "Posting a FedEx tracking notification",
        skip(self, request, token),
        fields(order_id = %request.order_id)
    )]
    pub async fn notify(
        &self,
        request: &NotificationRequest,
        token: &AccessToken,
    ) -> NotificationResult {
        match self.try_notify(request, token).await {
            Ok(()) => NotificationResult::succeeded(),
            Err(e) => {
                match &e {
                    NotifyError::Transport(_) => tracing::error!(
                        error.cause_chain = ?e,
                        order_id = %request.order_id,
                        "Failed to send the FedEx notification"
                    ),
                    NotifyError::CarrierRejected { status, messages } => tracing::error!(
                        order_id = %request.order_id,
                        http.status_code = status.as_u16(),
                        carrier_error_messages = ?messages,
                        "FedEx rejected the notification"
                    ),
                    NotifyError::MalformedResponse { status, source } => tracing::error!(
                        order_id = %request.order_id,
                        http.status_code = status.as_u16(),
                        "JSON decode error: {}", source
                    ),
                }
                NotificationResult::from(e)
            }
        }
    }

    async fn try_notify(
        &self,
        request: &NotificationRequest,
        token: &AccessToken,
    ) -> Result<(), NotifyError> {
        let url = format!("{}track/v1/notifications", self.base_url);
        let payload = NotificationPayload::new(request);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token.value.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(NotifyError::Transport)?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        let body = response.bytes().await.map_err(NotifyError::Transport)?;
        match serde_json::from_slice::<CarrierErrors>(&body) {
            Ok(errors) => Err(NotifyError::CarrierRejected {
                status,
                messages: errors.into_messages(),
            }),
            Err(source) => Err(NotifyError::MalformedResponse { status, source }),
        }
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
