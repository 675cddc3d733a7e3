//! Request Gateway — the single point of entry for all AutoSender backend calls.
//!
//! ARCHITECTURAL RULE: no other module may touch the network directly.
//! Every feature routes through [`ApiClient::request`] so credential
//! injection and error normalization happen in exactly one place.

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::errors::ApiError;
use crate::models::application::{ApplicationRecord, Recipient};
use crate::models::user::{ProfileUpdate, UserProfile};
use crate::token_store::TokenStore;

/// Fallback when an error response carries no usable `message` field.
const GENERIC_ERROR_MESSAGE: &str = "An API error occurred";

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

/// Backend success envelope: payloads arrive wrapped as `{ "data": ... }`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Login payload for POST /auth/login.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration payload for POST /auth/register.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Successful login/register response. The backend returns more fields;
/// only the bearer token matters to this client.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthGrant {
    pub token: String,
}

/// Request body for POST /applications/send.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSendRequest {
    pub recipients: Vec<Recipient>,
    pub subject: String,
}

/// Backend acknowledgment of a batch send. `sent_count` is optional because
/// older backend builds omit it; callers fall back to the submitted count.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSendReceipt {
    #[serde(default)]
    pub sent_count: Option<u64>,
}

/// Request body for POST /ai/personalize-letter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizeRequest {
    pub job_description: String,
    pub base_letter: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedLetter {
    pub personalized_letter: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Gateway
// ────────────────────────────────────────────────────────────────────────────

/// The one HTTP client of the application.
///
/// Reads the token store on every request (the session manager owns writes)
/// and normalizes every failure into [`ApiError`]. It never touches session
/// or notification state — callers react to success and failure themselves.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: TokenStore,
}

impl ApiClient {
    pub fn new(config: &Config, tokens: TokenStore) -> Self {
        Self {
            http: Client::builder()
                .timeout(config.request_timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Performs one backend call and parses the response.
    ///
    /// The body is read and parsed as JSON unconditionally — error responses
    /// carry their explanation in a JSON `message` field, and a 2xx response
    /// that fails to parse is itself an error.
    async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self
            .http
            .request(method, url.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        // A missing token is not an error: login and register legitimately
        // run unauthenticated. The token rides along whenever it exists.
        if let Some(token) = self.tokens.load() {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(classify_transport_error)?;
        let status = response.status();
        let raw = response.text().await.map_err(classify_transport_error)?;

        let parsed: Result<serde_json::Value, _> = serde_json::from_str(&raw);

        if !status.is_success() {
            let message = parsed
                .ok()
                .as_ref()
                .and_then(|value| value.get("message"))
                .and_then(|message| message.as_str())
                .unwrap_or(GENERIC_ERROR_MESSAGE)
                .to_string();
            debug!("backend rejected {} {}: {}", status, url, message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let value = parsed.map_err(|source| ApiError::InvalidResponse {
            status: status.as_u16(),
            source,
        })?;
        serde_json::from_value(value).map_err(|source| ApiError::InvalidResponse {
            status: status.as_u16(),
            source,
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, endpoint, None).await
    }

    // ────────────────────────────────────────────────────────────────────
    // Typed endpoint bindings — thin, no logic beyond the envelope unwrap
    // ────────────────────────────────────────────────────────────────────

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError> {
        let envelope: Envelope<AuthGrant> = self
            .request(Method::POST, "/auth/login", Some(credentials))
            .await?;
        Ok(envelope.data)
    }

    pub async fn register(&self, registration: &Registration) -> Result<AuthGrant, ApiError> {
        let envelope: Envelope<AuthGrant> = self
            .request(Method::POST, "/auth/register", Some(registration))
            .await?;
        Ok(envelope.data)
    }

    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        let envelope: Envelope<UserProfile> = self.get("/user/profile").await?;
        Ok(envelope.data)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let envelope: Envelope<UserProfile> = self
            .request(Method::PUT, "/user/profile", Some(update))
            .await?;
        Ok(envelope.data)
    }

    pub async fn get_application_history(&self) -> Result<Vec<ApplicationRecord>, ApiError> {
        let envelope: Envelope<Vec<ApplicationRecord>> = self.get("/applications").await?;
        Ok(envelope.data)
    }

    pub async fn send_batch_applications(
        &self,
        batch: &BatchSendRequest,
    ) -> Result<BatchSendReceipt, ApiError> {
        let envelope: Envelope<BatchSendReceipt> = self
            .request(Method::POST, "/applications/send", Some(batch))
            .await?;
        Ok(envelope.data)
    }

    pub async fn personalize_letter(
        &self,
        request: &PersonalizeRequest,
    ) -> Result<PersonalizedLetter, ApiError> {
        let envelope: Envelope<PersonalizedLetter> = self
            .request(Method::POST, "/ai/personalize-letter", Some(request))
            .await?;
        Ok(envelope.data)
    }
}

fn classify_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(err)
    }
}
