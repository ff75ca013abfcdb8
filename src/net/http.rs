//! HTTP client for the single backend host.
//!
//! DESIGN
//! ======
//! `ApiClient` is cheap to clone: every clone shares one `reqwest::Client`
//! and one default `Authorization` value. The session manager is the only
//! caller of [`ApiClient::set_auth_token`]; everything else just issues
//! requests and inherits whatever header is current when the request is built.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`ApiError::Status`] carrying the server's
//! `message` field when the body is JSON, or the raw body text otherwise.
//! Transport timeouts are reported separately from other request failures.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend requests.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// The base URL or an endpoint path could not be turned into a URL.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// No response arrived within the configured request timeout.
    #[error("request timed out")]
    Timeout,

    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("server returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected schema.
    #[error("response parse failed: {0}")]
    Parse(String),
}

impl ApiError {
    /// HTTP status code, if the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Server-provided message, when one was sent.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() { Self::Timeout } else { Self::Request(e.to_string()) }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Build a client for the configured host and timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeouts.request())
            .connect_timeout(config.timeouts.connect())
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url, auth: Arc::new(RwLock::new(None)) })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Set or clear the default `Authorization: Bearer <token>` header.
    /// An empty token clears it.
    pub fn set_auth_token(&self, token: Option<&str>) {
        let value = token
            .filter(|t| !t.is_empty())
            .map(|t| format!("Bearer {t}"));
        tracing::debug!(present = value.is_some(), "auth header updated");
        *self.auth.write().unwrap_or_else(PoisonError::into_inner) = value;
    }

    /// Current default `Authorization` value, if any.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.auth
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `GET` a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or schema mismatch.
    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str], query: &[(&str, String)]) -> Result<T, ApiError> {
        let response = self
            .send(Method::GET, segments, query, None::<&()>)
            .await?;
        parse_json(response).await
    }

    /// `POST` a JSON body and decode a JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or schema mismatch.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send(Method::POST, segments, query, Some(body))
            .await?;
        parse_json(response).await
    }

    /// `POST` a JSON body and return the server's plain message.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    pub async fn post_for_message<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        body: &B,
    ) -> Result<String, ApiError> {
        let response = self
            .send(Method::POST, segments, query, Some(body))
            .await?;
        let text = response.text().await?;
        Ok(extract_message(&text))
    }

    /// `POST` a JSON body, discarding whatever the server returns.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    pub async fn post_unit<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        body: &B,
    ) -> Result<(), ApiError> {
        self.send(Method::POST, segments, query, Some(body))
            .await?;
        Ok(())
    }

    /// `GET` a binary payload.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    pub async fn get_bytes(&self, segments: &[&str]) -> Result<Vec<u8>, ApiError> {
        let response = self
            .send(Method::GET, segments, &[], None::<&()>)
            .await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(segments)?;
        let mut request = self.http.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(value) = self.authorization() {
            request = request.header(AUTHORIZATION, value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(ApiError::Status { status: status.as_u16(), message: extract_message(&text) })
    }
}

async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Pull a human-readable message out of a response body.
///
/// Accepts `{"message": "..."}`, a bare JSON string, or plain text.
pub(crate) fn extract_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => s,
        Ok(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| body.trim().to_owned(), ToOwned::to_owned),
        _ => body.trim().to_owned(),
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
