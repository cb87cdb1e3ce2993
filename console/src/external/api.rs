//! HTTP plumbing shared by the backend clients
//!
//! Every backend response is a JSON object carrying `success`. Failures
//! carry `error` (sometimes `message`) and optionally a machine `code`.
//! Payloads are decoded against explicit types so malformed responses fail
//! here instead of leaking partial data into the views.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared::SessionContext;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{ConsoleError, ConsoleResult, GENERIC_FAILURE};

/// Backend code for a duplicate invoice number
pub const DUPLICATE_INVOICE_CODE: &str = "DUPLICATE_INVOICE";

/// Common envelope fields
#[derive(Debug, Deserialize)]
struct EnvelopeHeader {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// A rejected envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status: Option<u16>,
    pub message: String,
    pub code: Option<String>,
}

impl Rejection {
    pub fn is_duplicate_invoice(&self) -> bool {
        self.status == Some(StatusCode::CONFLICT.as_u16())
            || self.code.as_deref() == Some(DUPLICATE_INVOICE_CODE)
    }
}

impl From<Rejection> for ConsoleError {
    fn from(r: Rejection) -> Self {
        if r.status == Some(StatusCode::UNAUTHORIZED.as_u16()) {
            return ConsoleError::Unauthorized;
        }
        if r.status == Some(StatusCode::NOT_FOUND.as_u16()) {
            return ConsoleError::NotFound(r.message);
        }
        ConsoleError::Server {
            status: r.status,
            message: r.message,
        }
    }
}

/// Outcome of decoding a response body
#[derive(Debug)]
pub enum Decoded<T> {
    Accepted(T),
    Rejected(Rejection),
}

/// Decode a response body into `T` after checking the envelope
pub fn decode_envelope<T: DeserializeOwned>(status: Option<u16>, body: &str) -> ConsoleResult<Decoded<T>> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        // Non-JSON error pages still count as a rejection, not a decode bug
        Err(_) if status.map_or(false, |s| s >= 400) => {
            return Ok(Decoded::Rejected(Rejection {
                status,
                message: GENERIC_FAILURE.to_string(),
                code: None,
            }));
        }
        Err(e) => return Err(ConsoleError::Decode(e.to_string())),
    };

    let header: EnvelopeHeader = serde_json::from_value(value.clone())
        .map_err(|e| ConsoleError::Decode(format!("missing envelope: {}", e)))?;

    if !header.success || status.map_or(false, |s| s >= 400) {
        let message = header
            .error
            .or(header.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        return Ok(Decoded::Rejected(Rejection {
            status,
            message,
            code: header.code,
        }));
    }

    let payload = serde_json::from_value(value).map_err(|e| ConsoleError::Decode(e.to_string()))?;
    Ok(Decoded::Accepted(payload))
}

/// Base HTTP client for the backend REST API
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new ApiClient
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ConsoleResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConsoleError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> ConsoleResult<Self> {
        Self::new(config.api.base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn prepare(&self, builder: RequestBuilder, session: Option<&SessionContext>) -> RequestBuilder {
        let builder = builder.header("X-Request-Id", Uuid::new_v4().to_string());
        match session {
            Some(session) => builder.bearer_auth(session.token()),
            None => builder,
        }
    }

    /// GET with query parameters
    pub async fn get<Q, T>(
        &self,
        path: &str,
        query: &Q,
        session: Option<&SessionContext>,
    ) -> ConsoleResult<Decoded<T>>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.client.get(self.url(path)).query(query);
        self.execute("GET", path, self.prepare(builder, session)).await
    }

    /// POST a JSON body
    pub async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        session: Option<&SessionContext>,
    ) -> ConsoleResult<Decoded<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.client.post(self.url(path)).json(body);
        self.execute("POST", path, self.prepare(builder, session)).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        builder: RequestBuilder,
    ) -> ConsoleResult<Decoded<T>> {
        tracing::debug!(%method, %path, "backend request");

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%method, %path, error = %e, "backend request failed");
            ConsoleError::Transport(e.to_string())
        })?;

        let status = response.status();
        let body = response.text().await?;
        let decoded = decode_envelope(Some(status.as_u16()), &body)?;

        if let Decoded::Rejected(rejection) = &decoded {
            tracing::warn!(
                %method,
                %path,
                status = status.as_u16(),
                message = %rejection.message,
                "backend rejected request"
            );
        }

        Ok(decoded)
    }
}

/// Turn a decoded envelope into a result, mapping rejections generically
pub fn accepted<T>(decoded: Decoded<T>) -> ConsoleResult<T> {
    match decoded {
        Decoded::Accepted(value) => Ok(value),
        Decoded::Rejected(rejection) => Err(rejection.into()),
    }
}
