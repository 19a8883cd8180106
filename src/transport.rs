use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::NatusferaError;
use crate::query::ApiRequest;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            body: Value::Null,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Blocking GET access to the API.
///
/// A 404 comes back as an `ApiResponse`; every other non-success status,
/// network failure or undecodable body is an error.
pub trait Transport: Send + Sync {
    fn get_json(&self, request: &ApiRequest) -> Result<ApiResponse, NatusferaError>;

    /// Raw bytes from an absolute URL, `None` when the server does not answer 200.
    fn get_bytes(&self, url: &str) -> Result<Option<Vec<u8>>, NatusferaError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, NatusferaError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|err| NatusferaError::InvalidArgument(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|err| NatusferaError::Http(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, request: &ApiRequest) -> String {
        format!("{}{}", self.base_url, request.path)
    }
}

impl Transport for HttpTransport {
    fn get_json(&self, request: &ApiRequest) -> Result<ApiResponse, NatusferaError> {
        let response = self
            .client
            .get(self.url(request))
            .query(&request.params)
            .send()
            .map_err(|err| NatusferaError::Http(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(ApiResponse::not_found());
        }
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "natusfera request failed".to_string());
            return Err(NatusferaError::Status {
                status: status.as_u16(),
                message,
            });
        }
        let body: Value = response
            .json()
            .map_err(|err| NatusferaError::Json(err.to_string()))?;
        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }

    fn get_bytes(&self, url: &str) -> Result<Option<Vec<u8>>, NatusferaError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| NatusferaError::Http(err.to_string()))?;
        if response.status() != StatusCode::OK {
            return Ok(None);
        }
        let bytes = response
            .bytes()
            .map_err(|err| NatusferaError::Http(err.to_string()))?;
        Ok(Some(bytes.to_vec()))
    }
}
