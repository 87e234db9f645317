//! HTTP transport for the remote cart service.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, Response, StatusCode};
use thiserror::Error;

use super::{AddBody, UpdateBody};

/// Where the remote cart service lives.
#[derive(Debug, Clone)]
pub struct CartEndpoint {
    /// Base URL of the storefront, e.g. `"https://tickets.example.org"`.
    pub base_url: String,
}

/// Errors that can occur when talking to the remote cart.
#[derive(Debug, Error)]
pub enum CartApiError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The cart service returned a non-2xx response.
    #[error("cart request failed with status {status}: {body}")]
    UnexpectedStatus {
        /// Response status.
        status: StatusCode,

        /// Response body, for diagnostics.
        body: String,
    },
}

/// The remote cart operations this engine issues.
///
/// Response bodies are ignored; only success or failure matters.
#[automock]
#[async_trait]
pub trait CartApi: Send + Sync {
    /// `POST /cart/add` with a fresh selection.
    async fn add(&self, body: AddBody) -> Result<(), CartApiError>;

    /// `POST /cart/update` with absolute quantities.
    async fn update(&self, body: UpdateBody) -> Result<(), CartApiError>;

    /// `POST /cart/clear`, wiping the remote cart.
    async fn clear(&self) -> Result<(), CartApiError>;
}

/// Reqwest-backed [`CartApi`] implementation.
#[derive(Debug, Clone)]
pub struct HttpCartApi {
    endpoint: CartEndpoint,
    http: Client,
}

impl HttpCartApi {
    /// Create a new client for the given endpoint.
    #[must_use]
    pub fn new(endpoint: CartEndpoint) -> Self {
        Self {
            endpoint,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint.base_url)
    }

    async fn ensure_success(response: Response) -> Result<(), CartApiError> {
        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        Err(CartApiError::UnexpectedStatus { status, body })
    }
}

#[async_trait]
impl CartApi for HttpCartApi {
    async fn add(&self, body: AddBody) -> Result<(), CartApiError> {
        let response = self
            .http
            .post(self.url("/cart/add"))
            .json(&body)
            .send()
            .await?;

        Self::ensure_success(response).await
    }

    async fn update(&self, body: UpdateBody) -> Result<(), CartApiError> {
        let response = self
            .http
            .post(self.url("/cart/update"))
            .json(&body)
            .send()
            .await?;

        Self::ensure_success(response).await
    }

    async fn clear(&self) -> Result<(), CartApiError> {
        let response = self.http.post(self.url("/cart/clear")).send().await?;

        Self::ensure_success(response).await
    }
}
