//! The only door to the indexing backend.
//!
//! Controllers talk to a [`RequestGateway`]; [`HttpGateway`] is the real
//! implementation, tests substitute their own.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{
    ChatRequest, ChatResponse, ErrorBody, HealthResponse, IngestRequest, IngestResponse,
};
use crate::error::GatewayError;

#[async_trait]
pub trait RequestGateway: Send + Sync {
    /// `POST /ingest`
    async fn ingest(&self, request: IngestRequest) -> Result<IngestResponse, GatewayError>;

    /// `POST /chat`
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, GatewayError>;

    /// `GET /`
    async fn health(&self) -> Result<HealthResponse, GatewayError>;
}

#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        tracing::debug!(%url, "POST");

        let response = self.client.post(&url).json(body).send().await?;
        decode(response).await
    }
}

/// Turn a response into either the expected body or a [`GatewayError`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let detail = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.detail_text());
        return Err(GatewayError::Api {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_str(&text).map_err(|e| GatewayError::Decode(e.to_string()))
}

#[async_trait]
impl RequestGateway for HttpGateway {
    async fn ingest(&self, request: IngestRequest) -> Result<IngestResponse, GatewayError> {
        self.post("ingest", &request).await
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, GatewayError> {
        self.post("chat", &request).await
    }

    async fn health(&self) -> Result<HealthResponse, GatewayError> {
        let response = self.client.get(self.url("")).send().await?;
        decode(response).await
    }
}
