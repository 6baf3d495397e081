//! Scripted gateway for controller tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::api::{ChatRequest, ChatResponse, HealthResponse, IngestRequest, IngestResponse};
use crate::error::GatewayError;
use crate::gateway::RequestGateway;

/// Answers from queues and records every request it sees.
///
/// A `held` gateway records the request immediately but doesn't answer until
/// [`release`](Self::release) is called.
pub(crate) struct ScriptedGateway {
    ingest_results: Mutex<VecDeque<Result<IngestResponse, GatewayError>>>,
    chat_results: Mutex<VecDeque<Result<ChatResponse, GatewayError>>>,
    ingest_requests: Mutex<Vec<IngestRequest>>,
    chat_requests: Mutex<Vec<ChatRequest>>,
    gate: watch::Sender<bool>,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Self {
        Self::with_gate(true)
    }

    pub(crate) fn held() -> Self {
        Self::with_gate(false)
    }

    fn with_gate(open: bool) -> Self {
        let (gate, _) = watch::channel(open);
        Self {
            ingest_results: Mutex::new(VecDeque::new()),
            chat_results: Mutex::new(VecDeque::new()),
            ingest_requests: Mutex::new(Vec::new()),
            chat_requests: Mutex::new(Vec::new()),
            gate,
        }
    }

    pub(crate) fn push_ingest(&self, result: Result<IngestResponse, GatewayError>) {
        self.ingest_results.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_chat(&self, result: Result<ChatResponse, GatewayError>) {
        self.chat_results.lock().unwrap().push_back(result);
    }

    pub(crate) fn release(&self) {
        self.gate.send_replace(true);
    }

    pub(crate) fn ingest_requests(&self) -> Vec<IngestRequest> {
        self.ingest_requests.lock().unwrap().clone()
    }

    pub(crate) fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.ingest_requests.lock().unwrap().len() + self.chat_requests.lock().unwrap().len()
    }

    async fn wait_for_release(&self) {
        let mut rx = self.gate.subscribe();
        let _ = rx.wait_for(|open| *open).await;
    }
}

fn unscripted() -> GatewayError {
    GatewayError::Unrecognized(Some("no scripted response".to_string()))
}

#[async_trait]
impl RequestGateway for ScriptedGateway {
    async fn ingest(&self, request: IngestRequest) -> Result<IngestResponse, GatewayError> {
        self.ingest_requests.lock().unwrap().push(request);
        self.wait_for_release().await;
        let next = self.ingest_results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(unscripted()))
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, GatewayError> {
        self.chat_requests.lock().unwrap().push(request);
        self.wait_for_release().await;
        let next = self.chat_results.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(unscripted()))
    }

    async fn health(&self) -> Result<HealthResponse, GatewayError> {
        Ok(HealthResponse {
            message: "RAG API is running".to_string(),
        })
    }
}
