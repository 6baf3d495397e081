//! Chat controller for one ingested repository.
//!
//! Owns the transcript for a single [`SessionId`]. A question is shown the
//! moment it is asked and stays in the transcript whether or not an answer
//! ever arrives.

use std::sync::Arc;

use crate::api::{ChatRequest, ChatResponse};
use crate::error::{failure_message, GatewayError, CHAT_FALLBACK};
use crate::flight::InFlight;
use crate::gateway::RequestGateway;
use crate::input::InputBuffer;
use crate::state::{ChatMessage, InteractionState, SessionId};

/// What a finished chat request did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOutcome {
    /// An assistant message was appended.
    Answered,
    /// See [`ChatSession::error`].
    Failed,
}

pub struct ChatSession {
    session_id: SessionId,
    gateway: Arc<dyn RequestGateway>,
    transcript: Vec<ChatMessage>,
    input: InputBuffer,
    in_flight: InFlight<ChatResponse>,
    error: Option<String>,
}

impl ChatSession {
    pub fn new(session_id: SessionId, gateway: Arc<dyn RequestGateway>) -> Self {
        Self {
            session_id,
            gateway,
            transcript: Vec::new(),
            input: InputBuffer::new(),
            in_flight: InFlight::new(),
            error: None,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn state(&self) -> InteractionState {
        if self.in_flight.is_pending() {
            InteractionState::Pending
        } else {
            InteractionState::Idle
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputBuffer {
        &mut self.input
    }

    /// Ask `query_text` about the repository.
    ///
    /// Returns `false` with no state change when the text is blank or a
    /// request is already outstanding. Otherwise the question is appended to
    /// the transcript, the input buffer is emptied, the previous error is
    /// cleared and the request goes out with the text exactly as given.
    pub fn ask(&mut self, query_text: &str) -> bool {
        if self.in_flight.is_pending() {
            tracing::debug!(session = %self.session_id, "chat already in flight, ignoring ask");
            return false;
        }
        if query_text.trim().is_empty() {
            return false;
        }

        self.transcript.push(ChatMessage::user(query_text));
        self.input.clear();
        self.error = None;

        tracing::info!(session = %self.session_id, "sending question");
        let gateway = Arc::clone(&self.gateway);
        let request = ChatRequest {
            repo_id: self.session_id.as_str().to_string(),
            query: query_text.to_string(),
        };
        self.in_flight.launch(async move { gateway.chat(request).await });
        true
    }

    /// Ask whatever is in the input buffer.
    pub fn submit_input(&mut self) -> bool {
        let query = self.input.text().to_string();
        self.ask(&query)
    }

    /// Apply the result if the request has finished.
    pub fn poll(&mut self) -> Option<ChatOutcome> {
        let result = self.in_flight.try_take()?;
        Some(self.finish(result))
    }

    /// Wait for the outstanding request and apply its result.
    pub async fn settle(&mut self) -> Option<ChatOutcome> {
        let result = self.in_flight.wait().await?;
        Some(self.finish(result))
    }

    fn finish(&mut self, result: Result<ChatResponse, GatewayError>) -> ChatOutcome {
        match result {
            Ok(ChatResponse { answer }) => {
                tracing::info!(session = %self.session_id, chars = answer.len(), "answer received");
                self.transcript.push(ChatMessage::assistant(answer));
                ChatOutcome::Answered
            }
            Err(err) => {
                let message = failure_message(&err, CHAT_FALLBACK);
                tracing::warn!(session = %self.session_id, error = %err, %message, "chat failed");
                self.error = Some(message);
                ChatOutcome::Failed
            }
        }
    }
}
