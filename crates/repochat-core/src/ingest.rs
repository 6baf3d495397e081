//! Landing-page controller: take a repository URL, ask the backend to index
//! it, and hand the resulting session identifier to whoever opens the chat.

use std::sync::Arc;

use crate::api::{IngestRequest, IngestResponse};
use crate::error::{failure_message, GatewayError, LocatorError, INGEST_FALLBACK};
use crate::flight::InFlight;
use crate::gateway::RequestGateway;
use crate::input::InputBuffer;
use crate::locator::RepoLocator;
use crate::state::{InteractionState, SessionId};

/// What a finished ingestion produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Open a chat for this session.
    Ready(SessionId),
    /// See [`IngestController::error`].
    Failed,
}

pub struct IngestController {
    gateway: Arc<dyn RequestGateway>,
    input: InputBuffer,
    in_flight: InFlight<IngestResponse>,
    error: Option<String>,
}

impl IngestController {
    pub fn new(gateway: Arc<dyn RequestGateway>) -> Self {
        Self {
            gateway,
            input: InputBuffer::new(),
            in_flight: InFlight::new(),
            error: None,
        }
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

    /// Start ingesting `repository_locator`.
    ///
    /// Returns `false` without touching any state when the locator is blank
    /// or a request is already outstanding.
    pub fn submit(&mut self, repository_locator: &str) -> bool {
        if self.in_flight.is_pending() {
            tracing::debug!("ingest already in flight, ignoring submit");
            return false;
        }
        let repo_url = repository_locator.trim();
        if repo_url.is_empty() {
            return false;
        }

        self.error = None;
        tracing::info!(%repo_url, "submitting repository for ingestion");

        let gateway = Arc::clone(&self.gateway);
        let request = IngestRequest {
            repo_url: repo_url.to_string(),
        };
        self.in_flight
            .launch(async move { gateway.ingest(request).await });
        true
    }

    /// Validate the typed URL, then [`submit`](Self::submit) it.
    ///
    /// An empty field is a silent no-op; a malformed URL is returned to the
    /// caller and leaves the controller untouched.
    pub fn submit_input(&mut self) -> Result<bool, LocatorError> {
        if self.input.text().trim().is_empty() || self.in_flight.is_pending() {
            return Ok(false);
        }
        RepoLocator::parse(self.input.text())?;
        let repo_url = self.input.text().trim().to_string();
        Ok(self.submit(&repo_url))
    }

    /// Apply the result if the request has finished.
    pub fn poll(&mut self) -> Option<IngestOutcome> {
        let result = self.in_flight.try_take()?;
        Some(self.finish(result))
    }

    /// Wait for the outstanding request and apply its result.
    pub async fn settle(&mut self) -> Option<IngestOutcome> {
        let result = self.in_flight.wait().await?;
        Some(self.finish(result))
    }

    fn finish(&mut self, result: Result<IngestResponse, GatewayError>) -> IngestOutcome {
        let result = result.and_then(|response| {
            let IngestResponse {
                repo_id, message, ..
            } = response;
            tracing::info!(%repo_id, %message, "ingestion succeeded");
            SessionId::new(repo_id)
                .ok_or_else(|| GatewayError::Decode("empty repo_id in ingest response".into()))
        });

        match result {
            Ok(session) => IngestOutcome::Ready(session),
            Err(err) => {
                let message = failure_message(&err, INGEST_FALLBACK);
                tracing::warn!(error = %err, %message, "ingestion failed");
                self.error = Some(message);
                IngestOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGateway;

    fn controller(gateway: &Arc<ScriptedGateway>) -> IngestController {
        IngestController::new(gateway.clone())
    }

    #[tokio::test]
    async fn test_success_yields_session() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_ingest(Ok(IngestResponse {
            repo_id: "abc123".to_string(),
            message: "ok".to_string(),
            status: None,
        }));
        let mut ingest = controller(&gateway);

        assert!(ingest.submit("https://github.com/acme/widgets"));
        assert_eq!(ingest.state(), InteractionState::Pending);

        let outcome = ingest.settle().await;
        assert_eq!(
            outcome,
            Some(IngestOutcome::Ready(SessionId::new("abc123").unwrap()))
        );
        assert_eq!(ingest.state(), InteractionState::Idle);
        assert_eq!(ingest.error(), None);
        assert_eq!(
            gateway.ingest_requests(),
            vec![IngestRequest {
                repo_url: "https://github.com/acme/widgets".to_string()
            }]
        );

        // Applied exactly once.
        assert_eq!(ingest.settle().await, None);
        assert_eq!(ingest.poll(), None);
    }

    #[tokio::test]
    async fn test_blank_submit_is_noop() {
        let gateway = Arc::new(ScriptedGateway::new());
        let mut ingest = controller(&gateway);

        for blank in ["", "   ", "\t\n"] {
            assert!(!ingest.submit(blank));
        }
        assert_eq!(ingest.state(), InteractionState::Idle);
        assert_eq!(ingest.error(), None);
        assert_eq!(ingest.settle().await, None);
        assert_eq!(gateway.request_count(), 0);
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_ignored() {
        let gateway = Arc::new(ScriptedGateway::held());
        gateway.push_ingest(Ok(IngestResponse {
            repo_id: "first".to_string(),
            message: "ok".to_string(),
            status: None,
        }));
        let mut ingest = controller(&gateway);

        assert!(ingest.submit("https://github.com/acme/one"));
        tokio::task::yield_now().await;
        assert!(!ingest.submit("https://github.com/acme/two"));
        assert_eq!(ingest.poll(), None);

        gateway.release();
        let outcome = ingest.settle().await;
        assert_eq!(
            outcome,
            Some(IngestOutcome::Ready(SessionId::new("first").unwrap()))
        );
        assert_eq!(gateway.request_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_sets_detail_and_allows_retry() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_ingest(Err(GatewayError::Api {
            status: 400,
            detail: Some("Invalid repository URL".to_string()),
        }));
        gateway.push_ingest(Ok(IngestResponse {
            repo_id: "acme-widgets".to_string(),
            message: "Repository acme-widgets ingested successfully.".to_string(),
            status: Some("success".to_string()),
        }));
        let mut ingest = controller(&gateway);

        ingest.submit("https://github.com/acme");
        assert_eq!(ingest.settle().await, Some(IngestOutcome::Failed));
        assert_eq!(ingest.error(), Some("Invalid repository URL"));
        assert_eq!(ingest.state(), InteractionState::Idle);

        // A new attempt clears the old error as soon as it starts.
        ingest.submit("https://github.com/acme/widgets");
        assert_eq!(ingest.error(), None);
        assert!(matches!(
            ingest.settle().await,
            Some(IngestOutcome::Ready(_))
        ));
        assert_eq!(ingest.error(), None);
    }

    #[tokio::test]
    async fn test_failure_without_anything_uses_fallback() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_ingest(Err(GatewayError::Unrecognized(None)));
        let mut ingest = controller(&gateway);

        ingest.submit("https://github.com/acme/widgets");
        ingest.settle().await;
        assert_eq!(ingest.error(), Some(INGEST_FALLBACK));
    }

    #[tokio::test]
    async fn test_empty_repo_id_is_a_failure() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_ingest(Ok(IngestResponse {
            repo_id: String::new(),
            message: "ok".to_string(),
            status: None,
        }));
        let mut ingest = controller(&gateway);

        ingest.submit("https://github.com/acme/widgets");
        assert_eq!(ingest.settle().await, Some(IngestOutcome::Failed));
        assert!(ingest
            .error()
            .is_some_and(|e| e.contains("empty repo_id")));
    }

    #[tokio::test]
    async fn test_submit_input_validates_url() {
        let gateway = Arc::new(ScriptedGateway::new());
        let mut ingest = controller(&gateway);

        ingest.input_mut().set("not a url");
        assert!(matches!(
            ingest.submit_input(),
            Err(LocatorError::Malformed(_))
        ));
        assert_eq!(ingest.state(), InteractionState::Idle);
        assert_eq!(ingest.error(), None);

        ingest.input_mut().set("   ");
        assert_eq!(ingest.submit_input(), Ok(false));
        assert_eq!(gateway.request_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_input_sends_url_as_typed() {
        let gateway = Arc::new(ScriptedGateway::new());
        let mut ingest = controller(&gateway);

        ingest.input_mut().set("  HTTPS://GitHub.com/Acme/Widgets  ");
        assert_eq!(ingest.submit_input(), Ok(true));
        ingest.settle().await;

        assert_eq!(
            gateway.ingest_requests(),
            vec![IngestRequest {
                repo_url: "HTTPS://GitHub.com/Acme/Widgets".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_poll_applies_finished_result() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_ingest(Ok(IngestResponse {
            repo_id: "abc123".to_string(),
            message: "ok".to_string(),
            status: None,
        }));
        let mut ingest = controller(&gateway);
        ingest.input_mut().set("https://github.com/acme/widgets");
        assert_eq!(ingest.submit_input(), Ok(true));

        let mut outcome = None;
        for _ in 0..100 {
            tokio::task::yield_now().await;
            outcome = ingest.poll();
            if outcome.is_some() {
                break;
            }
        }
        assert!(matches!(outcome, Some(IngestOutcome::Ready(_))));
        assert_eq!(ingest.state(), InteractionState::Idle);
    }
}
