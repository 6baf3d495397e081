pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod gateway;
pub mod ingest;
pub mod input;
pub mod locator;
pub mod state;

mod flight;
#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use api::{ChatRequest, ChatResponse, HealthResponse, IngestRequest, IngestResponse};
pub use chat::{ChatOutcome, ChatSession};
pub use config::Config;
pub use error::{failure_message, GatewayError, LocatorError, CHAT_FALLBACK, INGEST_FALLBACK};
pub use gateway::{HttpGateway, RequestGateway};
pub use ingest::{IngestController, IngestOutcome};
pub use input::InputBuffer;
pub use locator::RepoLocator;
pub use state::{ChatMessage, InteractionState, Origin, SessionId};
