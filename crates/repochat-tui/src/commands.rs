//! One-shot subcommands that drive the controllers without a terminal UI.

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use repochat_core::{
    ChatOutcome, ChatSession, Config, IngestController, IngestOutcome, RepoLocator, RequestGateway,
    SessionId,
};

pub async fn ingest(gateway: Arc<dyn RequestGateway>, url: &str) -> Result<()> {
    RepoLocator::parse(url)?;
    let url = url.trim();
    let mut controller = IngestController::new(gateway);

    eprintln!("Indexing {url}... (This may take a minute)");
    controller.submit(url);

    match controller.settle().await {
        Some(IngestOutcome::Ready(session)) => {
            println!("{session}");
            Ok(())
        }
        _ => Err(anyhow!(
            "{}",
            controller.error().unwrap_or(repochat_core::INGEST_FALLBACK)
        )),
    }
}

pub async fn ask(gateway: Arc<dyn RequestGateway>, session: &str, question: &str) -> Result<()> {
    let Some(session) = SessionId::new(session) else {
        bail!("session id must not be empty");
    };
    let mut chat = ChatSession::new(session, gateway);
    if !chat.ask(question) {
        bail!("question must not be empty");
    }

    match chat.settle().await {
        Some(ChatOutcome::Answered) => {
            if let Some(answer) = chat.transcript().last() {
                println!("{}", answer.body);
            }
            Ok(())
        }
        _ => Err(anyhow!(
            "{}",
            chat.error().unwrap_or(repochat_core::CHAT_FALLBACK)
        )),
    }
}

pub async fn health(gateway: &dyn RequestGateway, api_url: &str) -> Result<()> {
    let health = gateway
        .health()
        .await
        .map_err(|e| anyhow!("backend at {api_url} is not reachable: {e}"))?;
    println!("{api_url}: {}", health.message);
    Ok(())
}

pub fn config(config: &Config, save: bool) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    if save {
        config.save()?;
        eprintln!("Saved to {}", Config::config_path()?.display());
    }
    Ok(())
}
