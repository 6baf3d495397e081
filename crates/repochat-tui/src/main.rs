use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use repochat_core::config::API_URL_ENV;
use repochat_core::{Config, HttpGateway, RequestGateway, SessionId};
use tracing_subscriber::EnvFilter;

mod app;
mod commands;
mod handler;
mod markdown;
mod tui;
mod ui;

use app::App;

#[derive(Parser)]
#[command(name = "repochat")]
#[command(about = "Index a GitHub repository and ask questions about it", version)]
struct Cli {
    /// Base URL of the indexing backend
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Open the chat view for an already-ingested repository id
    #[arg(long)]
    session: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a repository and print its session id
    Ingest {
        /// Repository URL, e.g. https://github.com/username/repo
        url: String,
    },
    /// Ask one question about an ingested repository
    Ask {
        /// Session id returned by `ingest`
        #[arg(short, long)]
        session: String,
        /// Your question
        question: String,
    },
    /// Check that the backend is reachable
    Health,
    /// Print the effective configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()
        .unwrap_or_else(|_| Config::new())
        .with_overrides(std::env::var(API_URL_ENV).ok(), cli.api_url.clone());

    let interactive = cli.command.is_none();
    init_logging(interactive);
    tracing::debug!(api_url = %config.api_url, "configuration loaded");

    let gateway: Arc<dyn RequestGateway> =
        Arc::new(HttpGateway::new(&config.api_url, config.timeout())?);

    match cli.command {
        None => run_tui(gateway, &config, cli.session).await,
        Some(Commands::Ingest { url }) => commands::ingest(gateway, &url).await,
        Some(Commands::Ask { session, question }) => {
            commands::ask(gateway, &session, &question).await
        }
        Some(Commands::Health) => commands::health(gateway.as_ref(), &config.api_url).await,
        Some(Commands::Config { save }) => commands::config(&config, save),
    }
}

/// Log to stderr for one-shot commands; the TUI owns stderr, so there we log
/// to a file next to the config.
fn init_logging(interactive: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("repochat=info,repochat_core=info,warn"));

    if interactive {
        let log_file = Config::config_dir().and_then(|dir| {
            std::fs::create_dir_all(&dir)?;
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("repochat.log"))
                .context("opening log file")
        });
        if let Ok(file) = log_file {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        return;
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_tui(
    gateway: Arc<dyn RequestGateway>,
    config: &Config,
    session: Option<String>,
) -> Result<()> {
    let mut app = match session.and_then(SessionId::new) {
        Some(session) => App::with_session(gateway, config.api_url.clone(), session),
        None => App::new(gateway, config.api_url.clone()),
    };

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new(config.tick_rate());

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;
            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event),
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    result
}
