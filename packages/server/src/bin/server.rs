//! Line-based TCP chat server.
//!
//! Clients log in with `login:<name>` and then chat; every message is broadcast to all
//! connected clients. Try it with netcat:
//!
//! ```not_rust
//! cargo run --bin besedka-server
//! cargo run --bin besedka-server -- --port 7410 --http-port 7411
//! nc 127.0.0.1 7410
//! ```

use std::{collections::HashMap, sync::Arc};

use besedka_server::{
    config::{DEFAULT_MAX_LINE_LENGTH, DEFAULT_PORT, ServerConfig},
    domain::{HistoryFormatter, LastEntryRule, Lobby, history::DEFAULT_HISTORY_WINDOW},
    infrastructure::{message_pusher::ChannelMessagePusher, repository::InMemoryLobbyRepository},
    ui::{Server, state::AppState},
};
use besedka_shared::logger::setup_logger;
use clap::Parser;
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "besedka-server")]
#[command(about = "Line-based TCP chat server with login and history replay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port number for chat connections
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Port number for the read-only status API (disabled when omitted)
    #[arg(long)]
    http_port: Option<u16>,

    /// Number of recent messages replayed to a client after login
    #[arg(long, default_value_t = DEFAULT_HISTORY_WINDOW as u16, value_parser = clap::value_parser!(u16).range(1..))]
    history_window: u16,

    /// Longest accepted line in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_LENGTH)]
    max_line_length: usize,

    /// Use the closing phrase for the newest replayed message even when older
    /// messages fall outside the window
    #[arg(long)]
    mark_newest: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            http_port: args.http_port,
            history_window: usize::from(args.history_window),
            max_line_length: args.max_line_length,
            last_entry_rule: if args.mark_newest {
                LastEntryRule::Newest
            } else {
                LastEntryRule::LogLength
            },
        }
    }
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_CRATE_NAME"), env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::from(Args::parse());

    // 1. Repository (in-memory; the session log lives as long as the process)
    let repository = Arc::new(InMemoryLobbyRepository::new(Arc::new(Mutex::new(
        Lobby::new(),
    ))));

    // 2. MessagePusher
    let message_pusher = Arc::new(ChannelMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    // 3. UseCases
    let formatter = HistoryFormatter::new(config.history_window, config.last_entry_rule);
    let state = Arc::new(AppState::new(repository, message_pusher, formatter));

    // 4. Server
    tracing::info!("Server started");
    if let Err(e) = Server::new(state, config).run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
