//! Main Entrypoint for the docchat Terminal Client
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment and CLI flags.
//! 2. Initializing logging.
//! 3. Opening the chat session (credential read, dial, auth handshake).
//! 4. Running the interactive loop: stdin commands in, log updates out.
//! 5. Disconnecting cleanly on `/quit`, EOF, or Ctrl+C.

use anyhow::Context;
use clap::Parser;
use docchat_client::{
    audio::TempFileSink,
    config::Config,
    ws::{ChatSession, UserAction},
};
use docchat_core::LogUpdate;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Terminal client for the document-question-answering chat service.
#[derive(Parser, Debug)]
#[command(name = "docchat", version, about)]
struct Cli {
    /// WebSocket base address (overrides SERVER_URL).
    #[arg(long)]
    server_url: Option<String>,
    /// Chat channel to join (overrides CHAT_CHANNEL).
    #[arg(long)]
    channel: Option<String>,
    /// Credentials file to read the auth token from (overrides CREDENTIALS_PATH).
    #[arg(long)]
    credentials: Option<PathBuf>,
}

/// Listens for the `Ctrl+C` signal to end the session gracefully.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Disconnecting...");
}

fn print_help() {
    println!("Commands:");
    println!("  /file <path>   upload a document (.txt, .pdf, .docx)");
    println!("  /site <url>    index a website");
    println!("  /voice on|off  request spoken answers");
    println!("  /quit          leave the chat");
    println!("Anything else is sent as a question.");
}

fn render(update: &LogUpdate) {
    match update {
        LogUpdate::Appended { entries } => {
            for entry in entries {
                println!("{}", entry);
            }
        }
        LogUpdate::Resolved { entry, .. } => println!("{}", entry),
        LogUpdate::AudioAttached { .. } => println!("(spoken answer received)"),
        LogUpdate::AudioDiscarded => {}
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(server_url) = cli.server_url {
        config.server_url = server_url;
    }
    if let Some(channel) = cli.channel {
        config.channel = channel;
    }
    if let Some(credentials) = cli.credentials {
        config.credentials_path = credentials;
    }

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();

    // --- 3. Open the Session ---
    info!(
        server_url = %config.server_url,
        channel = %config.channel,
        "Connecting to chat service..."
    );
    let session = ChatSession::connect(&config, Arc::new(TempFileSink::new()))
        .await
        .context("Failed to open the chat session")?;
    let actions = session.actions;
    let mut updates = session.updates;

    // --- 4. Interactive Loop ---
    let printer = tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            render(&update);
        }
        println!("(disconnected)");
    });

    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut voice_enabled = false;
    loop {
        tokio::select! {
            _ = shutdown_signal() => {
                let _ = actions.send(UserAction::Disconnect).await;
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    let _ = actions.send(UserAction::Disconnect).await;
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                if let Some(path) = line.strip_prefix("/file ") {
                    let path = PathBuf::from(path.trim());
                    match tokio::fs::read(&path).await {
                        Ok(bytes) => {
                            let filename = path
                                .file_name()
                                .and_then(|name| name.to_str())
                                .unwrap_or("upload")
                                .to_string();
                            let _ = actions.send(UserAction::UploadFile { filename, bytes }).await;
                        }
                        Err(e) => eprintln!("Could not read {}: {}", path.display(), e),
                    }
                } else if let Some(url) = line.strip_prefix("/site ") {
                    let _ = actions
                        .send(UserAction::AddWebsite { url: url.trim().to_string() })
                        .await;
                } else if line == "/voice on" {
                    voice_enabled = true;
                    println!("(spoken answers enabled)");
                } else if line == "/voice off" {
                    voice_enabled = false;
                    println!("(spoken answers disabled)");
                } else if line == "/quit" {
                    let _ = actions.send(UserAction::Disconnect).await;
                    break;
                } else if line.starts_with('/') {
                    print_help();
                } else {
                    let _ = actions
                        .send(UserAction::Ask { text: line.to_string(), audio: voice_enabled })
                        .await;
                }
            }
        }
    }

    // --- 5. Shutdown ---
    let _ = session.task.await;
    let _ = printer.await;
    info!("Session closed.");
    Ok(())
}
