//! The chat session: one connection, one router, one store, one loop.
//!
//! The transport produces a strictly ordered stream of inbound frames; the
//! session consumes it together with the user-action channel in a single
//! `select!` loop, so every log mutation and every send happens from one
//! task. Frames are processed in delivery order with no reordering buffer,
//! which is what guarantees an answer entry exists before the binary frame
//! meant for it is dispatched.

use super::codec::{self, OutboundFrame};
use super::connection::{channel_url, ConnectError, Connection, WsStream};
use super::protocol::event;
use super::router::EventRouter;
use crate::audio::{self, AudioSink};
use crate::config::Config;
use crate::credentials;
use docchat_core::{AudioRef, ChatSessionStore, LogUpdate};
use futures_util::{StreamExt, stream::SplitStream};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{error, info, warn};

/// A user interaction forwarded into the session loop.
#[derive(Debug)]
pub enum UserAction {
    Ask { text: String, audio: bool },
    UploadFile { filename: String, bytes: Vec<u8> },
    AddWebsite { url: String },
    Disconnect,
}

/// Front-end handle to a running session: send actions in, read log
/// updates out. The updates channel closing is the disconnect signal.
pub struct SessionHandle {
    pub actions: mpsc::Sender<UserAction>,
    pub updates: mpsc::UnboundedReceiver<LogUpdate>,
    pub task: JoinHandle<()>,
}

/// Everything the inbound handlers may touch, owned by the session loop.
struct SessionContext {
    store: ChatSessionStore,
    updates: mpsc::UnboundedSender<LogUpdate>,
    audio_sink: Arc<dyn AudioSink>,
}

impl SessionContext {
    fn publish(&self, update: LogUpdate) {
        if self.updates.send(update).is_err() {
            warn!("Dropping log update: receiver is gone");
        }
    }
}

/// Status payloads may be plain strings or structured; anything structured
/// is displayed in its compact JSON form.
fn display_text(data: Value) -> String {
    match data {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Builds the listener table for the inbound half of the protocol.
fn build_router() -> EventRouter<SessionContext> {
    let mut router = EventRouter::new();

    router.subscribe(event::STATUS, |ctx: &mut SessionContext, data| {
        let update = ctx.store.status_received(display_text(data));
        ctx.publish(update);
    });
    router.subscribe(event::ERROR, |ctx: &mut SessionContext, data| {
        let update = ctx.store.error_received(display_text(data));
        ctx.publish(update);
    });
    router.subscribe(event::ANSWER, |ctx: &mut SessionContext, data| {
        let update = ctx.store.answer_received(display_text(data));
        ctx.publish(update);
    });
    router.subscribe_binary(|ctx: &mut SessionContext, payload| {
        let audio = AudioRef::new(payload);
        let update = ctx.store.audio_received(audio.clone());
        if matches!(update, LogUpdate::AudioAttached { .. }) {
            audio::schedule_playback(ctx.audio_sink.clone(), audio);
        }
        ctx.publish(update);
    });

    router
}

/// A chat session over one socket connection.
pub struct ChatSession;

impl ChatSession {
    /// Reads the credential token once, dials the channel, and spawns the
    /// session loop.
    pub async fn connect(
        config: &Config,
        audio_sink: Arc<dyn AudioSink>,
    ) -> Result<SessionHandle, ConnectError> {
        let token = credentials::load_token(&config.credentials_path);
        let url = channel_url(&config.server_url, &config.channel);

        let mut connection = Connection::new();
        let stream = connection.open(&url, token.as_deref()).await?;

        let (actions_tx, actions_rx) = mpsc::channel(32);
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let ctx = SessionContext {
            store: ChatSessionStore::new(),
            updates: updates_tx,
            audio_sink,
        };

        let task = tokio::spawn(run_session(
            connection,
            stream,
            build_router(),
            ctx,
            actions_rx,
        ));

        Ok(SessionHandle {
            actions: actions_tx,
            updates: updates_rx,
            task,
        })
    }
}

/// The single-consumer dispatch loop.
async fn run_session(
    mut connection: Connection,
    mut stream: SplitStream<WsStream>,
    mut router: EventRouter<SessionContext>,
    mut ctx: SessionContext,
    mut actions: mpsc::Receiver<UserAction>,
) {
    loop {
        tokio::select! {
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => {
                    connection.mark_closed();
                    break;
                }
                Some(Ok(message)) => {
                    if let Some(frame) = codec::decode(message) {
                        router.dispatch(&mut ctx, frame);
                    }
                }
                Some(Err(e)) => {
                    // Logged only; the close that follows drives the state
                    // transition.
                    error!(error = %e, "WebSocket transport error");
                }
            },
            action = actions.recv() => match action {
                Some(UserAction::Ask { text, audio }) => {
                    let (update, outbound) = ctx.store.ask(&text, audio);
                    ctx.publish(update);
                    connection.send(OutboundFrame::Event(outbound.into())).await;
                }
                Some(UserAction::UploadFile { filename, bytes }) => {
                    let (update, outbound) = ctx.store.upload(&filename, bytes);
                    ctx.publish(update);
                    if let Some(outbound) = outbound {
                        connection.send(OutboundFrame::Event(outbound.into())).await;
                    }
                }
                Some(UserAction::AddWebsite { url }) => {
                    let (update, outbound) = ctx.store.website(&url);
                    ctx.publish(update);
                    if let Some(outbound) = outbound {
                        connection.send(OutboundFrame::Event(outbound.into())).await;
                    }
                }
                Some(UserAction::Disconnect) | None => {
                    connection.disconnect().await;
                    break;
                }
            },
        }
    }
    info!("Chat session finished");
}
