//! Owns the lifecycle of the single socket connection for a chat channel
//! and performs the credential handshake.

use super::codec::{self, OutboundFrame};
use super::protocol::ClientEvent;
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};
use tracing::{debug, error, info, warn};

/// The underlying transport stream.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A failure to establish the socket connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("Failed to connect to {url}: {source}")]
    Dial {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
}

/// Lifecycle state of the session's connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// Builds the target address: the configured base plus the fixed `ws/`
/// route and the channel segment.
pub fn channel_url(base: &str, channel: &str) -> String {
    format!("{}/ws/{}/", base.trim_end_matches('/'), channel)
}

/// The session's socket connection: state plus the write half.
///
/// Outbound traffic is attempted only while `Open`; anything else is
/// dropped, not queued. There is no automatic reconnection.
pub struct Connection {
    state: ConnectionState,
    sink: Option<SplitSink<WsStream, Message>>,
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Connecting,
            sink: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Dials the server and returns the read half of the socket.
    ///
    /// If a credential token is available, the `auth` envelope is written
    /// immediately after open, before any user-initiated traffic. No
    /// acknowledgement is awaited.
    pub async fn open(
        &mut self,
        url: &str,
        token: Option<&str>,
    ) -> Result<SplitStream<WsStream>, ConnectError> {
        let (stream, _response) = match connect_async(url).await {
            Ok(connected) => connected,
            Err(source) => {
                self.state = ConnectionState::Closed;
                return Err(ConnectError::Dial {
                    url: url.to_string(),
                    source,
                });
            }
        };

        let (sink, stream) = stream.split();
        self.sink = Some(sink);
        self.state = ConnectionState::Open;
        info!(%url, "WebSocket connection established");

        if let Some(token) = token {
            self.send(OutboundFrame::Event(ClientEvent::Auth {
                token: token.to_string(),
            }))
            .await;
        }

        Ok(stream)
    }

    /// Writes one frame if the connection is open; drops it otherwise.
    ///
    /// Write failures are logged only. The paired close event, when the
    /// transport delivers one, is what drives the `Closed` transition.
    pub async fn send(&mut self, frame: OutboundFrame) {
        if self.state != ConnectionState::Open {
            warn!(state = ?self.state, "Dropping outbound frame: connection is not open");
            return;
        }
        let Some(sink) = self.sink.as_mut() else {
            warn!("Dropping outbound frame: no transport");
            return;
        };

        match codec::encode(frame) {
            Ok(message) => {
                if let Err(e) = sink.send(message).await {
                    error!(error = %e, "Failed to write frame to socket");
                }
            }
            Err(e) => error!(error = %e, "Failed to encode outbound frame"),
        }
    }

    /// Records that the transport closed. No reconnection is attempted.
    pub fn mark_closed(&mut self) {
        if self.state != ConnectionState::Closed {
            info!("Connection closed");
        }
        self.state = ConnectionState::Closed;
    }

    /// Closes the transport if open; safe to call repeatedly.
    pub async fn disconnect(&mut self) {
        if self.state == ConnectionState::Open {
            if let Some(sink) = self.sink.as_mut() {
                if let Err(e) = sink.send(Message::Close(None)).await {
                    debug!(error = %e, "Close frame not delivered");
                }
            }
        }
        self.state = ConnectionState::Closed;
    }
}
