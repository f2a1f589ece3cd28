//! WebSocket Communication Layer
//!
//! Everything that touches the socket lives here, split into submodules:
//!
//! - `protocol`: the JSON envelope format and the typed outbound events.
//! - `codec`: the shared frame encode/decode contract for both directions.
//! - `router`: the listener table that demultiplexes inbound frames.
//! - `connection`: socket lifecycle, auth handshake, and the send gateway.
//! - `session`: the dispatch loop tying the connection to the chat store.

pub mod codec;
pub mod connection;
pub mod protocol;
pub mod router;
pub mod session;

pub use session::{ChatSession, SessionHandle, UserAction};
