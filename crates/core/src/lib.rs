//! Docchat Core
//!
//! Domain logic for the docchat client: the chat-log data model, the
//! conversation state machine that consumes protocol events, and upload
//! validation. This crate performs no I/O; the transport layer in
//! `docchat-client` feeds it events and carries out the `OutboundEvent`
//! commands it returns.

pub mod entry;
pub mod store;
pub mod upload;

pub use entry::{AudioRef, ChatEntry, EntryKind};
pub use store::{ChatSessionStore, LogUpdate, OutboundEvent};
