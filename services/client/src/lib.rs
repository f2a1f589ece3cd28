//! Docchat Client Library Crate
//!
//! The communication layer of the docchat terminal client: configuration,
//! the read-once credential store, the WebSocket connection and its event
//! protocol, and the session loop that feeds the `docchat-core` state
//! machine. The `docchat` binary is a thin front-end around this library.

pub mod audio;
pub mod config;
pub mod credentials;
pub mod ws;
