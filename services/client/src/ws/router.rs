//! Demultiplexes inbound frames into the listener table.
//!
//! The router holds at most one handler per event name; subscribing again
//! silently replaces the previous handler. Handlers receive a mutable
//! context instead of capturing shared state, so every log mutation happens
//! inside the single-consumer dispatch loop and no locking is needed.

use super::codec::InboundFrame;
use super::protocol::event;
use bytes::Bytes;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Handler for a structured event; receives the envelope payload.
pub type JsonHandler<C> = Box<dyn FnMut(&mut C, Value) + Send>;
/// Handler for raw binary frames.
pub type BinaryHandler<C> = Box<dyn FnMut(&mut C, Bytes) + Send>;

enum Handler<C> {
    Json(JsonHandler<C>),
    Binary(BinaryHandler<C>),
}

/// The listener table: event name to handler, with the distinguished
/// `"binary"` key for raw frames.
pub struct EventRouter<C> {
    handlers: HashMap<String, Handler<C>>,
}

impl<C> Default for EventRouter<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> EventRouter<C> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers the handler for an event name, replacing any previous one.
    pub fn subscribe(
        &mut self,
        event: &str,
        handler: impl FnMut(&mut C, Value) + Send + 'static,
    ) {
        self.handlers
            .insert(event.to_string(), Handler::Json(Box::new(handler)));
    }

    /// Registers the handler for raw binary frames, replacing any previous one.
    pub fn subscribe_binary(&mut self, handler: impl FnMut(&mut C, Bytes) + Send + 'static) {
        self.handlers
            .insert(event::BINARY.to_string(), Handler::Binary(Box::new(handler)));
    }

    /// Removes the handler for an event name; dispatch for that name
    /// becomes a silent no-op until re-subscribed.
    pub fn unsubscribe(&mut self, event: &str) {
        self.handlers.remove(event);
    }

    /// Routes one decoded frame to its handler. Unmatched events are not
    /// errors; they are dropped.
    pub fn dispatch(&mut self, ctx: &mut C, frame: InboundFrame) {
        match frame {
            InboundFrame::Event(envelope) => match self.handlers.get_mut(&envelope.event) {
                Some(Handler::Json(handler)) => handler(ctx, envelope.data),
                Some(Handler::Binary(_)) => {
                    debug!(event = %envelope.event, "Text frame hit a binary handler; dropping");
                }
                None => trace!(event = %envelope.event, "No handler subscribed; dropping event"),
            },
            InboundFrame::Binary(payload) => match self.handlers.get_mut(event::BINARY) {
                Some(Handler::Binary(handler)) => handler(ctx, payload),
                Some(Handler::Json(_)) => {
                    debug!("Binary frame hit a text handler; dropping");
                }
                None => trace!("No binary handler subscribed; dropping payload"),
            },
        }
    }
}
