//! The conversation state machine.
//!
//! `ChatSessionStore` owns the ordered, append-only chat log and implements
//! every transition the protocol defines: user actions (question, upload,
//! website) and inbound events (status, error, answer, binary audio). Each
//! operation returns a single [`LogUpdate`] describing the observable
//! mutation, so a reader sees the question-plus-loading append as one
//! atomic change. User actions additionally return the [`OutboundEvent`]
//! the transport layer should transmit; the store itself performs no I/O.

use crate::entry::{AudioRef, ChatEntry, EntryKind};
use crate::upload;
use tracing::{debug, warn};

/// Placeholder text shown while a question is outstanding.
const LOADING_TEXT: &str = "Thinking...";

/// An outbound protocol event the runtime should send to the server.
///
/// The core issues these as commands instead of writing to the socket
/// itself; whether the send actually happens depends on the connection
/// state (sends while disconnected are dropped, not queued).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    Question { text: String, audio: bool },
    Upload { filename: String, bytes: Vec<u8> },
    Website { url: String },
}

/// One observable mutation of the chat log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogUpdate {
    /// New entries appended to the tail, in order.
    Appended { entries: Vec<ChatEntry> },
    /// A server response: `cleared` loading entries removed, then one entry
    /// appended.
    Resolved { cleared: usize, entry: ChatEntry },
    /// Audio attached to the answer entry at `index`.
    AudioAttached { index: usize },
    /// A binary payload arrived with no answer entry to attach to.
    AudioDiscarded,
}

/// The per-session chat log and its transition rules.
#[derive(Debug, Default)]
pub struct ChatSessionStore {
    entries: Vec<ChatEntry>,
}

impl ChatSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ordered log, oldest entry first.
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    /// True while a question is outstanding and unanswered.
    pub fn has_pending_loading(&self) -> bool {
        self.entries.iter().any(|e| e.kind == EntryKind::Loading)
    }

    /// The user submitted a question. Appends the question and a loading
    /// placeholder in one update and returns the event to send.
    pub fn ask(&mut self, text: &str, audio: bool) -> (LogUpdate, OutboundEvent) {
        let appended = self.append_all(vec![
            ChatEntry::new(EntryKind::Question, text),
            ChatEntry::new(EntryKind::Loading, LOADING_TEXT),
        ]);
        let event = OutboundEvent::Question {
            text: text.to_string(),
            audio,
        };
        (appended, event)
    }

    /// The user selected a file. The extension allow-list is checked before
    /// any network interaction: a mismatch appends a local error entry and
    /// sends nothing.
    pub fn upload(
        &mut self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> (LogUpdate, Option<OutboundEvent>) {
        if let Err(rejection) = upload::validate_filename(filename) {
            debug!(%filename, "Rejected upload with unsupported extension");
            let update =
                self.append_all(vec![ChatEntry::new(EntryKind::Error, rejection.to_string())]);
            return (update, None);
        }

        let update = self.append_all(vec![ChatEntry::new(
            EntryKind::Upload,
            format!("Uploading {}...", filename),
        )]);
        let event = OutboundEvent::Upload {
            filename: filename.to_string(),
            bytes,
        };
        (update, Some(event))
    }

    /// The user submitted a website address. No validation beyond non-empty.
    pub fn website(&mut self, url: &str) -> (LogUpdate, Option<OutboundEvent>) {
        if url.trim().is_empty() {
            let update =
                self.append_all(vec![ChatEntry::new(EntryKind::Error, "No URL provided.")]);
            return (update, None);
        }

        let update = self.append_all(vec![ChatEntry::new(
            EntryKind::Website,
            format!("Indexing website: {}", url),
        )]);
        let event = OutboundEvent::Website {
            url: url.to_string(),
        };
        (update, Some(event))
    }

    /// Inbound `status` event.
    pub fn status_received(&mut self, text: String) -> LogUpdate {
        self.resolve(EntryKind::Status, text)
    }

    /// Inbound `error` event.
    pub fn error_received(&mut self, text: String) -> LogUpdate {
        self.resolve(EntryKind::Error, text)
    }

    /// Inbound `answer` event, the terminal response to the most recent
    /// question. Responses carry no correlation identifier; ordering is the
    /// contract.
    pub fn answer_received(&mut self, text: String) -> LogUpdate {
        self.resolve(EntryKind::Answer, text)
    }

    /// Inbound binary frame: attach the audio to the most recent answer
    /// entry that still lacks one, scanning from the tail. With no such
    /// entry the payload is discarded.
    pub fn audio_received(&mut self, audio: AudioRef) -> LogUpdate {
        let target = self
            .entries
            .iter()
            .enumerate()
            .rev()
            .find(|(_, e)| e.kind == EntryKind::Answer && !e.has_audio())
            .map(|(index, _)| index);

        match target {
            Some(index) => {
                self.entries[index].audio = Some(audio);
                LogUpdate::AudioAttached { index }
            }
            None => {
                warn!(
                    payload_len = audio.len(),
                    "Discarding audio payload: no answer entry to attach to"
                );
                LogUpdate::AudioDiscarded
            }
        }
    }

    /// Every server response clears outstanding loading placeholders before
    /// its entry is appended.
    fn resolve(&mut self, kind: EntryKind, text: String) -> LogUpdate {
        let before = self.entries.len();
        self.entries.retain(|e| e.kind != EntryKind::Loading);
        let cleared = before - self.entries.len();

        let entry = ChatEntry::new(kind, text);
        self.entries.push(entry.clone());
        LogUpdate::Resolved { cleared, entry }
    }

    fn append_all(&mut self, entries: Vec<ChatEntry>) -> LogUpdate {
        self.entries.extend(entries.iter().cloned());
        LogUpdate::Appended { entries }
    }
}
