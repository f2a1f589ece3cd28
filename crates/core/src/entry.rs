//! The chat-log data model: entry kinds, entries, and audio handles.

use bytes::Bytes;
use std::fmt;

/// Classifies a chat-log entry.
///
/// Entries are immutable after creation, with one exception: an `Answer`
/// entry may later gain an [`AudioRef`] when the spoken rendering of the
/// answer arrives as a binary frame. `AudioCarrier` is reserved for entries
/// whose only content is audio; the wire protocol permits spoken-only
/// answers but no current transition produces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Status,
    Error,
    Answer,
    Question,
    Upload,
    Website,
    Loading,
    AudioCarrier,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Status => "status",
            EntryKind::Error => "error",
            EntryKind::Answer => "answer",
            EntryKind::Question => "question",
            EntryKind::Upload => "upload",
            EntryKind::Website => "website",
            EntryKind::Loading => "loading",
            EntryKind::AudioCarrier => "audio",
        };
        write!(f, "{}", label)
    }
}

/// A cheap-clone handle to a received audio payload.
///
/// The bytes are reference-counted; every clone shares the same buffer, and
/// the buffer is released when the last holder (normally the log entry the
/// audio is attached to) is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioRef(Bytes);

impl AudioRef {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self(payload.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One item in the ordered, append-only chat log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub kind: EntryKind,
    pub text: String,
    pub audio: Option<AudioRef>,
}

impl ChatEntry {
    pub fn new(kind: EntryKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            audio: None,
        }
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }
}

impl fmt::Display for ChatEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.text)
    }
}
