//! Materialization and playback of spoken answers.
//!
//! The server renders answers to speech and ships the bytes as a binary
//! frame (MP3). Playback is a best-effort side effect behind the
//! [`AudioSink`] seam: the session schedules it after a short fixed delay
//! so the attached entry is rendered before sound starts, and never
//! retries.

use docchat_core::AudioRef;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{error, info};

/// Delay between attaching audio to an entry and triggering playback.
pub const PLAYBACK_DELAY: Duration = Duration::from_millis(150);

/// Destination for playable audio payloads.
pub trait AudioSink: Send + Sync {
    fn play(&self, audio: &AudioRef);
}

/// Fires `sink.play` once, [`PLAYBACK_DELAY`] from now.
pub fn schedule_playback(sink: Arc<dyn AudioSink>, audio: AudioRef) {
    tokio::spawn(async move {
        tokio::time::sleep(PLAYBACK_DELAY).await;
        sink.play(&audio);
    });
}

/// Default sink: writes the payload to a uniquely named file under a target
/// directory and logs its path for the user to open. The files are left for
/// OS temp cleanup.
pub struct TempFileSink {
    dir: PathBuf,
    counter: AtomicU64,
}

impl TempFileSink {
    pub fn new() -> Self {
        Self::in_dir(std::env::temp_dir())
    }

    pub fn in_dir(dir: PathBuf) -> Self {
        Self {
            dir,
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for TempFileSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for TempFileSink {
    fn play(&self, audio: &AudioRef) {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        let path = self
            .dir
            .join(format!("docchat-{}-{}.mp3", std::process::id(), sequence));
        match std::fs::write(&path, audio.as_bytes()) {
            Ok(()) => info!(path = %path.display(), "Spoken answer saved"),
            Err(e) => error!(error = %e, path = %path.display(), "Failed to write audio payload"),
        }
    }
}
