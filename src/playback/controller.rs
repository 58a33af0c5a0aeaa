use super::engine::AudioEngine;
use anyhow::Result;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Shared cancellation flag checked on every poll iteration. Cloned into
/// the ctrlc handler and the stop-key watcher so an interrupt from either
/// side halts playback.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Clears a previously triggered cancellation before reuse.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Completed,
    Cancelled,
}

/// Owns the audio engine and the blocking wait loop. Whatever way the loop
/// exits (natural end, cancellation, load failure) the engine is stopped
/// before returning.
pub struct PlaybackController {
    engine: Box<dyn AudioEngine>,
    poll_interval: Duration,
}

impl PlaybackController {
    pub fn new(engine: Box<dyn AudioEngine>, poll_interval: Duration) -> Self {
        PlaybackController {
            engine,
            poll_interval,
        }
    }

    /// Loads the file, starts playback and blocks until it finishes or the
    /// token is cancelled.
    pub fn play_blocking(&mut self, path: &Path, cancel: &CancelToken) -> Result<PlaybackOutcome> {
        if let Err(err) = self.engine.load(path) {
            self.engine.stop();
            return Err(err);
        }

        let outcome = loop {
            if cancel.is_cancelled() {
                break PlaybackOutcome::Cancelled;
            }
            if !self.engine.is_busy() {
                break PlaybackOutcome::Completed;
            }
            std::thread::sleep(self.poll_interval);
        };

        self.engine.stop();
        debug!("Playback of {:?} ended: {:?}", path, outcome);
        Ok(outcome)
    }
}
