use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Seam to the audio engine: load a file and start playing it, stop, and
/// report whether playback is still running. Everything above this trait is
/// engine-agnostic.
pub trait AudioEngine {
    /// Loads the file and starts playback.
    fn load(&mut self, path: &Path) -> Result<()>;

    /// Halts playback and releases the loaded file. Safe to call when
    /// nothing is playing.
    fn stop(&mut self);

    /// True while playback is still running.
    fn is_busy(&self) -> bool;
}

/// Audio output via rodio: one sink at a time on the default output device.
pub struct RodioEngine {
    // The stream must stay alive for the sink to keep playing.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
}

impl RodioEngine {
    pub fn new() -> Result<Self> {
        let (_stream, handle) =
            OutputStream::try_default().context("Failed to open default audio output device")?;
        Ok(RodioEngine {
            _stream,
            handle,
            sink: None,
        })
    }
}

impl AudioEngine for RodioEngine {
    fn load(&mut self, path: &Path) -> Result<()> {
        self.stop();

        let file = File::open(path)
            .with_context(|| format!("Failed to open audio file {:?}", path))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("Failed to decode audio file {:?}", path))?;
        let sink = Sink::try_new(&self.handle).context("Failed to create playback sink")?;
        sink.append(source);
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().map(|s| !s.empty()).unwrap_or(false)
    }
}
