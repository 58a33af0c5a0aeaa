use super::engine::AudioEngine;
use anyhow::Result;
use std::path::Path;

/// An engine that plays nothing and finishes immediately. Used by tests and
/// by environments without an audio device.
#[derive(Default)]
pub struct NullEngine {
    loads: usize,
    stops: usize,
}

impl NullEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loads(&self) -> usize {
        self.loads
    }

    pub fn stops(&self) -> usize {
        self.stops
    }
}

impl AudioEngine for NullEngine {
    fn load(&mut self, _path: &Path) -> Result<()> {
        self.loads += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.stops += 1;
    }

    fn is_busy(&self) -> bool {
        false
    }
}
