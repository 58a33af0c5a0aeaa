mod controller;
mod engine;
mod null_engine;
mod stop_key;

pub use controller::{CancelToken, PlaybackController, PlaybackOutcome};
pub use engine::{AudioEngine, RodioEngine};
pub use null_engine::NullEngine;
pub use stop_key::StopKeyWatcher;
