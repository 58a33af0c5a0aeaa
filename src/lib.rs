//! SongStorage Library
//!
//! This library exposes the internal modules for testing and potential reuse.
//! The `song-storage` binary wires them into an interactive operator shell.

pub mod catalog;
pub mod config;
pub mod content_store;
pub mod playback;
pub mod savelist;
pub mod song_store;

// Re-export commonly used types for convenience
pub use catalog::{CatalogError, CatalogManager, FieldUpdate, SongEntry, SongField};
pub use content_store::ContentStore;
pub use playback::{AudioEngine, CancelToken, NullEngine, PlaybackController};
pub use savelist::SavelistSummary;
pub use song_store::{SongStore, SqliteSongStore};
