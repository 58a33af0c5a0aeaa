//! SongStore trait definition.

use crate::catalog::{FieldUpdate, NewSong, SongEntry, SongId};
use anyhow::Result;

/// Trait for the metadata storage backend.
///
/// All statements are parameterized; the column touched by each
/// [`FieldUpdate`] variant comes from a fixed enumeration, never from
/// caller-supplied text. Multi-statement writes are transactional: they
/// either commit entirely or leave the store unchanged.
pub trait SongStore: Send + Sync {
    /// Insert a row and return the generated id.
    fn insert_song(&self, song: &NewSong) -> Result<SongId>;

    /// Fetch one row by id.
    fn get_song(&self, id: SongId) -> Result<Option<SongEntry>>;

    /// Delete one row by id. Returns false if no row matched.
    fn delete_song(&self, id: SongId) -> Result<bool>;

    /// Apply the given field updates to one row inside a single
    /// transaction (all-or-nothing).
    fn update_song_fields(&self, id: SongId, updates: &[FieldUpdate]) -> Result<()>;

    /// All rows with exactly this artist, in insertion (id) order.
    fn find_by_artist(&self, artist: &str) -> Result<Vec<SongEntry>>;

    /// Number of rows in the catalog.
    fn count_songs(&self) -> Result<usize>;
}
