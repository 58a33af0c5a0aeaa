use super::entry::{FieldUpdate, NewSong, SongEntry, SongId};
use super::CatalogError;
use crate::content_store::ContentStore;
use crate::playback::{CancelToken, PlaybackController, PlaybackOutcome};
use crate::savelist::{SavelistBuilder, SavelistSummary};
use crate::song_store::SongStore;
use chrono::NaiveDate;
use std::path::Path;
use tracing::{error, info, warn};

/// Coordinates the metadata store and the content store so every catalog
/// entry is either fully present (file on disk plus matching row) or fully
/// absent. Sole writer of both stores.
///
/// The two stores have independent commit points, so partial-failure
/// windows exist by construction; each workflow orders its steps so the
/// preferred orphan direction is a file without a row, and logs every
/// detected inconsistency.
pub struct CatalogManager {
    store: Box<dyn SongStore>,
    content: ContentStore,
    playback: PlaybackController,
}

impl CatalogManager {
    pub fn new(
        store: Box<dyn SongStore>,
        content: ContentStore,
        playback: PlaybackController,
    ) -> Self {
        CatalogManager {
            store,
            content,
            playback,
        }
    }

    pub fn content_store(&self) -> &ContentStore {
        &self.content
    }

    pub fn song_count(&self) -> Result<usize, CatalogError> {
        Ok(self.store.count_songs()?)
    }

    /// Adds a song: copy into the content store first, then insert the
    /// metadata row. A crash or insert failure in between leaves an orphan
    /// file, the recoverable direction; a row without a file would break
    /// playback and export silently.
    pub fn add_song(
        &self,
        source: &Path,
        artist: Option<String>,
        song_name: Option<String>,
        release_date: Option<NaiveDate>,
        tags: Vec<String>,
    ) -> Result<SongId, CatalogError> {
        if !source.is_file() {
            return Err(CatalogError::SourceNotFound(source.to_path_buf()));
        }

        if source.file_name().and_then(|n| n.to_str()).is_none() {
            return Err(CatalogError::InvalidSourcePath(source.to_path_buf()));
        }
        let file_name = self.content.store(source)?;

        let song = NewSong {
            file_name: file_name.clone(),
            artist,
            song_name,
            release_date,
            tags,
        };
        let id = match self.store.insert_song(&song) {
            Ok(id) => id,
            Err(err) => {
                warn!(
                    "Insert failed after copying {:?}; orphan file left in the content store",
                    file_name
                );
                return Err(err.into());
            }
        };

        info!("Added song {} as {}", id, file_name);
        Ok(id)
    }

    /// Deletes a song: file removal first, then the row delete. A missing
    /// file does not block removing the dangling row. The file removal is
    /// not transactional, so a row-delete failure after it leaves an orphan
    /// row; that window is logged, never hidden.
    pub fn delete_song(&self, id: SongId) -> Result<(), CatalogError> {
        let entry = self
            .store
            .get_song(id)?
            .ok_or(CatalogError::SongNotFound(id))?;

        let mut file_removed = false;
        if self.content.contains(&entry.file_name) {
            self.content.remove(&entry.file_name)?;
            file_removed = true;
        } else {
            warn!(
                "Stored file {:?} for song {} is already gone, removing the dangling row",
                entry.file_name, id
            );
        }

        match self.store.delete_song(id) {
            Ok(_) => {
                info!("Deleted song {} ({})", id, entry.file_name);
                Ok(())
            }
            Err(err) => {
                if file_removed {
                    error!(
                        "Row delete for song {} failed after its file was removed; orphan row remains",
                        id
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Applies a set of raw (field name, value) pairs to one song. All
    /// fields are validated and parsed before any statement runs; the
    /// updates then commit together or not at all. The content store is
    /// never touched.
    pub fn modify_song(&self, id: SongId, fields: &[(String, String)]) -> Result<(), CatalogError> {
        if fields.is_empty() {
            return Err(CatalogError::EmptyUpdate);
        }
        let updates = fields
            .iter()
            .map(|(field, value)| FieldUpdate::parse(field, value))
            .collect::<Result<Vec<_>, _>>()?;

        if self.store.get_song(id)?.is_none() {
            return Err(CatalogError::SongNotFound(id));
        }

        self.store.update_song_fields(id, &updates)?;
        info!("Modified song {} ({} fields)", id, updates.len());
        Ok(())
    }

    /// Exact artist match plus case-sensitive extension suffix match, in
    /// insertion order. An empty result is a valid outcome.
    pub fn search_songs(
        &self,
        artist: &str,
        format: &str,
    ) -> Result<Vec<SongEntry>, CatalogError> {
        let entries = self.store.find_by_artist(artist)?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.has_format(format))
            .collect())
    }

    /// Exports all search matches into a single archive. Missing individual
    /// files are logged and skipped; the archive contains whatever was
    /// found.
    pub fn create_savelist(
        &self,
        destination: &Path,
        artist: &str,
        format: &str,
    ) -> Result<SavelistSummary, CatalogError> {
        let matches = self.search_songs(artist, format)?;
        if matches.is_empty() {
            return Err(CatalogError::NothingToExport {
                artist: artist.to_string(),
                format: format.to_string(),
            });
        }

        let files: Vec<_> = matches
            .iter()
            .filter_map(|entry| match self.content.resolve(&entry.file_name) {
                Ok(path) => Some((entry.file_name.clone(), path)),
                Err(err) => {
                    warn!("Skipping unresolvable stored name: {}", err);
                    None
                }
            })
            .collect();

        Ok(SavelistBuilder::build(destination, &files)?)
    }

    /// Plays one song, blocking until it ends or the token is cancelled.
    /// The audio engine is released on every exit path.
    pub fn play_song(
        &mut self,
        id: SongId,
        cancel: &CancelToken,
    ) -> Result<PlaybackOutcome, CatalogError> {
        let entry = self
            .store
            .get_song(id)?
            .ok_or(CatalogError::SongNotFound(id))?;

        let path = self.content.resolve(&entry.file_name)?;
        if !path.is_file() {
            warn!(
                "Song {} references {:?} but the file is not in the content store",
                id, entry.file_name
            );
            return Err(CatalogError::StoredFileMissing {
                id,
                file_name: entry.file_name,
            });
        }

        info!("Playing song {} ({})", id, entry.file_name);
        self.playback
            .play_blocking(&path, cancel)
            .map_err(|err| CatalogError::Playback(err.to_string()))
    }
}
