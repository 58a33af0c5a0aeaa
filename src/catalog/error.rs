use std::path::PathBuf;
use thiserror::Error;

/// Errors that can surface from catalog operations.
///
/// Validation errors are reported before any side effect; not-found
/// conditions leave both stores untouched. None of these should ever
/// terminate the operator session.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("source file not found: {0:?}")]
    SourceNotFound(PathBuf),

    #[error("source path has no usable file name: {0:?}")]
    InvalidSourcePath(PathBuf),

    #[error("invalid song id: {0:?}")]
    InvalidId(String),

    #[error("song id {0} not found")]
    SongNotFound(i64),

    #[error("unrecognized field: {0:?} (expected artist, song_name, release_date or tags)")]
    UnknownField(String),

    #[error("invalid release date {0:?}, expected YYYY-MM-DD")]
    InvalidReleaseDate(String),

    #[error("no fields to modify")]
    EmptyUpdate,

    #[error("no songs matching artist {artist:?} with format {format:?}, nothing to export")]
    NothingToExport { artist: String, format: String },

    #[error("stored file missing for song {id}: {file_name:?}")]
    StoredFileMissing { id: i64, file_name: String },

    #[error("playback error: {0}")]
    Playback(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
