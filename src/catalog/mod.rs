mod entry;
mod error;
mod manager;

pub use entry::{
    parse_release_date, parse_song_id, parse_tags, FieldUpdate, NewSong, SongEntry, SongField,
    SongId,
};
pub use error::CatalogError;
pub use manager::CatalogManager;
