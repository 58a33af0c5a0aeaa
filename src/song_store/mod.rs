mod schema;
mod sqlite_song_store;
mod trait_def;

pub use sqlite_song_store::SqliteSongStore;
pub use trait_def::SongStore;
