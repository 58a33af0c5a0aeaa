pub struct Table {
    pub name: &'static str,
    pub schema: &'static str,
    pub indices: &'static [&'static str],
}

// AUTOINCREMENT keeps deleted ids from ever being reused.
const SONGS_TABLE_V_0: Table = Table {
    name: "songs",
    schema: "CREATE TABLE songs (id INTEGER PRIMARY KEY AUTOINCREMENT, file_name TEXT NOT NULL, artist TEXT, song_name TEXT, release_date TEXT, tags TEXT, created INTEGER DEFAULT (cast(strftime('%s','now') as int)));",
    indices: &["CREATE INDEX songs_artist_index ON songs (artist);"],
};

pub struct VersionedSchema {
    pub version: u32,
    pub tables: &'static [Table],
}

pub const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[SONGS_TABLE_V_0],
}];

/// Offset applied to PRAGMA user_version to distinguish our databases from
/// unrelated sqlite files.
pub const BASE_DB_VERSION: u32 = 77000;
