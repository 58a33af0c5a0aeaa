use super::schema::{BASE_DB_VERSION, VERSIONED_SCHEMAS};
use super::trait_def::SongStore;
use crate::catalog::{FieldUpdate, NewSong, SongEntry, SongId};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// SQLite-backed song metadata store.
///
/// The connection is opened once and owned here for the lifetime of the
/// process; the catalog manager receives this handle at construction.
#[derive(Clone)]
pub struct SqliteSongStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSongStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = if db_path.as_ref().exists() {
            let conn = Connection::open_with_flags(
                db_path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            Self::validate_version(&conn)?;
            conn
        } else {
            let conn = Connection::open(db_path)?;
            Self::create_schema(&conn)?;
            conn
        };

        Ok(SqliteSongStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn create_schema(conn: &Connection) -> Result<()> {
        let latest = VERSIONED_SCHEMAS.last().unwrap();
        for table in latest.tables {
            info!("Creating table {} at schema version {}", table.name, latest.version);
            conn.execute(table.schema, [])?;
            for index in table.indices {
                conn.execute(index, [])?;
            }
        }
        conn.pragma_update(None, "user_version", BASE_DB_VERSION + latest.version)?;
        Ok(())
    }

    fn validate_version(conn: &Connection) -> Result<()> {
        let raw_version: u32 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .context("Failed to read database version")?;
        if raw_version < BASE_DB_VERSION {
            bail!("Not a song storage database (user_version {})", raw_version);
        }
        let version = raw_version - BASE_DB_VERSION;
        let latest = VERSIONED_SCHEMAS.last().unwrap().version;
        if version > latest {
            bail!("Database version {} is too new", version);
        }
        Ok(())
    }
}

fn entry_from_row(row: &Row) -> rusqlite::Result<SongEntry> {
    let release_date: Option<String> = row.get(4)?;
    let tags: Option<String> = row.get(5)?;
    Ok(SongEntry {
        id: row.get(0)?,
        file_name: row.get(1)?,
        artist: row.get(2)?,
        song_name: row.get(3)?,
        release_date: release_date
            .and_then(|raw| NaiveDate::parse_from_str(&raw, "%Y-%m-%d").ok()),
        tags: tags
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default(),
    })
}

const ENTRY_COLUMNS: &str = "id, file_name, artist, song_name, release_date, tags";

impl SongStore for SqliteSongStore {
    fn insert_song(&self, song: &NewSong) -> Result<SongId> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO songs (file_name, artist, song_name, release_date, tags) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                song.file_name,
                song.artist,
                song.song_name,
                song.release_date.map(|d| d.to_string()),
                serde_json::to_string(&song.tags)?,
            ],
        )
        .with_context(|| format!("Failed to insert song {}", song.file_name))?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    fn get_song(&self, id: SongId) -> Result<Option<SongEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM songs WHERE id = ?1",
            ENTRY_COLUMNS
        ))?;
        match stmt.query_row(params![id], entry_from_row) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(err).with_context(|| format!("Failed to fetch song {}", id)),
        }
    }

    fn delete_song(&self, id: SongId) -> Result<bool> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let deleted = tx
            .execute("DELETE FROM songs WHERE id = ?1", params![id])
            .with_context(|| format!("Failed to delete song {}", id))?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    fn update_song_fields(&self, id: SongId, updates: &[FieldUpdate]) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        for update in updates {
            // One dedicated parameterized statement per updatable column.
            let changed = match update {
                FieldUpdate::Artist(value) => tx.execute(
                    "UPDATE songs SET artist = ?1 WHERE id = ?2",
                    params![value, id],
                )?,
                FieldUpdate::SongName(value) => tx.execute(
                    "UPDATE songs SET song_name = ?1 WHERE id = ?2",
                    params![value, id],
                )?,
                FieldUpdate::ReleaseDate(value) => tx.execute(
                    "UPDATE songs SET release_date = ?1 WHERE id = ?2",
                    params![value.map(|d| d.to_string()), id],
                )?,
                FieldUpdate::Tags(value) => tx.execute(
                    "UPDATE songs SET tags = ?1 WHERE id = ?2",
                    params![serde_json::to_string(value)?, id],
                )?,
            };
            if changed == 0 {
                // Transaction dropped without commit rolls everything back.
                bail!("No row with id {} while updating {}", id, update.field().name());
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn find_by_artist(&self, artist: &str) -> Result<Vec<SongEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM songs WHERE artist = ?1 ORDER BY id",
            ENTRY_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![artist], entry_from_row)?
            .collect::<Result<Vec<SongEntry>, _>>()
            .with_context(|| format!("Failed to query songs for artist {}", artist))?;
        Ok(rows)
    }

    fn count_songs(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_tmp_store() -> (SqliteSongStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let temp_file_path = temp_dir.path().join("test.db");
        let store = SqliteSongStore::new(&temp_file_path).unwrap();
        (store, temp_dir)
    }

    fn new_song(file_name: &str, artist: &str) -> NewSong {
        NewSong {
            file_name: file_name.to_string(),
            artist: Some(artist.to_string()),
            song_name: Some("Song X".to_string()),
            release_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            tags: vec!["rock".to_string(), "live".to_string()],
        }
    }

    #[test]
    fn test_insert_and_get_song() {
        let (store, _temp_dir) = create_tmp_store();

        let id = store.insert_song(&new_song("track.mp3", "Artist A")).unwrap();
        assert_eq!(id, 1);

        let entry = store.get_song(id).unwrap().unwrap();
        assert_eq!(entry.file_name, "track.mp3");
        assert_eq!(entry.artist.as_deref(), Some("Artist A"));
        assert_eq!(entry.song_name.as_deref(), Some("Song X"));
        assert_eq!(entry.release_date, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(entry.tags, vec!["rock".to_string(), "live".to_string()]);
    }

    #[test]
    fn test_get_missing_song_is_none() {
        let (store, _temp_dir) = create_tmp_store();
        assert!(store.get_song(123).unwrap().is_none());
    }

    #[test]
    fn test_delete_song() {
        let (store, _temp_dir) = create_tmp_store();

        let id = store.insert_song(&new_song("track.mp3", "Artist A")).unwrap();
        assert!(store.delete_song(id).unwrap());
        assert!(store.get_song(id).unwrap().is_none());

        // Deleting again reports no row matched
        assert!(!store.delete_song(id).unwrap());
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let (store, _temp_dir) = create_tmp_store();

        let first = store.insert_song(&new_song("a.mp3", "Artist A")).unwrap();
        store.delete_song(first).unwrap();
        let second = store.insert_song(&new_song("b.mp3", "Artist A")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_update_song_fields() {
        let (store, _temp_dir) = create_tmp_store();

        let id = store.insert_song(&new_song("track.mp3", "Artist A")).unwrap();
        store
            .update_song_fields(
                id,
                &[
                    FieldUpdate::Artist(Some("Artist B".to_string())),
                    FieldUpdate::Tags(vec!["studio".to_string()]),
                ],
            )
            .unwrap();

        let entry = store.get_song(id).unwrap().unwrap();
        assert_eq!(entry.artist.as_deref(), Some("Artist B"));
        assert_eq!(entry.tags, vec!["studio".to_string()]);
        // Untouched columns survive
        assert_eq!(entry.song_name.as_deref(), Some("Song X"));
    }

    #[test]
    fn test_update_missing_song_fails() {
        let (store, _temp_dir) = create_tmp_store();
        let result =
            store.update_song_fields(99, &[FieldUpdate::Artist(Some("Artist B".to_string()))]);
        assert!(result.is_err());
    }

    #[test]
    fn test_find_by_artist_insertion_order() {
        let (store, _temp_dir) = create_tmp_store();

        store.insert_song(&new_song("one.mp3", "Artist A")).unwrap();
        store.insert_song(&new_song("two.flac", "Artist A")).unwrap();
        store.insert_song(&new_song("other.mp3", "Artist B")).unwrap();

        let found = store.find_by_artist("Artist A").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].file_name, "one.mp3");
        assert_eq!(found[1].file_name, "two.flac");

        // Exact match only, empty result is fine
        assert!(store.find_by_artist("artist a").unwrap().is_empty());
    }

    #[test]
    fn test_reopen_existing_db() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let id = {
            let store = SqliteSongStore::new(&db_path).unwrap();
            store.insert_song(&new_song("track.mp3", "Artist A")).unwrap()
        };

        let reopened = SqliteSongStore::new(&db_path).unwrap();
        assert!(reopened.get_song(id).unwrap().is_some());
        assert_eq!(reopened.count_songs().unwrap(), 1);
    }

    #[test]
    fn test_rejects_foreign_sqlite_file() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("foreign.db");
        {
            let conn = Connection::open(&db_path).unwrap();
            conn.execute("CREATE TABLE other (x INTEGER)", []).unwrap();
        }
        assert!(SqliteSongStore::new(&db_path).is_err());
    }
}
