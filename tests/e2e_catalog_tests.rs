use chrono::NaiveDate;
use song_storage::playback::{NullEngine, PlaybackController, PlaybackOutcome};
use song_storage::{CancelToken, CatalogError, CatalogManager, ContentStore, SqliteSongStore};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

fn create_manager(temp_dir: &TempDir) -> CatalogManager {
    let store = SqliteSongStore::new(temp_dir.path().join("songs.db")).unwrap();
    let content = ContentStore::new(temp_dir.path().join("storage")).unwrap();
    let playback = PlaybackController::new(Box::new(NullEngine::new()), Duration::from_millis(1));
    CatalogManager::new(Box::new(store), content, playback)
}

fn write_source(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("content of {}", name)).unwrap();
    path
}

#[test]
fn e2e_add_search_modify_delete_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let manager = create_manager(&temp_dir);
    let source = write_source(temp_dir.path(), "track.mp3");

    // add
    let id = manager
        .add_song(
            &source,
            Some("Artist A".to_string()),
            Some("Song X".to_string()),
            NaiveDate::from_ymd_opt(2020, 1, 1),
            vec!["rock".to_string(), "live".to_string()],
        )
        .unwrap();
    assert_eq!(id, 1);

    // search finds the consistent entry
    let found = manager.search_songs("Artist A", "mp3").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);
    assert_eq!(found[0].song_name.as_deref(), Some("Song X"));
    assert_eq!(found[0].tags, vec!["rock".to_string(), "live".to_string()]);
    assert!(manager.content_store().contains("track.mp3"));

    // modify moves the entry to a different artist
    manager
        .modify_song(id, &[("artist".to_string(), "Artist B".to_string())])
        .unwrap();
    assert!(manager.search_songs("Artist A", "mp3").unwrap().is_empty());
    let found = manager.search_songs("Artist B", "mp3").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);

    // delete removes row and stored file
    manager.delete_song(id).unwrap();
    assert!(manager.search_songs("Artist B", "mp3").unwrap().is_empty());
    assert!(!manager.content_store().contains("track.mp3"));
}

#[test]
fn e2e_export_archives_only_present_files() {
    let temp_dir = TempDir::new().unwrap();
    let manager = create_manager(&temp_dir);

    for name in ["a.mp3", "b.mp3", "c.mp3"] {
        let source = write_source(temp_dir.path(), name);
        manager
            .add_song(&source, Some("Artist A".to_string()), None, None, vec![])
            .unwrap();
    }
    // One file disappears behind the catalog's back
    let stored = manager.content_store().resolve("b.mp3").unwrap();
    std::fs::remove_file(stored).unwrap();

    let dest = temp_dir.path().join("savelist.zip");
    let summary = manager.create_savelist(&dest, "Artist A", "mp3").unwrap();
    assert_eq!(summary.archived, vec!["a.mp3", "c.mp3"]);
    assert_eq!(summary.missing, vec!["b.mp3"]);

    let archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(names, vec!["a.mp3", "c.mp3"]);
}

#[test]
fn e2e_missing_ids_are_noops() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = create_manager(&temp_dir);
    let source = write_source(temp_dir.path(), "track.mp3");
    manager
        .add_song(&source, Some("Artist A".to_string()), None, None, vec![])
        .unwrap();

    assert!(matches!(
        manager.delete_song(42),
        Err(CatalogError::SongNotFound(42))
    ));
    assert!(matches!(
        manager.modify_song(42, &[("artist".to_string(), "X".to_string())]),
        Err(CatalogError::SongNotFound(42))
    ));
    assert!(matches!(
        manager.play_song(42, &CancelToken::new()),
        Err(CatalogError::SongNotFound(42))
    ));

    // Nothing changed
    assert_eq!(manager.song_count().unwrap(), 1);
    assert_eq!(manager.content_store().list().unwrap(), vec!["track.mp3"]);
}

#[test]
fn e2e_play_reports_outcome_with_null_engine() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = create_manager(&temp_dir);
    let source = write_source(temp_dir.path(), "track.mp3");
    let id = manager
        .add_song(&source, Some("Artist A".to_string()), None, None, vec![])
        .unwrap();

    let outcome = manager.play_song(id, &CancelToken::new()).unwrap();
    assert_eq!(outcome, PlaybackOutcome::Completed);
}

#[test]
fn e2e_catalog_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_source(temp_dir.path(), "track.mp3");

    let id = {
        let manager = create_manager(&temp_dir);
        manager
            .add_song(
                &source,
                Some("Artist A".to_string()),
                Some("Song X".to_string()),
                None,
                vec!["rock".to_string()],
            )
            .unwrap()
    };

    let manager = create_manager(&temp_dir);
    let found = manager.search_songs("Artist A", "mp3").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, id);
    assert_eq!(found[0].tags, vec!["rock".to_string()]);
}
