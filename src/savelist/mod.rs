//! Savelist packaging: stages a set of stored files and zips them into a
//! single archive.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Outcome of a savelist export. A partial result (some files missing on
/// disk) still produces a valid archive of whatever was found.
#[derive(Debug)]
pub struct SavelistSummary {
    pub archive_path: PathBuf,
    pub archived: Vec<String>,
    pub missing: Vec<String>,
}

pub struct SavelistBuilder;

impl SavelistBuilder {
    /// Copies each `(file_name, source_path)` pair into a staging directory
    /// and packages the staged files into a zip archive at `destination`.
    /// Missing individual files are logged and skipped, not fatal.
    pub fn build(destination: &Path, files: &[(String, PathBuf)]) -> Result<SavelistSummary> {
        if destination.is_dir() {
            bail!("Savelist destination is a directory: {:?}", destination);
        }

        let staging = TempDir::new().context("Failed to create savelist staging directory")?;
        let mut archived = Vec::new();
        let mut missing = Vec::new();

        for (file_name, source) in files {
            if !source.is_file() {
                warn!("Skipping missing stored file {:?}", source);
                missing.push(file_name.clone());
                continue;
            }
            let staged = staging.path().join(file_name);
            std::fs::copy(source, &staged)
                .with_context(|| format!("Failed to stage {:?}", source))?;
            archived.push(file_name.clone());
        }

        let file = File::create(destination)
            .with_context(|| format!("Failed to create archive at {:?}", destination))?;
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for file_name in &archived {
            zip.start_file(file_name.as_str(), options)
                .with_context(|| format!("Failed to add {} to archive", file_name))?;
            let mut staged = File::open(staging.path().join(file_name))?;
            std::io::copy(&mut staged, &mut zip)?;
        }

        zip.finish().context("Failed to finalize archive")?;
        info!(
            "Savelist written to {:?} ({} archived, {} missing)",
            destination,
            archived.len(),
            missing.len()
        );

        Ok(SavelistSummary {
            archive_path: destination.to_path_buf(),
            archived,
            missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_source(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("content of {}", name)).unwrap();
        path
    }

    fn archive_names(path: &Path) -> Vec<String> {
        let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        names
    }

    #[test]
    fn test_build_archives_all_files() {
        let temp_dir = TempDir::new().unwrap();
        let a = write_source(temp_dir.path(), "a.mp3");
        let b = write_source(temp_dir.path(), "b.mp3");
        let dest = temp_dir.path().join("savelist.zip");

        let summary = SavelistBuilder::build(
            &dest,
            &[("a.mp3".to_string(), a), ("b.mp3".to_string(), b)],
        )
        .unwrap();

        assert_eq!(summary.archived, vec!["a.mp3", "b.mp3"]);
        assert!(summary.missing.is_empty());
        assert_eq!(archive_names(&dest), vec!["a.mp3", "b.mp3"]);
    }

    #[test]
    fn test_build_skips_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        let a = write_source(temp_dir.path(), "a.mp3");
        let gone = temp_dir.path().join("gone.mp3");
        let dest = temp_dir.path().join("savelist.zip");

        let summary = SavelistBuilder::build(
            &dest,
            &[("a.mp3".to_string(), a), ("gone.mp3".to_string(), gone)],
        )
        .unwrap();

        assert_eq!(summary.archived, vec!["a.mp3"]);
        assert_eq!(summary.missing, vec!["gone.mp3"]);
        assert_eq!(archive_names(&dest), vec!["a.mp3"]);
    }

    #[test]
    fn test_build_rejects_directory_destination() {
        let temp_dir = TempDir::new().unwrap();
        let result = SavelistBuilder::build(temp_dir.path(), &[]);
        assert!(result.is_err());
    }
}
