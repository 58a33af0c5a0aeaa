//! Filesystem adapter for the managed audio file directory.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single root directory holding the stored audio files, addressed by
/// base file name. The root is created on first use.
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new<T: Into<PathBuf>>(root: T) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create content store root {:?}", root))?;
        Ok(ContentStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copies a source file into the store under its base name and returns
    /// that name. An existing file with the same name is overwritten; this
    /// is a documented limitation, not a guarantee.
    pub fn store(&self, source: &Path) -> Result<String> {
        let file_name = source
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .with_context(|| format!("Source path has no file name: {:?}", source))?
            .to_string();

        let destination = self.root.join(&file_name);
        std::fs::copy(source, &destination)
            .with_context(|| format!("Failed to copy {:?} to {:?}", source, destination))?;
        debug!("Stored {:?} as {}", source, file_name);
        Ok(file_name)
    }

    pub fn remove(&self, file_name: &str) -> Result<()> {
        let path = self.resolve(file_name)?;
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to remove stored file {:?}", path))?;
        debug!("Removed stored file {}", file_name);
        Ok(())
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.resolve(file_name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Resolves a managed-relative name to an absolute path under the root.
    /// Names with path separators or parent components are rejected so a
    /// row can never address anything outside the store.
    pub fn resolve(&self, file_name: &str) -> Result<PathBuf> {
        if file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name == "."
            || file_name == ".."
        {
            bail!("Invalid stored file name: {:?}", file_name);
        }
        Ok(self.root.join(file_name))
    }

    /// Base names of all regular files currently under the root.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list content store root {:?}", self.root))?
        {
            let entry = entry?;
            if entry.path().is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
