//! The save file on disk.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::DbError;

/// Default save file name.
pub const DEFAULT_FILE_NAME: &str = "pocketestate_data.dat";

/// Reads and atomically replaces one save file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    /// A save file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The default file name inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_FILE_NAME))
    }

    /// Path of the save file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file. `None` when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Io`] for any failure other than a missing file.
    pub fn read(&self) -> Result<Option<Vec<u8>>, DbError> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                debug!(path = %self.path.display(), bytes = bytes.len(), "Read save file");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the file with `bytes`.
    ///
    /// The data goes to a sibling temp file that is synced and then renamed
    /// over the target, so a crash never leaves a half-written save.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Io`] if any step fails. The previous save is left
    /// in place.
    pub fn write(&self, bytes: &[u8]) -> Result<(), DbError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.temp_path();
        if let Err(e) = write_and_rename(&tmp, &self.path, bytes) {
            fs::remove_file(&tmp).ok();
            return Err(e.into());
        }
        debug!(path = %self.path.display(), bytes = bytes.len(), "Wrote save file");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn write_and_rename(tmp: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(tmp, target)
}
