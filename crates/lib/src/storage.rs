//! # Profile Store
//!
//! Reads and writes Profile documents in the source-format layout: one
//! `<name>.profile-meta.xml` file per Profile inside a single directory.

use crate::constants::PROFILE_FILE_SUFFIX;
use crate::errors::StorageError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A directory of Profile documents.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file path used for the Profile called `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}{PROFILE_FILE_SUFFIX}"))
    }

    /// Writes `xml` for `name`, creating the directory if needed, and returns the path.
    pub fn write(&self, name: &str, xml: &str) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let path = self.path_for(name);
        fs::write(&path, xml).map_err(|e| io_error(&path, e))?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Reads the stored document for `name`.
    pub fn read(&self, name: &str) -> Result<String, StorageError> {
        let path = self.path_for(name);
        fs::read_to_string(&path).map_err(|e| io_error(&path, e))
    }

    /// Names of every Profile file in the directory, sorted. A missing directory has none.
    pub fn discover_names(&self) -> Result<Vec<String>, StorageError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error(&self.dir, e))?;
            if !entry.path().is_file() {
                continue;
            }
            let file_name = entry.file_name();
            if let Some(name) = file_name
                .to_str()
                .and_then(|f| f.strip_suffix(PROFILE_FILE_SUFFIX))
                .filter(|name| !name.is_empty())
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}
