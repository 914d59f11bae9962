use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Deletes a file, or a directory with everything in it.
///
/// A path that is already gone counts as removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveStep {
    path: PathBuf,
}

impl RemoveStep {
    /// Remove `path` when executed.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to delete.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the path.
    pub fn execute(&self) -> Result<()> {
        let metadata = match fs::symlink_metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} already removed", self.path.display());
                return Ok(());
            }
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        if metadata.is_dir() {
            fs::remove_dir_all(&self.path)
        } else {
            fs::remove_file(&self.path)
        }
        .map_err(|e| Error::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_directory_tree() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("build");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested/file.o"), b"obj").unwrap();

        RemoveStep::new(&dir).execute().unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn test_remove_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("archive.tar.gz");
        fs::write(&file, b"data").unwrap();

        RemoveStep::new(&file).execute().unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let tmp = TempDir::new().unwrap();
        RemoveStep::new(tmp.path().join("never-created")).execute().unwrap();
    }
}
