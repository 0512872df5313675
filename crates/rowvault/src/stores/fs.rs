//! Directory-backed text store: one file per artifact.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use crate::core::traits::TextStore;
use crate::error::{Result, VaultError};

/// [`TextStore`] writing each artifact as a file inside one directory.
///
/// Artifact names become file names directly; schema validation already
/// keeps path separators out of table names, and config validation does the
/// same for suffixes.
#[derive(Debug)]
pub struct FsTextStore {
    dir: PathBuf,
}

impl FsTextStore {
    /// Open a store over `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The backing directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn artifact_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl TextStore for FsTextStore {
    fn open_write(&self, name: &str) -> Result<Box<dyn Write + '_>> {
        let file = File::create(self.artifact_path(name))?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn open_read(&self, name: &str) -> Result<Box<dyn Read + '_>> {
        match File::open(self.artifact_path(name)) {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(VaultError::SourceUnavailable(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("backups").join("v1");
        let store = FsTextStore::new(&nested).unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let store = FsTextStore::new(dir.path()).unwrap();

        {
            let mut out = store.open_write("people.v1").unwrap();
            out.write_all(b"id,name\n1,ada\n").unwrap();
            out.flush().unwrap();
        }

        let mut text = String::new();
        store
            .open_read("people.v1")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "id,name\n1,ada\n");
    }

    #[test]
    fn test_open_write_replaces_previous_artifact() {
        let dir = tempdir().unwrap();
        let store = FsTextStore::new(dir.path()).unwrap();

        store
            .open_write("people")
            .unwrap()
            .write_all(b"old and much longer content\n")
            .unwrap();
        {
            let mut out = store.open_write("people").unwrap();
            out.write_all(b"new\n").unwrap();
            out.flush().unwrap();
        }

        let mut text = String::new();
        store
            .open_read("people")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "new\n");
    }

    #[test]
    fn test_missing_artifact_is_source_unavailable() {
        let dir = tempdir().unwrap();
        let store = FsTextStore::new(dir.path()).unwrap();
        let err = store.open_read("nope").err().unwrap();
        assert!(matches!(err, VaultError::SourceUnavailable(name) if name == "nope"));
    }
}
