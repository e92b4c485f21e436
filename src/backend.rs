//! Key-value persistence boundaries, that store text blobs
//!
//! An [`AppointmentStore`](crate::store::AppointmentStore) writes its whole content as a single blob at every change.
//! Backends only have to read and overwrite blobs: they know nothing about appointments.

use std::collections::HashMap;
use std::error::Error;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::mock_behaviour::MockBehaviour;

/// A store of text blobs, addressed by key
pub trait Backend {
    /// Returns the blob stored under `key`, or `None` in case nothing has ever been written there
    fn read(&mut self, key: &str) -> Result<Option<String>, Box<dyn Error>>;
    /// Overwrites the blob stored under `key`
    fn write(&mut self, key: &str, blob: &str) -> Result<(), Box<dyn Error>>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn read(&mut self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        (**self).read(key)
    }
    fn write(&mut self, key: &str, blob: &str) -> Result<(), Box<dyn Error>> {
        (**self).write(key, blob)
    }
}



/// A backend that stores every blob in its own file of a folder
#[derive(Debug, Clone, PartialEq)]
pub struct FolderBackend {
    backing_folder: PathBuf,
}

impl FolderBackend {
    /// The folder does not need to exist yet, it will be created on the first write
    pub fn new(folder: &Path) -> Self {
        Self { backing_folder: PathBuf::from(folder) }
    }

    pub fn folder(&self) -> &Path {
        &self.backing_folder
    }

    /// The file a given key is stored to
    pub fn file_for(&self, key: &str) -> PathBuf {
        let mut filename = sanitize_filename::sanitize(key);
        filename.push_str(".json");
        self.backing_folder.join(filename)
    }
}

impl Backend for FolderBackend {
    fn read(&mut self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let path = self.file_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("No file at {:?} yet", path);
                Ok(None)
            },
            Err(err) => Err(format!("Unable to read file {:?}: {}", path, err).into()),
        }
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<(), Box<dyn Error>> {
        if let Err(err) = std::fs::create_dir_all(&self.backing_folder) {
            return Err(format!("Unable to create folder {:?}: {}", self.backing_folder, err).into());
        }
        let path = self.file_for(key);
        if let Err(err) = std::fs::write(&path, blob) {
            return Err(format!("Unable to save file {:?}: {}", path, err).into());
        }
        Ok(())
    }
}



/// A backend that keeps its blobs in memory. Mostly useful for tests and headless use
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    blobs: HashMap<String, String>,
    mock_behaviour: MockBehaviour,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that starts with `blob` stored under `key`
    pub fn with_blob(key: &str, blob: &str) -> Self {
        let mut backend = Self::new();
        backend.blobs.insert(key.to_string(), blob.to_string());
        backend
    }

    /// Make reads or writes fail according to `behaviour`
    pub fn set_mock_behaviour(&mut self, behaviour: MockBehaviour) {
        self.mock_behaviour = behaviour;
    }

    /// The current blob under `key`, without going through any mock behaviour
    pub fn blob(&self, key: &str) -> Option<&str> {
        self.blobs.get(key).map(|s| s.as_str())
    }
}

impl Backend for MemoryBackend {
    fn read(&mut self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.mock_behaviour.can_read()?;
        Ok(self.blobs.get(key).cloned())
    }

    fn write(&mut self, key: &str, blob: &str) -> Result<(), Box<dyn Error>> {
        self.mock_behaviour.can_write()?;
        self.blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_backend() {
        let folder = tempfile::tempdir().unwrap();
        let mut backend = FolderBackend::new(&folder.path().join("nested"));

        assert_eq!(backend.read("appointments").unwrap(), None);
        backend.write("appointments", "[]").unwrap();
        assert_eq!(backend.read("appointments").unwrap(), Some("[]".to_string()));
        backend.write("appointments", "[1]").unwrap();
        assert_eq!(backend.read("appointments").unwrap(), Some("[1]".to_string()));
    }

    #[test]
    fn test_keys_are_sanitized() {
        let backend = FolderBackend::new(Path::new("/some/folder"));
        let path = backend.file_for("../../etc/passwd");
        assert_eq!(path.parent(), Some(Path::new("/some/folder")));
    }

    #[test]
    fn test_memory_backend_failures() {
        let mut backend = MemoryBackend::with_blob("key", "value");
        backend.set_mock_behaviour(MockBehaviour::fail_now(1));

        assert!(backend.read("key").is_err());
        assert!(backend.write("key", "other").is_err());
        assert_eq!(backend.blob("key"), Some("value"));

        assert_eq!(backend.read("key").unwrap(), Some("value".to_string()));
        backend.write("key", "other").unwrap();
        assert_eq!(backend.blob("key"), Some("other"));
    }
}
