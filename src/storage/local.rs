//! Local filesystem storage
//!
//! Paths are relative to a base directory. Every operation completes
//! immediately.

use std::path::PathBuf;

use super::StorageError;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// Base directory for relative paths
    base_dir: PathBuf,
}

impl LocalStorage {
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }

    pub fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        Ok(std::fs::read(self.resolve(path))?)
    }

    /// Create or overwrite a file, creating parent directories as needed
    pub fn write(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.resolve(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, LocalStorage) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::with_base_dir(dir.path());
        (dir, storage)
    }

    #[test]
    fn test_write_and_read() {
        let (_dir, storage) = setup_test_dir();

        storage.write("results.ron", b"hello world").unwrap();
        assert_eq!(storage.read("results.ron").unwrap(), b"hello world");
    }

    #[test]
    fn test_read_not_found() {
        let (_dir, storage) = setup_test_dir();
        assert!(matches!(storage.read("nonexistent.ron"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_write_overwrites() {
        let (dir, storage) = setup_test_dir();
        std::fs::write(dir.path().join("results.ron"), "old").unwrap();

        storage.write("results.ron", b"new").unwrap();
        assert_eq!(storage.read("results.ron").unwrap(), b"new");
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let (_dir, storage) = setup_test_dir();

        storage.write("deep/nested/dir/file.ron", b"data").unwrap();
        assert_eq!(storage.read("deep/nested/dir/file.ron").unwrap(), b"data");
    }
}
