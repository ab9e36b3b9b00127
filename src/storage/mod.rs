//! Storage
//!
//! Local files only:
//! - `local`: byte-level read/write relative to a base directory
//! - `results`: per-map results kept in one RON file

pub mod local;
pub mod results;

use thiserror::Error;

pub use local::LocalStorage;
pub use results::{ResultSink, ResultStore};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(e.to_string()),
            std::io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(e.to_string()),
            _ => StorageError::Io(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_kinds_map() {
        let nf = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let pd = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let other = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert!(matches!(StorageError::from(nf), StorageError::NotFound(_)));
        assert!(matches!(StorageError::from(pd), StorageError::PermissionDenied(_)));
        assert!(matches!(StorageError::from(other), StorageError::Io(_)));
    }
}
