//! On-disk chunk storage
//!
//! A flat directory, one file per chunk named by its handle, mirrored by an
//! in-memory set of present handles. The set is rebuilt by scanning the
//! directory at startup and is the single source of truth for lookups; the
//! filesystem writes happen under the exclusive side of its lock.

use crate::common::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

pub struct ChunkStorage {
    storage_dir: PathBuf,
    chunks: RwLock<HashSet<String>>,
}

impl ChunkStorage {
    /// Open the storage directory, creating it if needed, and index the
    /// chunks already present.
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        fs::create_dir_all(&storage_dir)?;

        let mut chunks = HashSet::new();
        for entry in fs::read_dir(&storage_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            // Skip interrupted writes left behind by a crash
            if name.ends_with(".tmp") {
                let _ = fs::remove_file(entry.path());
                continue;
            }
            chunks.insert(name.to_string());
        }

        tracing::info!(
            dir = %storage_dir.display(),
            chunks = chunks.len(),
            "chunk storage opened"
        );

        Ok(Self {
            storage_dir,
            chunks: RwLock::new(chunks),
        })
    }

    /// Write `data` under `handle`, replacing any previous content. The
    /// bytes land in a temp file first and are renamed into place, so a
    /// reader never sees a half-written chunk.
    pub fn write_chunk(&self, handle: &str, data: &[u8]) -> Result<()> {
        let mut chunks = self.chunks.write().unwrap();

        let tmp_path = self.storage_dir.join(format!("{}.tmp", handle));
        let chunk_path = self.chunk_path(handle);
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &chunk_path)?;

        chunks.insert(handle.to_string());
        Ok(())
    }

    /// Read the bytes stored under `handle`.
    pub fn read_chunk(&self, handle: &str) -> Result<Vec<u8>> {
        let chunks = self.chunks.read().unwrap();

        if !chunks.contains(handle) {
            return Err(Error::NotFound(format!("chunk not found: {}", handle)));
        }

        Ok(fs::read(self.chunk_path(handle))?)
    }

    pub fn has_chunk(&self, handle: &str) -> bool {
        self.chunks.read().unwrap().contains(handle)
    }

    /// Snapshot of the present handles
    pub fn list_chunks(&self) -> Vec<String> {
        self.chunks.read().unwrap().iter().cloned().collect()
    }

    /// Remove a chunk from disk and the index. Off the read/write critical
    /// path; kept for operational cleanup.
    pub fn delete_chunk(&self, handle: &str) -> Result<()> {
        let mut chunks = self.chunks.write().unwrap();

        fs::remove_file(self.chunk_path(handle))?;
        chunks.remove(handle);
        Ok(())
    }

    fn chunk_path(&self, handle: &str) -> PathBuf {
        self.storage_dir.join(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_read_round_trip() {
        let dir = tempdir().unwrap();
        let storage = ChunkStorage::open(dir.path()).unwrap();

        storage.write_chunk("abc123", b"hello chunk").unwrap();

        assert!(storage.has_chunk("abc123"));
        assert_eq!(storage.read_chunk("abc123").unwrap(), b"hello chunk");
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempdir().unwrap();
        let storage = ChunkStorage::open(dir.path()).unwrap();

        storage.write_chunk("abc123", b"old").unwrap();
        storage.write_chunk("abc123", b"new").unwrap();

        assert_eq!(storage.read_chunk("abc123").unwrap(), b"new");
        assert_eq!(storage.list_chunks().len(), 1);
    }

    #[test]
    fn test_read_missing_chunk() {
        let dir = tempdir().unwrap();
        let storage = ChunkStorage::open(dir.path()).unwrap();

        assert!(!storage.has_chunk("nope"));
        assert!(matches!(
            storage.read_chunk("nope"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_list_chunks() {
        let dir = tempdir().unwrap();
        let storage = ChunkStorage::open(dir.path()).unwrap();

        storage.write_chunk("h1", b"a").unwrap();
        storage.write_chunk("h2", b"b").unwrap();

        let mut handles = storage.list_chunks();
        handles.sort();
        assert_eq!(handles, vec!["h1".to_string(), "h2".to_string()]);
    }

    #[test]
    fn test_delete_chunk() {
        let dir = tempdir().unwrap();
        let storage = ChunkStorage::open(dir.path()).unwrap();

        storage.write_chunk("h1", b"a").unwrap();
        storage.delete_chunk("h1").unwrap();

        assert!(!storage.has_chunk("h1"));
        assert!(storage.read_chunk("h1").is_err());
    }

    #[test]
    fn test_reopen_indexes_existing_chunks() {
        let dir = tempdir().unwrap();

        {
            let storage = ChunkStorage::open(dir.path()).unwrap();
            storage.write_chunk("h1", b"persisted").unwrap();
        }

        let storage = ChunkStorage::open(dir.path()).unwrap();
        assert!(storage.has_chunk("h1"));
        assert_eq!(storage.read_chunk("h1").unwrap(), b"persisted");
    }

    #[test]
    fn test_reopen_discards_temp_files() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("h1.tmp"), b"partial").unwrap();

        let storage = ChunkStorage::open(dir.path()).unwrap();
        assert!(storage.list_chunks().is_empty());
        assert!(!dir.path().join("h1.tmp").exists());
    }
}
