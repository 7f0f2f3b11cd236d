//! In-memory metadata store
//!
//! Authoritative maps for files, chunks and data-node registrations, guarded
//! by one readers-writer lock so every operation is atomic with respect to
//! the others. Nothing here survives a restart: node state repopulates from
//! heartbeats, file and chunk records do not.

use crate::common::LIVENESS_WINDOW;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Instant, SystemTime};

/// File record. Immutable after upload allocation completes.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub filename: String,
    pub filesize: u64,
    pub chunk_count: u32,
    /// Chunk handles in ascending index order
    pub chunks: Vec<String>,
    pub created_at: SystemTime,
}

/// Chunk record. Locations grow as data nodes report successful stores.
#[derive(Debug, Clone)]
pub struct ChunkMetadata {
    pub handle: String,
    pub filename: String,
    pub chunk_index: u32,
    /// Reserved for future versioning, always 1 for now
    pub version: u32,
    pub locations: Vec<String>,
}

/// Data-node registration, overwritten in place on each heartbeat.
#[derive(Debug, Clone)]
struct DataNodeInfo {
    last_heartbeat: Instant,
    /// Chunk handles the node claimed in its last heartbeat
    chunks: Vec<String>,
}

#[derive(Default)]
struct Inner {
    files: HashMap<String, FileMetadata>,
    chunks: HashMap<String, ChunkMetadata>,
    nodes: HashMap<String, DataNodeInfo>,
}

/// The coordinator's authoritative metadata store.
///
/// A single lock covers all three maps; write operations are brief and never
/// hold the lock across I/O. Readers get snapshot clones, never references
/// into the locked structures.
pub struct MetadataStore {
    inner: RwLock<Inner>,
}

impl Default for MetadataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Insert a file record with an empty chunk list. A prior record under
    /// the same name is overwritten: the namespace model is unique names,
    /// last writer wins.
    pub fn add_file(&self, filename: &str, filesize: u64, chunk_count: u32) {
        let mut inner = self.inner.write().unwrap();
        inner.files.insert(
            filename.to_string(),
            FileMetadata {
                filename: filename.to_string(),
                filesize,
                chunk_count,
                chunks: Vec::with_capacity(chunk_count as usize),
                created_at: SystemTime::now(),
            },
        );
    }

    /// Append a chunk handle to the named file's chunk list. No-op if the
    /// file is absent.
    pub fn append_chunk_to_file(&self, filename: &str, handle: &str) {
        let mut inner = self.inner.write().unwrap();
        if let Some(file) = inner.files.get_mut(filename) {
            file.chunks.push(handle.to_string());
        }
    }

    /// Insert a chunk record with no known locations.
    pub fn add_chunk(&self, handle: &str, filename: &str, chunk_index: u32) {
        let mut inner = self.inner.write().unwrap();
        inner.chunks.insert(
            handle.to_string(),
            ChunkMetadata {
                handle: handle.to_string(),
                filename: filename.to_string(),
                chunk_index,
                version: 1,
                locations: Vec::new(),
            },
        );
    }

    /// Record that `address` holds `handle`. Idempotent; no-op if the chunk
    /// record is absent.
    pub fn add_chunk_location(&self, handle: &str, address: &str) {
        let mut inner = self.inner.write().unwrap();
        if let Some(chunk) = inner.chunks.get_mut(handle) {
            if !chunk.locations.iter().any(|a| a == address) {
                chunk.locations.push(address.to_string());
            }
        }
    }

    pub fn get_file(&self, filename: &str) -> Option<FileMetadata> {
        let inner = self.inner.read().unwrap();
        inner.files.get(filename).cloned()
    }

    pub fn get_chunk(&self, handle: &str) -> Option<ChunkMetadata> {
        let inner = self.inner.read().unwrap();
        inner.chunks.get(handle).cloned()
    }

    /// Snapshot of all file records. Order unspecified.
    pub fn list_files(&self) -> Vec<FileMetadata> {
        let inner = self.inner.read().unwrap();
        inner.files.values().cloned().collect()
    }

    /// Upsert a node registration: refresh its heartbeat and replace its
    /// inventory with what it just claimed.
    pub fn register_node(&self, address: &str, chunks: Vec<String>) {
        self.register_node_at(address, chunks, Instant::now());
    }

    fn register_node_at(&self, address: &str, chunks: Vec<String>, now: Instant) {
        let mut inner = self.inner.write().unwrap();
        inner.nodes.insert(
            address.to_string(),
            DataNodeInfo {
                last_heartbeat: now,
                chunks,
            },
        );
    }

    /// The chunk handles `address` claimed in its last heartbeat, if it has
    /// ever registered.
    pub fn node_inventory(&self, address: &str) -> Option<Vec<String>> {
        let inner = self.inner.read().unwrap();
        inner.nodes.get(address).map(|n| n.chunks.clone())
    }

    /// Up to `k` addresses of nodes whose heartbeat is inside the liveness
    /// window. Iteration order is unspecified; if fewer than `k` nodes are
    /// live, returns what there is.
    pub fn available_nodes(&self, k: usize) -> Vec<String> {
        self.available_nodes_at(k, Instant::now())
    }

    fn available_nodes_at(&self, k: usize, now: Instant) -> Vec<String> {
        let inner = self.inner.read().unwrap();
        let mut nodes = Vec::with_capacity(k);
        for (address, info) in &inner.nodes {
            if nodes.len() == k {
                break;
            }
            if now.duration_since(info.last_heartbeat) < LIVENESS_WINDOW {
                nodes.push(address.clone());
            }
        }
        nodes
    }
}
