//! Chunk math shared by the coordinator, data nodes and clients
//!
//! - Fixed 64 MiB chunk size, three-way replication target
//! - Chunk handles derived from (filename, index), not from content

use sha2::{Digest, Sha256};
use std::time::Duration;

/// Size of each chunk in bytes (64 MiB)
pub const CHUNK_SIZE: u64 = 64 * 1024 * 1024;

/// Target number of data nodes holding any given chunk
pub const REPLICATION_FACTOR: usize = 3;

/// How often a data node reports liveness and inventory
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);

/// A node with no heartbeat inside this window is treated as unavailable
pub const LIVENESS_WINDOW: Duration = Duration::from_secs(30);

/// Default coordinator address
pub const DEFAULT_COORDINATOR_ADDR: &str = "localhost:8000";

/// Derive the handle for chunk `index` of `filename`.
///
/// First 16 bytes of SHA-256("{filename}-{index}"), hex-encoded: a 32-char
/// lowercase string. Deterministic in (filename, index), independent of
/// content, so re-uploading a name reuses the same handles.
pub fn chunk_handle(filename: &str, index: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(filename.as_bytes());
    hasher.update(b"-");
    hasher.update(index.to_string().as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}

/// Number of chunks needed to hold `filesize` bytes. Zero-byte files have
/// zero chunks.
pub fn chunk_count(filesize: u64) -> u32 {
    filesize.div_ceil(CHUNK_SIZE) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_handle_shape() {
        let handle = chunk_handle("h.txt", 0);
        assert_eq!(handle.len(), 32);
        assert!(handle.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_chunk_handle_deterministic() {
        assert_eq!(chunk_handle("h.txt", 0), chunk_handle("h.txt", 0));
        assert_eq!(chunk_handle("big.bin", 7), chunk_handle("big.bin", 7));
    }

    #[test]
    fn test_chunk_handle_matches_derivation() {
        let digest = Sha256::digest(b"h.txt-0");
        assert_eq!(chunk_handle("h.txt", 0), hex::encode(&digest[..16]));

        let digest = Sha256::digest(b"big.bin-12");
        assert_eq!(chunk_handle("big.bin", 12), hex::encode(&digest[..16]));
    }

    #[test]
    fn test_chunk_handle_distinct_across_inputs() {
        let mut handles = std::collections::HashSet::new();
        for name in ["a.txt", "b.txt", "a.txt-extra"] {
            for index in 0..8 {
                assert!(handles.insert(chunk_handle(name, index)));
            }
        }
    }

    #[test]
    fn test_chunk_count() {
        assert_eq!(chunk_count(0), 0);
        assert_eq!(chunk_count(1), 1);
        assert_eq!(chunk_count(CHUNK_SIZE - 1), 1);
        assert_eq!(chunk_count(CHUNK_SIZE), 1);
        assert_eq!(chunk_count(CHUNK_SIZE + 1), 2);
        assert_eq!(chunk_count(10 * CHUNK_SIZE), 10);
    }
}
