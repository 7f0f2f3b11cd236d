//! Metadata coordinator
//!
//! The coordinator is responsible for:
//! - File → chunk → location bookkeeping (in memory, lost on restart)
//! - Chunk placement at upload time
//! - Tracking data-node liveness from heartbeats

pub mod grpc;
pub mod metadata;
pub mod server;

pub use server::Coordinator;
