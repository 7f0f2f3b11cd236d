//! # minidfs
//!
//! A minimal GFS-style distributed file store:
//! - A single metadata coordinator tracking files, chunks and data-node liveness
//! - N data nodes holding fixed-size 64 MiB chunks, replicated three ways
//! - Clients that exchange bulk bytes directly with data nodes
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │            Coordinator               │
//! │  (in-memory file/chunk/node maps)    │
//! │   - allocates chunk placements       │
//! │   - reconciles via heartbeats        │
//! └───────────┬──────────────────────────┘
//!             │ gRPC (metadata only)
//!   ┌─────────┴──────────┬──────────────┐
//!   │                    │              │
//! ┌─▼──────────┐  ┌─────▼──────┐  ┌───▼─────────┐
//! │ DataNode 1 │  │ DataNode 2 │  │ DataNode 3  │
//! │ (chunks)   │  │ (chunks)   │  │ (chunks)    │
//! └─────▲──────┘  └─────▲──────┘  └───▲─────────┘
//!       └───────────────┴─────────────┘
//!          chunk bytes (client-direct)
//! ```
//!
//! ## Usage
//!
//! ### Start the coordinator
//! ```bash
//! minidfs-coordinator
//! ```
//!
//! ### Start a data node
//! ```bash
//! minidfs-datanode --port 9001 --storage ./chunks-9001 --master localhost:8000
//! ```
//!
//! ### Use the client
//! ```bash
//! minidfs upload --file ./data.bin --name data.bin
//! minidfs download --name data.bin --output ./out.bin
//! minidfs list
//! ```

pub mod client;
pub mod common;
pub mod coordinator;
pub mod datanode;

// Re-export commonly used types
pub use client::DfsClient;
pub use common::{Error, Result};
pub use coordinator::Coordinator;
pub use datanode::DataNodeServer;

// Generated protobuf code
pub mod proto {
    tonic::include_proto!("minidfs");
}

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
