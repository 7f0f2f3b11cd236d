//! Common contracts shared across minidfs

pub mod chunk;
pub mod config;
pub mod error;
pub mod rpc;
pub mod utils;

pub use chunk::{
    chunk_count, chunk_handle, CHUNK_SIZE, DEFAULT_COORDINATOR_ADDR, HEARTBEAT_INTERVAL,
    LIVENESS_WINDOW, REPLICATION_FACTOR,
};
pub use config::{ClientConfig, CoordinatorConfig, DataNodeConfig, RpcTimeouts};
pub use error::{Error, Result};
pub use utils::format_bytes;
