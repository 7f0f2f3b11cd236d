//! Configuration for minidfs components

use crate::common::chunk::{DEFAULT_COORDINATOR_ADDR, REPLICATION_FACTOR};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Bind address (host:port)
    #[serde(default = "default_coordinator_addr")]
    pub bind_addr: String,

    /// Replication target per chunk
    #[serde(default = "default_replication")]
    pub replication_factor: usize,
}

fn default_coordinator_addr() -> String {
    DEFAULT_COORDINATOR_ADDR.to_string()
}

fn default_replication() -> usize {
    REPLICATION_FACTOR
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_coordinator_addr(),
            replication_factor: default_replication(),
        }
    }
}

impl CoordinatorConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.bind_addr.is_empty() {
            return Err(crate::Error::InvalidArgument("bind_addr is required".into()));
        }
        if self.replication_factor == 0 {
            return Err(crate::Error::InvalidArgument(
                "replication_factor must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Data-node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataNodeConfig {
    /// Port to listen on; the advertised address is localhost:<port>
    pub port: u16,

    /// Directory holding one file per chunk, named by handle
    pub storage_dir: PathBuf,

    /// Coordinator address (host:port)
    #[serde(default = "default_coordinator_addr")]
    pub master_addr: String,
}

impl DataNodeConfig {
    /// The address this node advertises to the coordinator and clients.
    pub fn advertised_addr(&self) -> String {
        format!("localhost:{}", self.port)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.port == 0 {
            return Err(crate::Error::InvalidArgument("port is required".into()));
        }
        if self.storage_dir.as_os_str().is_empty() {
            return Err(crate::Error::InvalidArgument("storage_dir is required".into()));
        }
        if self.master_addr.is_empty() {
            return Err(crate::Error::InvalidArgument("master_addr is required".into()));
        }
        Ok(())
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Coordinator address (host:port)
    #[serde(default = "default_coordinator_addr")]
    pub master_addr: String,

    /// Outbound RPC deadlines; not part of the config file surface
    #[serde(skip)]
    pub timeouts: RpcTimeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            master_addr: default_coordinator_addr(),
            timeouts: RpcTimeouts::default(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.master_addr.is_empty() {
            return Err(crate::Error::InvalidArgument("master_addr is required".into()));
        }
        Ok(())
    }
}

/// Deadlines for outbound RPCs
#[derive(Debug, Clone, Copy)]
pub struct RpcTimeouts {
    /// Client↔coordinator and client↔data-node data transfers
    pub data: Duration,

    /// Heartbeats and chunk-store reports
    pub background: Duration,
}

impl Default for RpcTimeouts {
    fn default() -> Self {
        Self {
            data: Duration::from_secs(30),
            background: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinator_defaults() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.bind_addr, "localhost:8000");
        assert_eq!(config.replication_factor, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_datanode_advertised_addr() {
        let config = DataNodeConfig {
            port: 9001,
            storage_dir: PathBuf::from("./chunks"),
            master_addr: default_coordinator_addr(),
        };
        assert_eq!(config.advertised_addr(), "localhost:9001");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.master_addr, "localhost:8000");
        assert!(config.validate().is_ok());

        let config = ClientConfig {
            master_addr: String::new(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_datanode_rejects_missing_port() {
        let config = DataNodeConfig {
            port: 0,
            storage_dir: PathBuf::from("./chunks"),
            master_addr: default_coordinator_addr(),
        };
        assert!(config.validate().is_err());
    }
}
