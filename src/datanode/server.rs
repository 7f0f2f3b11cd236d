//! Data-node server and its heartbeat loop

use crate::common::{rpc, DataNodeConfig, Result, RpcTimeouts, HEARTBEAT_INTERVAL};
use crate::datanode::grpc::DataNodeGrpcService;
use crate::datanode::storage::ChunkStorage;
use crate::proto::HeartbeatRequest;
use std::sync::Arc;
use tokio_stream::wrappers::TcpListenerStream;

pub struct DataNodeServer {
    config: DataNodeConfig,
}

impl DataNodeServer {
    pub fn new(config: DataNodeConfig) -> Self {
        Self { config }
    }

    pub async fn serve(self) -> Result<()> {
        self.config.validate()?;
        let address = self.config.advertised_addr();

        tracing::info!("Starting data node");
        tracing::info!("  Address: {}", address);
        tracing::info!("  Storage: {}", self.config.storage_dir.display());
        tracing::info!("  Coordinator: {}", self.config.master_addr);

        let storage = Arc::new(ChunkStorage::open(&self.config.storage_dir)?);

        tokio::spawn(heartbeat_loop(
            storage.clone(),
            address.clone(),
            self.config.master_addr.clone(),
        ));

        let service = DataNodeGrpcService::new(
            storage,
            address.clone(),
            self.config.master_addr.clone(),
        );

        let listener = tokio::net::TcpListener::bind(address.as_str()).await?;
        tracing::info!("✓ Data node ready on {}", listener.local_addr()?);

        tonic::transport::Server::builder()
            .add_service(service.into_server())
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .map_err(|e| crate::Error::Internal(format!("server error: {}", e)))?;

        Ok(())
    }
}

/// Report liveness and inventory every tick. The first tick fires
/// immediately so a freshly booted node is placeable right away. Failures
/// are logged and dropped; the next tick repairs the coordinator's view.
async fn heartbeat_loop(storage: Arc<ChunkStorage>, address: String, master_addr: String) {
    let timeouts = RpcTimeouts::default();
    let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);

    loop {
        ticker.tick().await;

        let chunk_handles = storage.list_chunks();
        let count = chunk_handles.len();

        let result = async {
            let mut client =
                rpc::connect_coordinator(&master_addr, timeouts.background).await?;
            client
                .heartbeat(HeartbeatRequest {
                    chunk_server_address: address.clone(),
                    chunk_handles,
                })
                .await?;
            crate::Result::Ok(())
        }
        .await;

        match result {
            Ok(()) => tracing::debug!(chunks = count, "heartbeat sent"),
            Err(e) => tracing::warn!(error = %e, "heartbeat failed"),
        }
    }
}
