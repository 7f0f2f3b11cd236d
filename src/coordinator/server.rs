//! Coordinator server

use crate::common::{CoordinatorConfig, Result};
use crate::coordinator::grpc::CoordinatorGrpcService;
use crate::coordinator::metadata::MetadataStore;
use std::sync::Arc;
use tokio_stream::wrappers::TcpListenerStream;

pub struct Coordinator {
    config: CoordinatorConfig,
}

impl Coordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self { config }
    }

    pub async fn serve(self) -> Result<()> {
        self.config.validate()?;

        tracing::info!("Starting coordinator");
        tracing::info!("  Bind address: {}", self.config.bind_addr);
        tracing::info!("  Replication target: {}", self.config.replication_factor);

        let metadata = Arc::new(MetadataStore::new());
        let service = CoordinatorGrpcService::new(metadata, self.config.replication_factor);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr.as_str()).await?;
        tracing::info!("✓ Coordinator ready on {}", listener.local_addr()?);

        tonic::transport::Server::builder()
            .add_service(service.into_server())
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .map_err(|e| crate::Error::Internal(format!("server error: {}", e)))?;

        Ok(())
    }
}
