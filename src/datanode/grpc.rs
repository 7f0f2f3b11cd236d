//! Data-node gRPC service
//!
//! Two client-facing RPCs. A successful write fires an asynchronous
//! chunk-stored report at the coordinator; the write is acknowledged before
//! that report lands, so the coordinator's view can briefly trail reality.

use crate::common::chunk::CHUNK_SIZE;
use crate::common::{rpc, RpcTimeouts};
use crate::datanode::storage::ChunkStorage;
use crate::proto::data_node_server::{DataNode, DataNodeServer};
use crate::proto::*;
use std::sync::Arc;
use tonic::{Request, Response, Status};

/// Mirror of the client-side limit in `common::rpc`
const MAX_CHUNK_MESSAGE_SIZE: usize = CHUNK_SIZE as usize + 1024 * 1024;

pub struct DataNodeGrpcService {
    storage: Arc<ChunkStorage>,
    /// Address we advertise in chunk reports
    advertised_addr: String,
    master_addr: String,
    timeouts: RpcTimeouts,
}

impl DataNodeGrpcService {
    pub fn new(
        storage: Arc<ChunkStorage>,
        advertised_addr: String,
        master_addr: String,
    ) -> Self {
        Self {
            storage,
            advertised_addr,
            master_addr,
            timeouts: RpcTimeouts::default(),
        }
    }

    pub fn into_server(self) -> DataNodeServer<Self> {
        DataNodeServer::new(self)
            .max_decoding_message_size(MAX_CHUNK_MESSAGE_SIZE)
            .max_encoding_message_size(MAX_CHUNK_MESSAGE_SIZE)
    }

    /// Tell the coordinator we now hold `handle`. Fire-and-forget under a
    /// short deadline; a lost report is repaired by the next heartbeat.
    fn spawn_chunk_report(&self, handle: String) {
        let master_addr = self.master_addr.clone();
        let address = self.advertised_addr.clone();
        let timeout = self.timeouts.background;

        tokio::spawn(async move {
            let result = async {
                let mut client = rpc::connect_coordinator(&master_addr, timeout).await?;
                client
                    .report_chunk(ReportChunkRequest {
                        chunk_handle: handle.clone(),
                        chunk_server_address: address.clone(),
                    })
                    .await?;
                crate::Result::Ok(())
            }
            .await;

            if let Err(e) = result {
                tracing::warn!(handle = %handle, error = %e, "failed to report chunk to coordinator");
            }
        });
    }
}

#[tonic::async_trait]
impl DataNode for DataNodeGrpcService {
    async fn write_chunk(
        &self,
        req: Request<WriteChunkRequest>,
    ) -> Result<Response<WriteChunkResponse>, Status> {
        let req = req.into_inner();
        tracing::info!(
            handle = %req.chunk_handle,
            index = req.chunk_index,
            bytes = req.data.len(),
            "writing chunk"
        );

        self.storage
            .write_chunk(&req.chunk_handle, &req.data)
            .map_err(|e| {
                tracing::error!(handle = %req.chunk_handle, error = %e, "chunk write failed");
                Status::internal(e.to_string())
            })?;

        self.spawn_chunk_report(req.chunk_handle);

        Ok(Response::new(WriteChunkResponse { success: true }))
    }

    async fn read_chunk(
        &self,
        req: Request<ReadChunkRequest>,
    ) -> Result<Response<ReadChunkResponse>, Status> {
        let req = req.into_inner();
        tracing::info!(handle = %req.chunk_handle, "reading chunk");

        let data = self
            .storage
            .read_chunk(&req.chunk_handle)
            .map_err(|e| e.to_status())?;

        Ok(Response::new(ReadChunkResponse { data }))
    }
}
