//! Coordinator gRPC service
//!
//! The five metadata operations: upload allocation, download resolution,
//! listing, heartbeats and chunk-store reports. Chunk bytes never pass
//! through here.

use crate::common::{chunk_count, chunk_handle};
use crate::coordinator::metadata::MetadataStore;
use crate::proto::coordinator_server::{Coordinator, CoordinatorServer};
use crate::proto::*;
use std::sync::Arc;
use tonic::{Request, Response, Status};

pub struct CoordinatorGrpcService {
    metadata: Arc<MetadataStore>,
    replication_factor: usize,
}

impl CoordinatorGrpcService {
    pub fn new(metadata: Arc<MetadataStore>, replication_factor: usize) -> Self {
        Self {
            metadata,
            replication_factor,
        }
    }

    pub fn into_server(self) -> CoordinatorServer<Self> {
        CoordinatorServer::new(self)
    }
}

#[tonic::async_trait]
impl Coordinator for CoordinatorGrpcService {
    /// Create the file record, derive and record its chunks, and hand back a
    /// placement per chunk. Allocation succeeds even when fewer than the
    /// replication target are live; under-replication is a warning, not an
    /// error.
    async fn upload_file(
        &self,
        req: Request<UploadFileRequest>,
    ) -> Result<Response<UploadFileResponse>, Status> {
        let req = req.into_inner();

        if req.filename.is_empty() {
            return Err(Status::invalid_argument("filename cannot be empty"));
        }
        if req.filesize < 0 {
            return Err(Status::invalid_argument("filesize cannot be negative"));
        }
        let filesize = req.filesize as u64;

        let num_chunks = chunk_count(filesize);
        tracing::info!(
            filename = %req.filename,
            filesize,
            num_chunks,
            "upload allocation"
        );

        self.metadata.add_file(&req.filename, filesize, num_chunks);

        let mut chunk_locations = Vec::with_capacity(num_chunks as usize);
        for index in 0..num_chunks {
            let handle = chunk_handle(&req.filename, index);

            self.metadata.add_chunk(&handle, &req.filename, index);
            self.metadata.append_chunk_to_file(&req.filename, &handle);

            let addresses = self.metadata.available_nodes(self.replication_factor);
            if addresses.len() < self.replication_factor {
                tracing::warn!(
                    filename = %req.filename,
                    chunk_index = index,
                    available = addresses.len(),
                    needed = self.replication_factor,
                    "not enough live data nodes for full replication"
                );
            }

            tracing::debug!(chunk_index = index, handle = %handle, ?addresses, "chunk assigned");

            chunk_locations.push(ChunkPlacement {
                chunk_handle: handle,
                chunk_server_addresses: addresses,
                chunk_index: index as i32,
            });
        }

        Ok(Response::new(UploadFileResponse { chunk_locations }))
    }

    /// Resolve a file to its per-chunk replica locations. Locations may be
    /// empty for chunks no data node has reported yet.
    async fn download_file(
        &self,
        req: Request<DownloadFileRequest>,
    ) -> Result<Response<DownloadFileResponse>, Status> {
        let req = req.into_inner();
        tracing::info!(filename = %req.filename, "download request");

        let file = self
            .metadata
            .get_file(&req.filename)
            .ok_or_else(|| Status::not_found(format!("file not found: {}", req.filename)))?;

        let mut chunk_locations = Vec::with_capacity(file.chunks.len());
        for handle in &file.chunks {
            let chunk = self.metadata.get_chunk(handle).ok_or_else(|| {
                tracing::error!(filename = %req.filename, handle = %handle, "chunk record missing for a known file");
                Status::internal(format!("chunk record missing: {}", handle))
            })?;

            chunk_locations.push(ChunkPlacement {
                chunk_handle: chunk.handle,
                chunk_server_addresses: chunk.locations,
                chunk_index: chunk.chunk_index as i32,
            });
        }

        Ok(Response::new(DownloadFileResponse {
            filesize: file.filesize as i64,
            chunk_locations,
        }))
    }

    async fn list_files(
        &self,
        _req: Request<ListFilesRequest>,
    ) -> Result<Response<ListFilesResponse>, Status> {
        let files = self
            .metadata
            .list_files()
            .into_iter()
            .map(|f| FileInfo {
                filename: f.filename,
                filesize: f.filesize as i64,
                num_chunks: f.chunk_count as i32,
            })
            .collect();

        Ok(Response::new(ListFilesResponse { files }))
    }

    async fn heartbeat(
        &self,
        req: Request<HeartbeatRequest>,
    ) -> Result<Response<HeartbeatResponse>, Status> {
        let req = req.into_inner();
        tracing::debug!(
            address = %req.chunk_server_address,
            chunks = req.chunk_handles.len(),
            "heartbeat"
        );

        self.metadata
            .register_node(&req.chunk_server_address, req.chunk_handles);

        Ok(Response::new(HeartbeatResponse { success: true }))
    }

    async fn report_chunk(
        &self,
        req: Request<ReportChunkRequest>,
    ) -> Result<Response<ReportChunkResponse>, Status> {
        let req = req.into_inner();
        tracing::debug!(
            handle = %req.chunk_handle,
            address = %req.chunk_server_address,
            "chunk stored"
        );

        self.metadata
            .add_chunk_location(&req.chunk_handle, &req.chunk_server_address);

        Ok(Response::new(ReportChunkResponse { success: true }))
    }
}
