//! Client-side orchestration
//!
//! Translates file-level intent into the wire protocol: ask the coordinator
//! for placements, then move chunk bytes directly to and from data nodes.
//! Chunks are streamed from disk one at a time, so uploading never buffers
//! the whole file.

use crate::common::{chunk::CHUNK_SIZE, rpc, ClientConfig, Error, Result};
use crate::proto::*;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt, SeekFrom};

/// Stateless client: every operation opens its own channels and leaves
/// nothing behind.
pub struct DfsClient {
    config: ClientConfig,
}

/// Byte range of chunk `index` within a file of `filesize` bytes.
fn chunk_span(filesize: u64, index: u32) -> (u64, usize) {
    let offset = index as u64 * CHUNK_SIZE;
    let len = (filesize - offset).min(CHUNK_SIZE) as usize;
    (offset, len)
}

impl DfsClient {
    pub fn new(master_addr: impl Into<String>) -> Self {
        Self::with_config(ClientConfig {
            master_addr: master_addr.into(),
            ..ClientConfig::default()
        })
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Upload `local_path` under the name `remote_name`.
    ///
    /// Individual replica failures are warnings; the upload keeps going with
    /// the remaining replicas. A chunk that lands on no replica at all fails
    /// the upload.
    pub async fn upload(&self, local_path: &Path, remote_name: &str) -> Result<()> {
        let mut file = tokio::fs::File::open(local_path).await?;
        let filesize = file.metadata().await?.len();

        tracing::info!(
            local = %local_path.display(),
            remote = remote_name,
            filesize,
            "uploading"
        );

        let mut coordinator =
            rpc::connect_coordinator(&self.config.master_addr, self.config.timeouts.data).await?;
        let placements = coordinator
            .upload_file(UploadFileRequest {
                filename: remote_name.to_string(),
                filesize: filesize as i64,
            })
            .await?
            .into_inner()
            .chunk_locations;

        tracing::info!(chunks = placements.len(), "received placements");

        let mut chunk_bytes = Vec::new();
        for placement in &placements {
            let (offset, len) = chunk_span(filesize, placement.chunk_index as u32);

            chunk_bytes.resize(len, 0);
            file.seek(SeekFrom::Start(offset)).await?;
            file.read_exact(&mut chunk_bytes).await?;

            self.upload_chunk(placement, &chunk_bytes).await?;
        }

        tracing::info!(remote = remote_name, "upload complete");
        Ok(())
    }

    /// Fan one chunk out to its target replicas, in the order the
    /// coordinator returned them.
    async fn upload_chunk(&self, placement: &ChunkPlacement, data: &[u8]) -> Result<()> {
        let mut stored = 0usize;

        for address in &placement.chunk_server_addresses {
            let result = async {
                let mut node = rpc::connect_data_node(address, self.config.timeouts.data).await?;
                node.write_chunk(WriteChunkRequest {
                    chunk_handle: placement.chunk_handle.clone(),
                    data: data.to_vec(),
                    chunk_index: placement.chunk_index,
                })
                .await?;
                Result::Ok(())
            }
            .await;

            match result {
                Ok(()) => {
                    tracing::debug!(
                        chunk_index = placement.chunk_index,
                        address = %address,
                        "replica stored"
                    );
                    stored += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        chunk_index = placement.chunk_index,
                        address = %address,
                        error = %e,
                        "replica write failed, continuing"
                    );
                }
            }
        }

        if stored == 0 {
            return Err(Error::Unavailable(format!(
                "chunk {} was not stored on any data node",
                placement.chunk_index
            )));
        }
        Ok(())
    }

    /// Download `remote_name` into `local_path`, reassembling chunks at
    /// their offsets. Each chunk is read from the first replica that
    /// answers; a chunk with no reachable replica fails the download.
    pub async fn download(&self, remote_name: &str, local_path: &Path) -> Result<()> {
        tracing::info!(remote = remote_name, local = %local_path.display(), "downloading");

        let mut coordinator =
            rpc::connect_coordinator(&self.config.master_addr, self.config.timeouts.data).await?;
        let response = coordinator
            .download_file(DownloadFileRequest {
                filename: remote_name.to_string(),
            })
            .await?
            .into_inner();

        let filesize = response.filesize as u64;
        tracing::info!(filesize, chunks = response.chunk_locations.len(), "resolved file");

        let mut file = tokio::fs::File::create(local_path).await?;
        file.set_len(filesize).await?;

        for placement in &response.chunk_locations {
            let data = self.download_chunk(placement).await?;

            let offset = placement.chunk_index as u64 * CHUNK_SIZE;
            file.seek(SeekFrom::Start(offset)).await?;
            file.write_all(&data).await?;
        }

        file.flush().await?;
        tracing::info!(remote = remote_name, "download complete");
        Ok(())
    }

    /// Pull one chunk from the first replica that answers, in the order the
    /// coordinator returned them.
    async fn download_chunk(&self, placement: &ChunkPlacement) -> Result<Vec<u8>> {
        for address in &placement.chunk_server_addresses {
            let result = async {
                let mut node = rpc::connect_data_node(address, self.config.timeouts.data).await?;
                let response = node
                    .read_chunk(ReadChunkRequest {
                        chunk_handle: placement.chunk_handle.clone(),
                    })
                    .await?;
                Result::Ok(response.into_inner().data)
            }
            .await;

            match result {
                Ok(data) => {
                    tracing::debug!(
                        chunk_index = placement.chunk_index,
                        address = %address,
                        bytes = data.len(),
                        "replica read"
                    );
                    return Ok(data);
                }
                Err(e) => {
                    tracing::warn!(
                        chunk_index = placement.chunk_index,
                        address = %address,
                        error = %e,
                        "replica read failed, trying next"
                    );
                }
            }
        }

        Err(Error::Unavailable(format!(
            "chunk {} unreachable on every replica",
            placement.chunk_index
        )))
    }

    /// Snapshot of all files known to the coordinator.
    pub async fn list(&self) -> Result<Vec<FileInfo>> {
        let mut coordinator =
            rpc::connect_coordinator(&self.config.master_addr, self.config.timeouts.data).await?;
        let response = coordinator.list_files(ListFilesRequest {}).await?;
        Ok(response.into_inner().files)
    }
}
