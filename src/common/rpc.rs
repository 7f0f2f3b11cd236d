//! Typed gRPC channel construction
//!
//! Every outbound RPC in the system runs under a deadline: 30 s for data
//! transfers, 5 s for heartbeats and chunk reports. Deadlines are set on the
//! channel, so one helper per peer role is enough. Data-node channels carry
//! whole chunks, so their message-size limits sit above the 64 MiB default
//! chunk size.

use crate::common::chunk::CHUNK_SIZE;
use crate::common::Result;
use crate::proto::coordinator_client::CoordinatorClient;
use crate::proto::data_node_client::DataNodeClient;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

/// Room for a full chunk plus framing overhead
const MAX_CHUNK_MESSAGE_SIZE: usize = CHUNK_SIZE as usize + 1024 * 1024;

async fn connect(addr: &str, timeout: Duration) -> Result<Channel> {
    let endpoint = Endpoint::from_shared(format!("http://{}", addr))
        .map_err(|e| crate::Error::InvalidArgument(format!("bad address {}: {}", addr, e)))?
        .connect_timeout(timeout)
        .timeout(timeout);
    Ok(endpoint.connect().await?)
}

/// Open a channel to the coordinator with the given deadline.
pub async fn connect_coordinator(
    addr: &str,
    timeout: Duration,
) -> Result<CoordinatorClient<Channel>> {
    Ok(CoordinatorClient::new(connect(addr, timeout).await?))
}

/// Open a channel to a data node with the given deadline. Limits are sized
/// for chunk payloads in both directions.
pub async fn connect_data_node(addr: &str, timeout: Duration) -> Result<DataNodeClient<Channel>> {
    Ok(DataNodeClient::new(connect(addr, timeout).await?)
        .max_decoding_message_size(MAX_CHUNK_MESSAGE_SIZE)
        .max_encoding_message_size(MAX_CHUNK_MESSAGE_SIZE))
}
