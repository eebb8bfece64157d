//! JSON-RPC plumbing for talking to a node.
//!
//! [`RpcClient`] turns method calls into [`RpcRequest`]s, hands the serialized
//! payload to a [`Transport`], and classifies the reply. [`HttpTransport`] is
//! the production transport; tests substitute `mock::MockTransport`.

mod batch;
mod client;
mod http_adapter;
#[cfg(test)]
pub mod mock;
pub mod protocol;

pub use batch::BatchSession;
pub use client::RpcClient;
pub use http_adapter::HttpTransport;
pub use protocol::{build_request, decode_reply, RpcRequest, RpcResponse};

use async_trait::async_trait;

use crate::error::RpcError;

/// Raw HTTP outcome of one exchange, before any JSON-RPC interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// One POST of an already-serialized JSON-RPC payload.
///
/// Implementations only fail for transport-level reasons (connect, TLS,
/// socket, timeout). Any reply that arrives, whatever its status, is returned
/// for the caller to classify.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, body: String) -> Result<HttpReply, RpcError>;

    /// Where requests go, for diagnostics.
    fn endpoint(&self) -> &str;
}
