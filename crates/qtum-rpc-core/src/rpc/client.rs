use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::RpcError;
use crate::log::RpcLogger;
use crate::methods::MethodTable;

use super::batch::{BatchGuard, BatchSession};
use super::protocol::{build_request, decode_reply, split_batch, RpcRequest, RpcResponse};
use super::{HttpTransport, Transport};

/// Qtum JSON-RPC client.
///
/// Single calls are independent and may run concurrently on one client.
/// At most one [`with_batch`](Self::with_batch) may be open per client at a
/// time; an overlapping attempt fails with [`RpcError::InvalidState`].
pub struct RpcClient {
    transport: Arc<dyn Transport>,
    methods: MethodTable,
    log: Arc<dyn RpcLogger>,
    next_id: AtomicU64,
    batch_open: AtomicBool,
}

impl RpcClient {
    /// Create a client that talks HTTP(S) to the node described by `config`.
    pub fn new(config: ClientConfig, log: Arc<dyn RpcLogger>) -> Result<Self, RpcError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(Arc::new(transport), log))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, log: Arc<dyn RpcLogger>) -> Self {
        Self {
            transport,
            methods: MethodTable::builtin(),
            log,
            next_id: AtomicU64::new(initial_request_id()),
            batch_open: AtomicBool::new(false),
        }
    }

    /// Replace the built-in method table.
    pub fn with_method_table(mut self, methods: MethodTable) -> Self {
        self.methods = methods;
        self
    }

    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Call a method from the method table, coercing `args` by its declared tags.
    pub async fn invoke(&self, method: &str, args: Vec<Value>) -> Result<Value, RpcError> {
        let request = build_request(&self.methods, method, args, self.reserve_request_id())?;
        self.send_single(&request).await
    }

    /// Call `method` with `params` as given, without consulting the method table.
    pub async fn call_raw(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: method.to_owned(),
            params,
            id: self.reserve_request_id(),
        };
        self.send_single(&request).await
    }

    /// Collect the calls queued by `build` and send them as one JSON-RPC batch.
    ///
    /// `build` runs to completion before anything is sent; if it fails, nothing
    /// is sent. The returned responses are in the order the node sent them;
    /// match them to requests with the ids returned by [`BatchSession::call`].
    pub async fn with_batch<F>(&self, build: F) -> Result<Vec<RpcResponse>, RpcError>
    where
        F: FnOnce(&mut BatchSession<'_>) -> Result<(), RpcError>,
    {
        let _guard = BatchGuard::acquire(&self.batch_open)?;

        let requests = {
            let mut session = BatchSession::new(&self.methods);
            build(&mut session)?;
            session.into_requests()
        };
        if requests.is_empty() {
            return Err(RpcError::InvalidState(
                "batch finished without queuing any calls".to_owned(),
            ));
        }

        self.log.debug(&format!(
            "rpc batch call: {} requests to {}",
            requests.len(),
            self.transport.endpoint()
        ));
        let decoded = self.send(&requests).await?;
        split_batch(decoded)
    }

    async fn send_single(&self, request: &RpcRequest) -> Result<Value, RpcError> {
        self.log.debug(&format!(
            "rpc call: id={} method={} params={}",
            request.id,
            request.method,
            request.params.len()
        ));
        self.send(request).await
    }

    async fn send<P: Serialize + ?Sized>(&self, payload: &P) -> Result<Value, RpcError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| RpcError::InvalidArgument(format!("serialize request: {e}")))?;

        let reply = self.transport.post(body).await?;
        self.log.debug(&format!(
            "rpc response: status={} body_len={}",
            reply.status,
            reply.body.len()
        ));

        decode_reply(&reply, self.log.as_ref())
    }

    fn reserve_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

fn initial_request_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}
