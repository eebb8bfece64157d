use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use serde_json::Value;

use crate::error::RpcError;
use crate::methods::MethodTable;

use super::protocol::{build_request, RpcRequest};

/// Batch ids are drawn from the six-digit range.
const BATCH_ID_RANGE: std::ops::Range<u64> = 100_000..1_000_000;

/// Calls collected for one [`RpcClient::with_batch`](super::RpcClient::with_batch).
///
/// Each call is coerced and queued immediately; nothing is sent until the
/// batch closure returns.
#[derive(Debug)]
pub struct BatchSession<'a> {
    methods: &'a MethodTable,
    requests: Vec<RpcRequest>,
    ids: HashSet<u64>,
}

impl<'a> BatchSession<'a> {
    pub(super) fn new(methods: &'a MethodTable) -> Self {
        Self {
            methods,
            requests: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Queue `method` with table-driven coercion. Returns the request id so
    /// the caller can match it against the batch response.
    pub fn call(&mut self, method: &str, args: Vec<Value>) -> Result<u64, RpcError> {
        let id = self.next_id();
        let request = build_request(self.methods, method, args, id)?;
        self.push(request);
        Ok(id)
    }

    /// Queue `method` exactly as given, bypassing the method table.
    pub fn call_raw(&mut self, method: &str, params: Vec<Value>) -> u64 {
        let id = self.next_id();
        self.push(RpcRequest {
            jsonrpc: "2.0",
            method: method.to_owned(),
            params,
            id,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub(super) fn into_requests(self) -> Vec<RpcRequest> {
        self.requests
    }

    fn push(&mut self, request: RpcRequest) {
        self.ids.insert(request.id);
        self.requests.push(request);
    }

    fn next_id(&self) -> u64 {
        let mut rng = rand::thread_rng();
        loop {
            let id = rng.gen_range(BATCH_ID_RANGE);
            if !self.ids.contains(&id) {
                return id;
            }
        }
    }
}

/// Marks a client's batch slot as taken until dropped.
pub(super) struct BatchGuard<'a> {
    open: &'a AtomicBool,
}

impl<'a> BatchGuard<'a> {
    pub(super) fn acquire(open: &'a AtomicBool) -> Result<Self, RpcError> {
        open.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                RpcError::InvalidState("a batch is already in progress on this client".to_owned())
            })?;
        Ok(Self { open })
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.open.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn session_queues_calls_in_order_with_unique_ids() {
        let table = MethodTable::builtin();
        let mut session = BatchSession::new(&table);
        let mut ids = HashSet::new();
        for height in 0..200 {
            let id = session
                .call("getBlockHash", vec![json!(height.to_string())])
                .expect("queues");
            assert!(BATCH_ID_RANGE.contains(&id));
            assert!(ids.insert(id), "duplicate id {id}");
        }
        assert_eq!(session.len(), 200);

        let requests = session.into_requests();
        assert_eq!(requests[0].params, vec![json!(0)]);
        assert_eq!(requests[199].params, vec![json!(199)]);
    }

    #[test]
    fn session_call_propagates_coercion_failure() {
        let table = MethodTable::builtin();
        let mut session = BatchSession::new(&table);
        let err = session
            .call("getblockhash", vec![json!("latest")])
            .expect_err("must reject");
        assert!(matches!(err, RpcError::InvalidArgument(_)));
        assert!(session.is_empty());
    }

    #[test]
    fn call_raw_skips_table() {
        let table = MethodTable::empty();
        let mut session = BatchSession::new(&table);
        session.call_raw("getQtumNetworkInfo", vec![json!("5")]);
        let requests = session.into_requests();
        assert_eq!(requests[0].method, "getQtumNetworkInfo");
        assert_eq!(requests[0].params, vec![json!("5")]);
    }

    #[test]
    fn guard_rejects_overlap_and_releases_on_drop() {
        let open = AtomicBool::new(false);
        let first = BatchGuard::acquire(&open).expect("first batch opens");
        let err = BatchGuard::acquire(&open)
            .err()
            .expect("second batch must be rejected");
        assert!(matches!(err, RpcError::InvalidState(_)));
        drop(first);
        assert!(BatchGuard::acquire(&open).is_ok());
        assert!(!open.load(Ordering::Acquire));
    }
}
