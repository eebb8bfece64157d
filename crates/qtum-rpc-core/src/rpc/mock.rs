use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::RpcError;

use super::{HttpReply, Transport};

/// A scripted transport for tests. Replays canned replies in order and keeps
/// every posted body for inspection.
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<HttpReply, String>>>,
    sent: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            replies: VecDeque::new(),
            gate: None,
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("sent lock").clone()
    }

    pub fn sent_json(&self) -> Vec<serde_json::Value> {
        self.sent()
            .iter()
            .map(|body| serde_json::from_str(body).expect("posted body is JSON"))
            .collect()
    }
}

pub struct MockTransportBuilder {
    replies: VecDeque<Result<HttpReply, String>>,
    gate: Option<Arc<Notify>>,
}

impl MockTransportBuilder {
    pub fn reply(mut self, status: u16, body: &str) -> Self {
        self.replies.push_back(Ok(HttpReply {
            status,
            body: body.to_owned(),
        }));
        self
    }

    /// Queue a transport-level failure.
    pub fn fail(mut self, cause: &str) -> Self {
        self.replies.push_back(Err(cause.to_owned()));
        self
    }

    /// Hold every reply until `gate` is notified once per request.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            replies: Mutex::new(self.replies),
            sent: Mutex::new(Vec::new()),
            gate: self.gate,
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, body: String) -> Result<HttpReply, RpcError> {
        let next = self.replies.lock().expect("replies lock").pop_front();
        self.sent.lock().expect("sent lock").push(body);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match next {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(cause)) => Err(RpcError::Transport(cause)),
            None => Err(RpcError::Transport("mock transport has no reply queued".into())),
        }
    }

    fn endpoint(&self) -> &str {
        "mock://node"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_in_order_and_records_bodies() {
        let mock = MockTransport::builder()
            .reply(200, "first")
            .fail("reset by peer")
            .build();

        let reply = mock.post("a".into()).await.expect("first reply");
        assert_eq!(reply.body, "first");
        let err = mock.post("b".into()).await.expect_err("second fails");
        assert!(err.to_string().contains("reset by peer"));
        assert!(mock.post("c".into()).await.is_err());

        assert_eq!(mock.sent(), vec!["a", "b", "c"]);
    }
}
