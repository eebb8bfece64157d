use serde_json::Value;

use crate::error::RpcError;
use crate::log::RpcLogger;
use crate::methods::MethodTable;

use super::HttpReply;

/// Exact body the node sends with a 500 when its HTTP work queue is full.
const WORK_QUEUE_EXCEEDED: &str = "Work queue depth exceeded";

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub method: String,
    pub params: Vec<Value>,
    pub id: u64,
}

/// One element of a batch response, exactly as the node returned it.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub id: Value,
}

impl RpcResponse {
    /// Numeric request id, accepting ids echoed back as numeric strings.
    pub fn id_u64(&self) -> Option<u64> {
        self.id
            .as_u64()
            .or_else(|| self.id.as_str().and_then(|s| s.parse().ok()))
    }

    pub fn into_result(self) -> Result<Value, RpcError> {
        match self.error {
            Some(err) => Err(RpcError::Server(err)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Build a request for `method`, coercing each argument with the tag declared
/// for its position. Arguments without a declared tag are sent unchanged, and
/// the argument count is never checked against the tag count.
pub fn build_request(
    table: &MethodTable,
    method: &str,
    args: Vec<Value>,
    id: u64,
) -> Result<RpcRequest, RpcError> {
    let spec = table
        .get(method)
        .ok_or_else(|| RpcError::UnknownMethod(method.to_owned()))?;

    let params = args
        .into_iter()
        .enumerate()
        .map(|(position, arg)| match spec.tag(position) {
            Some(tag) => tag.coerce(arg).map_err(|err| match err {
                RpcError::InvalidArgument(reason) => RpcError::InvalidArgument(format!(
                    "{} parameter {position} ({tag}): {reason}",
                    spec.name
                )),
                other => other,
            }),
            None => Ok(arg),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RpcRequest {
        jsonrpc: "2.0",
        method: spec.name.clone(),
        params,
        id,
    })
}

/// Classify an HTTP reply into the call's result or failure.
///
/// Batch replies come back as the decoded JSON array without correlating
/// entries to requests.
pub fn decode_reply(reply: &HttpReply, log: &dyn RpcLogger) -> Result<Value, RpcError> {
    match reply.status {
        401 => {
            return Err(RpcError::Auth {
                status: 401,
                reason: "Unauthorized",
            })
        }
        403 => {
            return Err(RpcError::Auth {
                status: 403,
                reason: "Forbidden",
            })
        }
        500 if reply.body == WORK_QUEUE_EXCEEDED => {
            return Err(RpcError::Overload(reply.body.clone()))
        }
        _ => {}
    }

    let decoded: Value = match serde_json::from_str(&reply.body) {
        Ok(decoded) => decoded,
        Err(e) => {
            log.error(&format!("Error Parsing JSON: {e}"));
            log.error(&reply.body);
            log.error(&format!("HTTP Status code: {}", reply.status));
            return Err(RpcError::Protocol(e.to_string()));
        }
    };

    match decoded {
        Value::Array(items) => Ok(Value::Array(items)),
        Value::Object(mut envelope) => match envelope.remove("error") {
            Some(err) if !err.is_null() => Err(RpcError::Server(err)),
            _ => Ok(envelope.remove("result").unwrap_or(Value::Null)),
        },
        other => Err(RpcError::Protocol(format!(
            "expected a JSON-RPC envelope, got `{other}`"
        ))),
    }
}

/// Interpret a decoded batch reply as its individual responses.
pub(super) fn split_batch(decoded: Value) -> Result<Vec<RpcResponse>, RpcError> {
    match decoded {
        Value::Array(items) => items
            .into_iter()
            .map(|item| {
                serde_json::from_value(item)
                    .map_err(|e| RpcError::Protocol(format!("invalid batch response item: {e}")))
            })
            .collect(),
        other => Err(RpcError::Protocol(format!(
            "expected a batch response array, got `{other}`"
        ))),
    }
}
