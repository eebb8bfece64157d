use serde_json::Value;

/// Status the node's HTTP server uses when its work queue is full.
const OVERLOAD_CODE: u16 = 429;

/// Every failure a call can surface.
///
/// Client-originated variants render with a `Qtum JSON-RPC: ` prefix so they
/// can be told apart from [`RpcError::Server`], which carries the node's own
/// error object untouched.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("Qtum JSON-RPC: invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Qtum JSON-RPC: unknown method `{0}`")]
    UnknownMethod(String),

    #[error("Qtum JSON-RPC: Connection Rejected: {status} {reason}")]
    Auth { status: u16, reason: &'static str },

    /// The node answered `500 Work queue depth exceeded`. Safe to retry later.
    #[error("Qtum JSON-RPC: {0}")]
    Overload(String),

    #[error("Qtum JSON-RPC: Error Parsing JSON: {0}")]
    Protocol(String),

    #[error("Qtum JSON-RPC: Request Error: {0}")]
    Transport(String),

    #[error("Qtum JSON-RPC: Request Timed Out: {0}")]
    Timeout(String),

    #[error("Qtum JSON-RPC: {0}")]
    InvalidState(String),

    #[error("Qtum JSON-RPC: invalid configuration: {0}")]
    Config(String),

    /// Error object reported by the node, as received.
    #[error("{0}")]
    Server(Value),
}

impl RpcError {
    /// HTTP-flavoured code for the failure, when one applies.
    pub fn code(&self) -> Option<u16> {
        match self {
            RpcError::Auth { status, .. } => Some(*status),
            RpcError::Overload(_) => Some(OVERLOAD_CODE),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, RpcError::Overload(_))
    }

    /// The node's error object, if this failure came from the node itself.
    pub fn server_error(&self) -> Option<&Value> {
        match self {
            RpcError::Server(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_carry_prefix() {
        let errors = [
            RpcError::InvalidArgument("x".into()),
            RpcError::Auth {
                status: 401,
                reason: "Unauthorized",
            },
            RpcError::Overload("Work queue depth exceeded".into()),
            RpcError::Protocol("eof".into()),
            RpcError::Transport("refused".into()),
            RpcError::InvalidState("busy".into()),
        ];
        for err in errors {
            assert!(err.to_string().starts_with("Qtum JSON-RPC: "), "{err}");
        }
    }

    #[test]
    fn server_error_renders_verbatim() {
        let err = RpcError::Server(serde_json::json!({
            "code": -8,
            "message": "Block height out of range"
        }));
        assert_eq!(
            err.to_string(),
            r#"{"code":-8,"message":"Block height out of range"}"#
        );
        assert_eq!(err.server_error().and_then(|e| e["code"].as_i64()), Some(-8));
        assert_eq!(err.code(), None);
    }

    #[test]
    fn overload_is_retryable_with_429() {
        let err = RpcError::Overload("Work queue depth exceeded".into());
        assert!(err.is_retryable());
        assert_eq!(err.code(), Some(429));
        assert_eq!(err.to_string(), "Qtum JSON-RPC: Work queue depth exceeded");

        let auth = RpcError::Auth {
            status: 403,
            reason: "Forbidden",
        };
        assert!(!auth.is_retryable());
        assert_eq!(auth.code(), Some(403));
    }
}
