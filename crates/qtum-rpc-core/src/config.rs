use std::time::Duration;

use crate::error::RpcError;

/// Connection settings for one client. Fixed once the client is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    /// HTTPS when set, plain HTTP otherwise.
    pub use_tls: bool,
    /// Verify the node's certificate chain. Only meaningful with `use_tls`.
    pub reject_unauthorized: bool,
    /// Open a fresh connection for every request instead of pooling.
    pub disable_connection_reuse: bool,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Outbound HTTP exchanges per second. A batch counts as one exchange.
    pub requests_per_second: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 3889,
            user: "user".to_owned(),
            pass: "pass".to_owned(),
            use_tls: true,
            reject_unauthorized: true,
            disable_connection_reuse: false,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            requests_per_second: None,
        }
    }
}

impl ClientConfig {
    /// `http(s)://host:port/`, with IPv6 literals bracketed.
    pub fn endpoint(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("{scheme}://[{}]:{}/", self.host, self.port)
        } else {
            format!("{scheme}://{}:{}/", self.host, self.port)
        }
    }

    pub(crate) fn validate(&self) -> Result<(), RpcError> {
        if self.host.trim().is_empty() {
            return Err(RpcError::Config("host must not be empty".to_owned()));
        }
        if self.port == 0 {
            return Err(RpcError::Config("port must be non-zero".to_owned()));
        }
        if self.requests_per_second == Some(0) {
            return Err(RpcError::Config(
                "requests_per_second must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}
