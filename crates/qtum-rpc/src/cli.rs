use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use qtum_rpc_core::{ClientConfig, LogLevel};
use serde_json::Value;

/// qtum-rpc — call a Qtum node's JSON-RPC interface from the command line.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Node RPC host.
    #[arg(long, default_value = "127.0.0.1", env = "QTUM_RPC_HOST")]
    pub host: String,

    /// Node RPC port.
    #[arg(long, default_value = "3889", env = "QTUM_RPC_PORT")]
    pub port: u16,

    /// RPC username.
    #[arg(long, default_value = "user", env = "QTUM_RPC_USER")]
    pub user: String,

    /// RPC password.
    #[arg(long, default_value = "pass", env = "QTUM_RPC_PASS")]
    pub pass: String,

    #[arg(long, value_enum, default_value = "https", env = "QTUM_RPC_PROTOCOL")]
    pub protocol: Protocol,

    /// Accept any TLS certificate the node presents.
    #[arg(long, env = "QTUM_RPC_INSECURE")]
    pub insecure: bool,

    /// Open a new connection for every request.
    #[arg(long, env = "QTUM_RPC_DISABLE_CONNECTION_REUSE")]
    pub disable_connection_reuse: bool,

    #[arg(long, default_value = "10", env = "QTUM_RPC_CONNECT_TIMEOUT_SECS")]
    pub connect_timeout_secs: u64,

    #[arg(long, default_value = "30", env = "QTUM_RPC_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    /// Maximum outbound requests per second (a batch counts as one).
    #[arg(long, env = "QTUM_RPC_REQUESTS_PER_SECOND")]
    pub requests_per_second: Option<u32>,

    /// Verbosity of the client's own diagnostics: none, normal or debug.
    #[arg(long, default_value = "normal", env = "QTUM_RPC_LOG_LEVEL")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Call one method. Arguments are parsed as JSON when possible, else taken as strings.
    Call {
        method: String,
        args: Vec<String>,
    },
    /// Send several calls as one JSON-RPC batch.
    Batch {
        /// A call as `"<method> [args...]"` (repeatable).
        #[arg(long = "call", required = true)]
        calls: Vec<String>,
    },
    /// List the known methods and their parameter tags.
    Methods,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Protocol {
    Http,
    Https,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            pass: self.pass.clone(),
            use_tls: matches!(self.protocol, Protocol::Https),
            reject_unauthorized: !self.insecure,
            disable_connection_reuse: self.disable_connection_reuse,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.timeout_secs),
            requests_per_second: self.requests_per_second,
        }
    }
}

pub fn parse_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

/// Split `"<method> [args...]"` on whitespace.
pub fn parse_call_spec(spec: &str) -> Option<(String, Vec<Value>)> {
    let mut parts = spec.split_whitespace();
    let method = parts.next()?.to_owned();
    Some((method, parts.map(parse_arg).collect()))
}
