pub mod coerce;
pub mod config;
pub mod error;
pub mod log;
pub mod methods;
pub mod rpc;
#[cfg(test)]
mod test_util;

pub use coerce::TypeTag;
pub use config::ClientConfig;
pub use error::RpcError;
pub use log::{LogLevel, RpcLogger, TracingLogger};
pub use methods::{MethodSpec, MethodTable};
pub use rpc::{
    BatchSession, HttpReply, HttpTransport, RpcClient, RpcRequest, RpcResponse, Transport,
};
