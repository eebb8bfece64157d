use std::error::Error;
use std::num::NonZeroU32;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::header;

use crate::config::ClientConfig;
use crate::error::RpcError;

use super::{HttpReply, Transport};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// [`Transport`] over HTTP(S) with Basic authentication.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    user: String,
    pass: String,
    limiter: Option<DirectRateLimiter>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, RpcError> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .tcp_nodelay(true);
        if config.use_tls && !config.reject_unauthorized {
            builder = builder.danger_accept_invalid_certs(true);
        }
        builder = if config.disable_connection_reuse {
            builder.pool_max_idle_per_host(0)
        } else {
            builder.pool_max_idle_per_host(32)
        };
        let client = builder
            .build()
            .map_err(|e| RpcError::Config(format!("build HTTP client: {e}")))?;

        let limiter = config
            .requests_per_second
            .and_then(NonZeroU32::new)
            .map(|limit| RateLimiter::direct(Quota::per_second(limit)));

        Ok(Self {
            client,
            url: config.endpoint(),
            user: config.user.clone(),
            pass: config.pass.clone(),
            limiter,
        })
    }

    async fn wait_for_rate_limit(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, body: String) -> Result<HttpReply, RpcError> {
        self.wait_for_rate_limit().await;

        // reqwest derives Content-Length from the body.
        let response = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .basic_auth(&self.user, Some(&self.pass))
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;

        Ok(HttpReply { status, body })
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

fn transport_error(err: reqwest::Error) -> RpcError {
    let message = describe_chain(&err);
    if err.is_timeout() {
        RpcError::Timeout(message)
    } else {
        RpcError::Transport(message)
    }
}

// reqwest's Display stops at "error sending request"; the connect, DNS or TLS
// cause lives further down the source chain.
fn describe_chain(err: &(dyn Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
