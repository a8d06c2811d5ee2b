use super::{RpcClient, RpcClientHooks, DEFAULT_HTTP_TIMEOUT, DEFAULT_NAMESPACE};
use crate::{RpcError, RpcResult};
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Url};
use std::time::Duration;

/// Builder for [`RpcClient`].
#[derive(Debug)]
pub struct RpcClientBuilder {
    url: Url,
    auth: Option<(String, String)>,
    namespace: String,
    timeout: Duration,
    hooks: RpcClientHooks,
}

impl RpcClientBuilder {
    /// Starts a builder for the node at `url`.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            auth: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
            hooks: RpcClientHooks::default(),
        }
    }

    /// Sends HTTP basic auth when both parts are present.
    #[must_use]
    pub fn with_optional_auth(mut self, user: Option<String>, pass: Option<String>) -> Self {
        self.auth = match (user, pass) {
            (Some(user), Some(pass)) => Some((user, pass)),
            _ => None,
        };
        self
    }

    /// Method namespace, `use` for `use_blockNumber`.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Per-request HTTP timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Request observers.
    #[must_use]
    pub fn hooks(mut self, hooks: RpcClientHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Builds the client.
    pub fn build(self) -> RpcResult<RpcClient> {
        let mut builder = Client::builder().timeout(self.timeout);

        if let Some((user, pass)) = &self.auth {
            let encoded = general_purpose::STANDARD.encode(format!("{}:{}", user, pass));
            let value = HeaderValue::from_str(&format!("Basic {}", encoded))
                .map_err(|e| RpcError::request_failed(format!("invalid auth header: {e}")))?;
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        Ok(RpcClient::with_client_config(
            builder.build()?,
            self.url,
            self.namespace,
            self.hooks,
            self.timeout,
        ))
    }
}
