// Copyright (C) 2015-2025 The Usechain Exporter Authors.
//
// rpc_client/mod.rs file belongs to the usechain-exporter project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

mod builder;
mod client;
mod hooks;

pub use builder::RpcClientBuilder;
pub use hooks::{RpcClientHooks, RpcRequestOutcome};

use reqwest::{Client, Url};
use std::time::Duration;

/// Default HTTP timeout for a single request.
pub(crate) const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// Default method namespace.
pub(crate) const DEFAULT_NAMESPACE: &str = "use";

/// The RPC client used to query a Usechain node
pub struct RpcClient {
    base_address: Url,
    http_client: Client,
    namespace: String,
    request_timeout: Duration,
    hooks: RpcClientHooks,
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("base_address", &self.base_address.as_str())
            .field("namespace", &self.namespace)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
