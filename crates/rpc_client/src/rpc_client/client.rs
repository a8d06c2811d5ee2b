// Copyright (C) 2015-2025 The Usechain Exporter Authors.
//
// rpc_client/client.rs file belongs to the usechain-exporter project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use super::builder::RpcClientBuilder;
use super::hooks::RpcRequestOutcome;
use super::{RpcClient, RpcClientHooks};
use crate::models::{quantity, RpcBlock, RpcRequest, RpcResponse};
use crate::{RpcError, RpcResult};
use reqwest::{Client, Url};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

impl RpcClient {
    /// Creates a configurable builder for the RPC client.
    #[must_use]
    pub fn builder(url: Url) -> RpcClientBuilder {
        RpcClientBuilder::new(url)
    }

    /// Creates a client with default settings.
    pub fn new(url: Url) -> RpcResult<Self> {
        RpcClientBuilder::new(url).build()
    }

    /// Creates a new RPC client with an existing HTTP client and hook/timeout configuration.
    #[must_use]
    pub fn with_client_config(
        client: Client,
        url: Url,
        namespace: String,
        hooks: RpcClientHooks,
        timeout: Duration,
    ) -> Self {
        Self {
            base_address: url,
            http_client: client,
            namespace,
            request_timeout: timeout,
            hooks,
        }
    }

    /// Node endpoint.
    pub fn url(&self) -> &Url {
        &self.base_address
    }

    /// Qualifies `name` with the configured namespace (`blockNumber` -> `use_blockNumber`).
    pub fn method_name(&self, name: &str) -> String {
        format!("{}_{}", self.namespace, name)
    }

    fn as_rpc_request(method: &str, params: Vec<Value>) -> RpcRequest {
        RpcRequest::new(json!(1), method, params)
    }

    fn as_rpc_response(content: &str) -> RpcResult<RpcResponse> {
        serde_json::from_str(content)
            .map_err(|e| RpcError::invalid_response(format!("Parse error: {e}")))
    }

    /// Sends a request and returns the decoded envelope, error object included.
    pub async fn send_async(&self, request: RpcRequest) -> RpcResult<RpcResponse> {
        let method = request.method.clone();
        let start = Instant::now();

        let result: RpcResult<RpcResponse> = async {
            let response = self
                .http_client
                .post(self.base_address.clone())
                .json(&request)
                .send()
                .await
                .map_err(|e| RpcError::request_failed(format!("HTTP error: {e}")))?;

            let status = response.status();
            let content = response
                .text()
                .await
                .map_err(|e| RpcError::request_failed(format!("Failed to read response: {e}")))?;

            if !status.is_success() {
                return Err(RpcError::request_failed(format!(
                    "HTTP status {status}: {content}"
                )));
            }

            Self::as_rpc_response(&content)
        }
        .await;

        let error_code = match &result {
            Ok(response) => response.error.as_ref().map(|e| e.code),
            Err(err) => err.code(),
        };
        self.hooks.notify(RpcRequestOutcome {
            method,
            elapsed: start.elapsed(),
            success: matches!(&result, Ok(response) if response.error.is_none()),
            timeout: self.request_timeout,
            error_code,
        });

        result
    }

    /// Calls `method` and returns its result, `Value::Null` when the node
    /// returned none. A JSON-RPC error object becomes [`RpcError::Rpc`].
    pub async fn rpc_send_async(&self, method: &str, params: Vec<Value>) -> RpcResult<Value> {
        let request = Self::as_rpc_request(method, params);
        let response = self.send_async(request).await?;

        if let Some(error) = response.error {
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result.unwrap_or(Value::Null))
    }

    // Chain methods

    /// Returns the height of the most recent block.
    pub async fn block_number(&self) -> RpcResult<u64> {
        let method = self.method_name("blockNumber");
        let result = self.rpc_send_async(&method, vec![]).await?;
        quantity::from_value(&result, &method)
    }

    /// Returns the block at `height`. With `include_tx` the body carries full
    /// transaction objects instead of hashes.
    pub async fn get_block_by_number(&self, height: u64, include_tx: bool) -> RpcResult<RpcBlock> {
        let method = self.method_name("getBlockByNumber");
        let result = self
            .rpc_send_async(&method, vec![json!(quantity::encode(height)), json!(include_tx)])
            .await?;

        if result.is_null() {
            return Err(RpcError::BlockNotFound { height });
        }
        Ok(serde_json::from_value(result)?)
    }

    /// Returns the number of transactions in the block at `height`.
    pub async fn get_block_transaction_count_by_number(&self, height: u64) -> RpcResult<u64> {
        let method = self.method_name("getBlockTransactionCountByNumber");
        let result = self
            .rpc_send_async(&method, vec![json!(quantity::encode(height))])
            .await?;

        if result.is_null() {
            return Err(RpcError::BlockNotFound { height });
        }
        quantity::from_value(&result, &method)
    }
}
