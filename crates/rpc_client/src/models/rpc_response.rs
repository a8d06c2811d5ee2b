// Copyright (C) 2015-2025 The Usechain Exporter Authors.
//
// rpc_response.rs file belongs to the usechain-exporter project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Response ID
    #[serde(default)]
    pub id: Value,

    /// JSON-RPC version
    #[serde(rename = "jsonrpc", default)]
    pub json_rpc: String,

    /// Result; `None` when absent or `null`
    #[serde(default)]
    pub result: Option<Value>,

    /// Error object
    #[serde(default)]
    pub error: Option<RpcResponseError>,
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponseError {
    /// Error code
    pub code: i64,

    /// Error message
    pub message: String,

    /// Optional payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}
