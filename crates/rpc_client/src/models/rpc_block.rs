// Copyright (C) 2015-2025 The Usechain Exporter Authors.
//
// rpc_block.rs file belongs to the usechain-exporter project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use super::quantity;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Block as returned by `use_getBlockByNumber`.
///
/// Only the fields the collector reads are typed; `transactions` holds
/// hashes when the block was requested without full transactions and
/// objects otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    /// Block height
    #[serde(deserialize_with = "quantity::deserialize")]
    pub number: u64,

    /// Block hash
    #[serde(default)]
    pub hash: Option<String>,

    /// Parent block hash
    #[serde(default)]
    pub parent_hash: Option<String>,

    /// Unix timestamp in seconds
    #[serde(deserialize_with = "quantity::deserialize")]
    pub timestamp: u64,

    /// Encoded block size in bytes
    #[serde(deserialize_with = "quantity::deserialize")]
    pub size: u64,

    /// Transaction hashes or objects
    #[serde(default)]
    pub transactions: Vec<Value>,
}

impl RpcBlock {
    /// Number of transactions listed in the block body.
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}
