// Copyright (C) 2015-2025 The Usechain Exporter Authors.
//
// lib.rs file belongs to the usechain-exporter project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Usechain RPC Client Library
//!
//! JSON-RPC 2.0 client for the three chain queries the block collector
//! needs: the head height, a block by height, and a block's transaction
//! count. Quantities travel as `0x`-prefixed hex strings.

mod error;
pub mod models;
mod rpc_client;

pub use error::{RpcError, RpcResult};
pub use rpc_client::{RpcClient, RpcClientBuilder, RpcClientHooks, RpcRequestOutcome};

// Re-export commonly used types
pub use models::{RpcBlock, RpcRequest, RpcResponse, RpcResponseError};
