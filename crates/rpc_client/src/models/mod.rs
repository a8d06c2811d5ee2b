//! RPC Models
//!
//! Request/response envelopes and the block shape returned by
//! `use_getBlockByNumber`.

pub mod quantity;
mod rpc_block;
mod rpc_request;
mod rpc_response;

pub use rpc_block::RpcBlock;
pub use rpc_request::RpcRequest;
pub use rpc_response::{RpcResponse, RpcResponseError};
