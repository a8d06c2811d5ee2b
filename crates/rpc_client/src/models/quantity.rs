//! Hex quantity encoding used by the node's JSON-RPC interface.
//!
//! Quantities are `0x`-prefixed, lowercase hex with no leading zeros
//! (`0x0`, `0x41`, `0x400`).

use crate::{RpcError, RpcResult};
use serde::de::{self, Deserializer, Visitor};
use serde_json::Value;
use std::fmt;

/// Encodes `value` as a hex quantity.
pub fn encode(value: u64) -> String {
    format!("{:#x}", value)
}

/// Decodes a hex quantity string.
pub fn decode(text: &str) -> RpcResult<u64> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or_else(|| RpcError::invalid_response(format!("quantity without 0x prefix: {text}")))?;
    if digits.is_empty() {
        return Err(RpcError::invalid_response("empty quantity"));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| RpcError::invalid_response(format!("bad quantity {text}: {e}")))
}

/// Decodes a result value that should hold a quantity.
pub fn from_value(value: &Value, context: &str) -> RpcResult<u64> {
    match value {
        Value::String(text) => decode(text),
        Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| RpcError::invalid_response(format!("{context}: negative quantity"))),
        _ => Err(RpcError::invalid_response(format!(
            "{context}: expected quantity, got {value}"
        ))),
    }
}

/// `deserialize_with` adapter for quantity fields. Plain JSON numbers are
/// accepted too.
pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct QuantityVisitor;

    impl<'de> Visitor<'de> for QuantityVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a 0x-prefixed hex quantity")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
            decode(v).map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }
    }

    deserializer.deserialize_any(QuantityVisitor)
}
