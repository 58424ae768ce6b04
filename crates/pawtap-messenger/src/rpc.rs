// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-RPC 2.0 envelope types exchanged with the gateway sidecar.

use pawtap_core::MessengerError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON-RPC request. `params` always carries the session credentials
/// merged with the call-specific arguments.
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

/// Error object of a failed call. `message` holds the protocol error name,
/// e.g. `FLOOD_WAIT_30`.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    /// Splits the envelope into the call result or a classified error.
    pub fn into_result(self) -> Result<Value, MessengerError> {
        match (self.error, self.result) {
            (Some(err), _) => Err(MessengerError::from_rpc(err.code, &err.message)),
            (None, Some(result)) => Ok(result),
            (None, None) => Ok(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_as_jsonrpc_2() {
        let req = RpcRequest::new(7, "get_me", json!({"session": "main"}));
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 7);
        assert_eq!(value["method"], "get_me");
        assert_eq!(value["params"]["session"], "main");
    }

    #[test]
    fn error_envelope_is_classified() {
        let resp: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": 420, "message": "FLOOD_WAIT_12"}
        }))
        .unwrap();
        assert_eq!(
            resp.into_result(),
            Err(MessengerError::FloodWait { seconds: 12 })
        );
    }

    #[test]
    fn missing_result_is_null() {
        let resp: RpcResponse = serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1})).unwrap();
        assert_eq!(resp.into_result(), Ok(Value::Null));
    }
}
