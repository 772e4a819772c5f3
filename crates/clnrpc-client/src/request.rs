use serde::Serialize;
use serde_json::{Map, Value};

use crate::params::Params;

/// JSON-RPC protocol version sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// One outgoing JSON-RPC request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub jsonrpc: &'static str,
    pub id: String,
    pub method: String,
    /// `{}` when there are no params, an array for positional params,
    /// an object otherwise.
    pub params: Value,
    /// Field projection applied by the daemon to the result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Map<String, Value>>,
}

impl Request {
    /// Assemble a request. Pure; the params form was validated when built.
    pub fn build(method: impl Into<String>, params: Params, id: impl Into<String>) -> Self {
        let (params, filter) = match params {
            Params::None => (Value::Object(Map::new()), None),
            Params::Positional(values) => (Value::Array(values), None),
            Params::Keyword(map) => (Value::Object(map), None),
            Params::Filtered { params, filter } => (Value::Object(params), Some(filter)),
        };

        Self {
            jsonrpc: JSONRPC_VERSION,
            id: id.into(),
            method: method.into(),
            params,
            filter,
        }
    }
}
