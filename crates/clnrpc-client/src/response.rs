use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProtocolError;

/// Error reported by the daemon, carried exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for RpcError {}

/// What a call produced: the daemon's result or the daemon's error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    Error(RpcError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Convert into a `Result`, for callers that want `?` on daemon errors.
    pub fn into_result(self) -> std::result::Result<Value, RpcError> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Error(err) => Err(err),
        }
    }

    /// The result value, or the error as `{"code", "message"[, "data"]}`.
    pub fn to_value(&self) -> Value {
        match self {
            Outcome::Success(value) => value.clone(),
            Outcome::Error(err) => error_value(err),
        }
    }
}

fn error_value(err: &RpcError) -> Value {
    let mut map = Map::new();
    map.insert("code".to_string(), Value::from(err.code));
    map.insert("message".to_string(), Value::from(err.message.clone()));
    if let Some(data) = &err.data {
        map.insert("data".to_string(), data.clone());
    }
    Value::Object(map)
}

/// A response to a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// `None` when the daemon answered with `"id": null`.
    pub id: Option<String>,
    pub outcome: Outcome,
}

/// A message the daemon sent without an id.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub method: String,
    pub params: Value,
}

/// Anything the daemon may write on an RPC connection.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Response(Response),
    Notification(Notification),
}

/// Parse a decoded JSON value into a response or notification.
pub fn parse(value: Value) -> Result<Message, ProtocolError> {
    let Value::Object(mut object) = value else {
        return Err(ProtocolError::NotAnObject);
    };

    let id = match object.remove("id") {
        Some(id) => id,
        None => {
            return match object.remove("method") {
                Some(Value::String(method)) => Ok(Message::Notification(Notification {
                    method,
                    params: object.remove("params").unwrap_or(Value::Null),
                })),
                _ => Err(ProtocolError::MissingId),
            }
        }
    };
    let id = match id {
        Value::Null => None,
        Value::String(id) => Some(id),
        other => Some(other.to_string()),
    };
    let label = id.clone().unwrap_or_else(|| "null".to_string());

    let outcome = match (object.remove("result"), object.remove("error")) {
        (Some(_), Some(_)) => return Err(ProtocolError::AmbiguousOutcome { id: label }),
        (None, None) => return Err(ProtocolError::MissingOutcome { id: label }),
        (Some(result), None) => Outcome::Success(result),
        (None, Some(error)) => Outcome::Error(parse_error(&label, error)?),
    };

    Ok(Message::Response(Response { id, outcome }))
}

/// Parse raw bytes holding exactly one JSON value.
pub fn parse_slice(bytes: &[u8]) -> Result<Message, ProtocolError> {
    let value = serde_json::from_slice(bytes).map_err(ProtocolError::Malformed)?;
    parse(value)
}

fn parse_error(id: &str, error: Value) -> Result<RpcError, ProtocolError> {
    let invalid = |reason: &str| ProtocolError::InvalidError {
        id: id.to_string(),
        reason: reason.to_string(),
    };

    let Value::Object(mut error) = error else {
        return Err(invalid("not an object"));
    };
    let code = error
        .get("code")
        .and_then(Value::as_i64)
        .ok_or_else(|| invalid("code must be an integer"))?;
    let message = match error.remove("message") {
        Some(Value::String(message)) => message,
        _ => return Err(invalid("message must be a string")),
    };

    Ok(RpcError {
        code,
        message,
        data: error.remove("data"),
    })
}
