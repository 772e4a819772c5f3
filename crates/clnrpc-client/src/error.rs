use clnrpc_frame::FrameError;
use clnrpc_schema::SchemaError;
use clnrpc_transport::TransportError;

use crate::params::ParamsError;

/// A response that does not follow the JSON-RPC contract.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The payload is not valid JSON.
    #[error("malformed response: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The payload is valid JSON but not an object.
    #[error("response is not a JSON object")]
    NotAnObject,

    /// The response carries no `id`.
    #[error("response has no id")]
    MissingId,

    /// The response has neither `result` nor `error`.
    #[error("response {id} has neither result nor error")]
    MissingOutcome { id: String },

    /// The response has both `result` and `error`.
    #[error("response {id} has both result and error")]
    AmbiguousOutcome { id: String },

    /// The `error` member is not `{code: integer, message: string}`.
    #[error("response {id} has an invalid error object: {reason}")]
    InvalidError { id: String, reason: String },

    /// The response answers a different request.
    #[error("response id mismatch: expected {expected}, got {actual}")]
    IdMismatch { expected: String, actual: String },
}

/// Broad classes of client failure.
///
/// Daemon-reported errors are not in this list: they are returned as
/// [`crate::Outcome::Error`], not as `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The socket could not be reached, or I/O on it failed.
    Transport,
    /// The daemon answered with something that is not a valid response.
    Protocol,
    /// The call was rejected locally before anything was sent.
    Validation,
}

/// Errors that can occur in client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connecting to the daemon socket failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Reading or writing a message failed.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The daemon's reply broke the JSON-RPC contract.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The arguments do not match the registered method.
    #[error("invalid call: {0}")]
    Validation(#[from] SchemaError),

    /// The parameter forms are inconsistent.
    #[error("invalid params: {0}")]
    Params(#[from] ParamsError),

    /// Arguments could not be converted to JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Transport(_) => ErrorCategory::Transport,
            ClientError::Frame(FrameError::Malformed(_) | FrameError::MessageTooLarge { .. }) => {
                ErrorCategory::Protocol
            }
            ClientError::Frame(FrameError::Encode(_)) => ErrorCategory::Validation,
            ClientError::Frame(_) => ErrorCategory::Transport,
            ClientError::Protocol(_) => ErrorCategory::Protocol,
            ClientError::Validation(_) | ClientError::Params(_) | ClientError::Json(_) => {
                ErrorCategory::Validation
            }
        }
    }

    /// Whether the call gave up waiting on the socket.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Frame(FrameError::Timeout))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
