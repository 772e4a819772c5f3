use std::fmt;
use std::io;

use clnrpc_client::ClientError;
use clnrpc_frame::FrameError;
use clnrpc_transport::TransportError;

// Daemon-reported errors are output, not failures: they exit with SUCCESS.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        _ => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Connect { source, .. } | TransportError::Io(source) => {
            io_error(context, source)
        }
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::Transport(err) => transport_error(context, err),
        FrameError::Timeout => CliError::new(TIMEOUT, format!("{context}: {err}")),
        FrameError::Malformed(_) | FrameError::MessageTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::ConnectionClosed => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn client_error(context: &str, err: ClientError) -> CliError {
    match err {
        ClientError::Transport(err) => transport_error(context, err),
        ClientError::Frame(err) => frame_error(context, err),
        ClientError::Protocol(err) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        ClientError::Validation(err) => CliError::usage(format!("{context}: {err}")),
        ClientError::Params(err) => CliError::usage(format!("{context}: {err}")),
        ClientError::Json(err) => CliError::usage(format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use clnrpc_client::ProtocolError;
    use clnrpc_schema::SchemaError;

    use super::*;

    #[test]
    fn client_errors_map_to_exit_codes() {
        let missing = ClientError::from(TransportError::Connect {
            path: "/tmp/lightning-rpc".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        });
        assert_eq!(client_error("call", missing).code, TRANSPORT_ERROR);

        let denied = ClientError::from(TransportError::Connect {
            path: "/tmp/lightning-rpc".into(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        });
        assert_eq!(client_error("call", denied).code, PERMISSION_DENIED);

        let timeout = ClientError::from(FrameError::Timeout);
        assert_eq!(client_error("call", timeout).code, TIMEOUT);

        let protocol = ClientError::from(ProtocolError::MissingId);
        assert_eq!(client_error("call", protocol).code, DATA_INVALID);

        let invalid = ClientError::from(SchemaError::UnknownMethod("foo".into()));
        let err = client_error("call", invalid);
        assert_eq!(err.code, USAGE);
        assert!(err.message.starts_with("call: "));
    }
}
