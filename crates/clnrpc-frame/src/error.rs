/// Errors that can occur while framing JSON messages.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The incoming bytes are not valid JSON.
    #[error("malformed JSON message: {0}")]
    Malformed(#[source] serde_json::Error),

    /// An outgoing value could not be serialized.
    #[error("failed to encode JSON message: {0}")]
    Encode(#[source] serde_json::Error),

    /// The message exceeds the configured maximum size.
    #[error("message too large ({size} bytes, max {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing messages.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Applying stream options failed.
    #[error(transparent)]
    Transport(#[from] clnrpc_transport::TransportError),

    /// A read or write did not complete within the configured timeout.
    #[error("timed out waiting on the socket")]
    Timeout,

    /// The connection was closed before a complete message was received.
    #[error("connection closed (incomplete message)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
