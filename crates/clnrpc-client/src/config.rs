use std::path::{Path, PathBuf};
use std::time::Duration;

use clnrpc_frame::{FrameConfig, DEFAULT_MAX_MESSAGE};

use crate::id::DEFAULT_ID_PREFIX;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Path of the daemon's `lightning-rpc` socket.
    pub socket_path: PathBuf,
    /// Prefix of every request id.
    pub id_prefix: String,
    /// Read timeout while waiting for a response. `None` blocks forever.
    pub read_timeout: Option<Duration>,
    /// Write timeout while sending a request.
    pub write_timeout: Option<Duration>,
    /// Largest response accepted, in bytes.
    pub max_message_size: usize,
}

impl ClientConfig {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            read_timeout: None,
            write_timeout: None,
            max_message_size: DEFAULT_MAX_MESSAGE,
        }
    }

    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Set both read and write timeouts.
    pub fn with_timeout(self, timeout: Option<Duration>) -> Self {
        self.with_read_timeout(timeout).with_write_timeout(timeout)
    }

    pub fn with_max_message_size(mut self, max: usize) -> Self {
        self.max_message_size = max;
        self
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub(crate) fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            max_message_size: self.max_message_size,
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
        }
    }
}
