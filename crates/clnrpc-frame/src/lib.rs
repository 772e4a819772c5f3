//! JSON message framing over the daemon RPC socket.
//!
//! lightningd speaks JSON-RPC as a stream of JSON objects: requests are
//! written one per line, and responses are read back as complete JSON
//! values regardless of how the bytes arrive (newline separated, blank-line
//! padded, or split across many reads).
//!
//! No partial reads, no buffer management in user code.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{encode_message, FrameConfig, MessageDecoder, DEFAULT_MAX_MESSAGE};
pub use error::{FrameError, Result};
pub use reader::MessageReader;
pub use writer::MessageWriter;
