use std::time::Duration;

use bytes::{Buf, BufMut, BytesMut};
use serde::Serialize;
use serde_json::Value;

use crate::error::{FrameError, Result};

/// Default maximum message size: 64 MiB.
///
/// `listinvoices`/`listpays` on a busy node can produce responses in the
/// tens of megabytes.
pub const DEFAULT_MAX_MESSAGE: usize = 64 * 1024 * 1024;

/// Message reader/writer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameConfig {
    /// Maximum size of a single JSON message in bytes.
    pub max_message_size: usize,
    /// Optional read timeout applied to socket streams. `None` blocks forever.
    pub read_timeout: Option<Duration>,
    /// Optional write timeout applied to socket streams.
    pub write_timeout: Option<Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

/// Encode a value as one newline-terminated JSON message.
pub fn encode_message<T: Serialize + ?Sized>(value: &T, dst: &mut BytesMut) -> Result<()> {
    let encoded = serde_json::to_vec(value).map_err(FrameError::Encode)?;
    dst.reserve(encoded.len() + 1);
    dst.put_slice(&encoded);
    dst.put_u8(b'\n');
    Ok(())
}

/// Incremental splitter for a stream of JSON values.
///
/// Tracks nesting and string state across calls, so each buffered byte is
/// scanned once no matter how many reads a message takes. A value is handed
/// to serde only when it is complete.
#[derive(Debug, Clone)]
pub struct MessageDecoder {
    max_message: usize,
    scanned: usize,
    depth: usize,
    in_string: bool,
    escaped: bool,
    scalar: bool,
}

impl MessageDecoder {
    pub fn new(max_message: usize) -> Self {
        Self {
            max_message,
            scanned: 0,
            depth: 0,
            in_string: false,
            escaped: false,
            scalar: false,
        }
    }

    /// Decode one JSON value from the front of `src`.
    ///
    /// Returns `Ok(None)` if the buffer doesn't contain a complete value yet.
    /// On success, consumes the value bytes (and leading whitespace) from the
    /// buffer; trailing bytes stay for the next call. Between calls the
    /// caller may only append to `src`.
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Value>> {
        if self.scanned == 0 {
            let Some(start) = src.iter().position(|b| !b.is_ascii_whitespace()) else {
                src.clear();
                return Ok(None);
            };
            src.advance(start);
        }

        let Some(end) = self.scan(&src[..]) else {
            self.scanned = src.len();
            if src.len() > self.max_message {
                return Err(FrameError::MessageTooLarge {
                    size: src.len(),
                    max: self.max_message,
                });
            }
            return Ok(None);
        };

        self.reset();
        if end > self.max_message {
            return Err(FrameError::MessageTooLarge {
                size: end,
                max: self.max_message,
            });
        }
        let value = serde_json::from_slice(&src[..end]).map_err(FrameError::Malformed)?;
        src.advance(end);
        Ok(Some(value))
    }

    /// Length of the first complete value, scanning from where the last call
    /// stopped.
    fn scan(&mut self, src: &[u8]) -> Option<usize> {
        for (offset, &byte) in src.iter().enumerate().skip(self.scanned) {
            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if byte == b'\\' {
                    self.escaped = true;
                } else if byte == b'"' {
                    self.in_string = false;
                    if self.depth == 0 {
                        return Some(offset + 1);
                    }
                }
                continue;
            }

            if self.scalar {
                // Bare literals and numbers end at the first delimiter.
                if byte.is_ascii_whitespace() || b"{}[],:\"".contains(&byte) {
                    return Some(offset);
                }
                continue;
            }

            match byte {
                b'{' | b'[' => self.depth += 1,
                b'}' | b']' => {
                    // An unbalanced closer is passed to serde to report.
                    if self.depth <= 1 {
                        return Some(offset + 1);
                    }
                    self.depth -= 1;
                }
                b'"' => self.in_string = true,
                _ if self.depth == 0 && offset == 0 => self.scalar = true,
                _ => {}
            }
        }
        // A bare literal at the very end may still be growing.
        None
    }

    fn reset(&mut self) {
        *self = Self::new(self.max_message);
    }
}

impl Default for MessageDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGE)
    }
}
