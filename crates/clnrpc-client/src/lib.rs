//! Blocking JSON-RPC client for a local lightningd.
//!
//! One call is one round trip: connect to the RPC socket, write a request
//! tagged with a traceable id (`"<prefix>:<method>#<n>"`), read until the
//! correlated response arrives, and hand back either the result or the
//! daemon's error as plain data.
//!
//! ```no_run
//! use clnrpc_client::{Client, Outcome};
//!
//! let mut client = Client::new("/home/user/.lightning/regtest/lightning-rpc");
//! match client.getinfo()? {
//!     Outcome::Success(info) => println!("node id: {}", info["id"]),
//!     Outcome::Error(err) => eprintln!("daemon refused: {err}"),
//! }
//! # Ok::<(), clnrpc_client::ClientError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod id;
pub mod methods;
pub mod params;
pub mod request;
pub mod response;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, ErrorCategory, ProtocolError, Result};
pub use id::{IdGenerator, DEFAULT_ID_PREFIX};
pub use methods::{InvoiceOptions, PayOptions};
pub use params::{Params, ParamsError};
pub use request::{Request, JSONRPC_VERSION};
pub use response::{parse, parse_slice, Message, Notification, Outcome, Response, RpcError};
