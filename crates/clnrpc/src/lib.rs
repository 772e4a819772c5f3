//! JSON-RPC client for a local Core Lightning daemon.
//!
//! # Crate Structure
//!
//! - [`transport`]: Unix socket connection, including paths longer than `sun_path`
//! - [`frame`]: Reading and writing whole JSON messages
//! - [`schema`]: Method registry and argument validation
//! - [`client`]: Request ids, response parsing and the [`Client`] itself

/// Re-export transport types.
pub mod transport {
    pub use clnrpc_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use clnrpc_frame::*;
}

/// Re-export schema types.
pub mod schema {
    pub use clnrpc_schema::*;
}

/// Re-export client types.
pub mod client {
    pub use clnrpc_client::*;
}

pub use clnrpc_client::{Client, ClientConfig, ClientError, Outcome, Params, RpcError};
