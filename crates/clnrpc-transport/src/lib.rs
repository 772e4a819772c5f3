//! Unix domain socket transport for talking to a local lightningd.
//!
//! This is the lowest layer of clnrpc. It owns connecting to the daemon's
//! RPC socket, including socket paths longer than the platform's
//! `sun_path` limit, and hands back an [`RpcStream`] for everything else
//! to build on.

pub mod error;
pub mod stream;

#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
pub use stream::RpcStream;

#[cfg(unix)]
pub use uds::{connect, plan_connect, relative_path, ConnectPlan, MAX_PATH_LEN};
