//! Method registry for the lightningd JSON-RPC surface.
//!
//! Each daemon method is described by a [`MethodSpec`]: its required and
//! optional parameter names and whether it accepts a `filter`. The registry
//! is seeded from a hand-maintained table ([`builtin::METHODS`]) and can be
//! extended with lightningd's own request schema documents, which are then
//! also used to type-check arguments before they are sent.

pub mod builtin;
pub mod config;
pub mod error;
pub mod registry;
pub mod spec;
pub mod validator;

pub use builtin::BuiltinMethod;
pub use config::RegistryConfig;
pub use error::{Result, SchemaError};
pub use registry::MethodRegistry;
pub use spec::MethodSpec;
