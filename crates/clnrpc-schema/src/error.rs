/// Errors raised by the method registry.
///
/// Argument errors are detected locally, before any request is sent.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// No method with this name is registered.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// A required parameter was not supplied.
    #[error("{method}: missing required parameter: {name}")]
    MissingParameter { method: String, name: String },

    /// A parameter outside the method's declared set was supplied.
    #[error("{method}: unknown parameter: {name}")]
    UnknownParameter { method: String, name: String },

    /// A filter was supplied for a method that does not accept one.
    #[error("{0}: method does not accept a filter")]
    FilterNotSupported(String),

    /// A schema document could not be loaded.
    #[error("failed to load schema: {0}")]
    LoadFailed(String),

    /// A request schema could not be compiled.
    #[error("failed to compile schema for {method}: {message}")]
    CompileFailed { method: String, message: String },

    /// The arguments failed request schema validation.
    #[error("{method}: invalid parameters: {message}")]
    ValidationFailed { method: String, message: String },

    /// A schema document is not valid JSON.
    #[error("schema is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
