use serde_json::{Map, Value};

/// The parameter form of one request. Exactly one form is active.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Params {
    /// No parameters. Sent as `{}`.
    #[default]
    None,
    /// Ordered values, sent as an array.
    Positional(Vec<Value>),
    /// Named values, sent as an object.
    Keyword(Map<String, Value>),
    /// Named values plus a projection the daemon applies to the result.
    Filtered {
        params: Map<String, Value>,
        filter: Map<String, Value>,
    },
}

/// Inconsistent or mistyped parameter parts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    /// Two forms that cannot be combined in one request.
    #[error("{first} and {second} params cannot be combined")]
    Conflict {
        first: &'static str,
        second: &'static str,
    },

    /// Positional params must be a JSON array.
    #[error("positional params must be a JSON array")]
    InvalidPositional,

    /// Keyword params must be a JSON object.
    #[error("keyword params must be a JSON object")]
    InvalidKeyword,

    /// A filter must be a JSON object.
    #[error("filter must be a JSON object")]
    InvalidFilter,
}

impl Params {
    /// Positional params from any sequence of values.
    pub fn positional<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Keyword params.
    pub fn keyword(params: Map<String, Value>) -> Self {
        Self::Keyword(params)
    }

    /// Keyword params with a filter. The filter must be an object.
    pub fn filtered(params: Map<String, Value>, filter: Value) -> Result<Self, ParamsError> {
        match filter {
            Value::Object(filter) => Ok(Self::Filtered { params, filter }),
            _ => Err(ParamsError::InvalidFilter),
        }
    }

    /// Assemble params from loosely typed parts.
    ///
    /// Positional params exclude both keyword params and a filter. A filter
    /// without keyword params filters a parameterless call.
    pub fn from_parts(
        positional: Option<Value>,
        keyword: Option<Value>,
        filter: Option<Value>,
    ) -> Result<Self, ParamsError> {
        match (positional, keyword, filter) {
            (Some(_), Some(_), _) => Err(ParamsError::Conflict {
                first: "positional",
                second: "keyword",
            }),
            (Some(_), None, Some(_)) => Err(ParamsError::Conflict {
                first: "positional",
                second: "filter",
            }),
            (Some(Value::Array(values)), None, None) => Ok(Self::Positional(values)),
            (Some(_), None, None) => Err(ParamsError::InvalidPositional),
            (None, keyword, filter) => {
                let params = match keyword {
                    None => None,
                    Some(Value::Object(map)) => Some(map),
                    Some(_) => return Err(ParamsError::InvalidKeyword),
                };
                match (params, filter) {
                    (None, None) => Ok(Self::None),
                    (Some(params), None) => Ok(Self::Keyword(params)),
                    (params, Some(filter)) => Self::filtered(params.unwrap_or_default(), filter),
                }
            }
        }
    }

    /// Interpret a single JSON value: `null` is no params, an array is
    /// positional, an object is keyword.
    pub fn from_value(value: Value) -> Result<Self, ParamsError> {
        match value {
            Value::Null => Ok(Self::None),
            Value::Array(values) => Ok(Self::Positional(values)),
            Value::Object(map) => Ok(Self::Keyword(map)),
            _ => Err(ParamsError::InvalidKeyword),
        }
    }

    /// Whether a filter is attached.
    pub fn is_filtered(&self) -> bool {
        matches!(self, Self::Filtered { .. })
    }

    /// The attached filter, if any.
    pub fn filter(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Filtered { filter, .. } => Some(filter),
            _ => None,
        }
    }

    /// Short name of the active form, for logs.
    pub fn form(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Positional(_) => "positional",
            Self::Keyword(_) => "keyword",
            Self::Filtered { .. } => "filtered",
        }
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Self::Positional(values)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(params: Map<String, Value>) -> Self {
        Self::Keyword(params)
    }
}
