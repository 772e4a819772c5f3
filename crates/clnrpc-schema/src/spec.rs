use serde_json::{Map, Value};

use crate::builtin::BuiltinMethod;
use crate::error::{Result, SchemaError};

/// Parameter surface of one daemon method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    /// Method name as sent on the wire.
    pub name: String,
    /// Parameters every call must supply, in documentation order.
    pub required: Vec<String>,
    /// Parameters a call may supply.
    pub optional: Vec<String>,
    /// Whether the daemon accepts a `filter` projection for this method.
    pub filterable: bool,
}

impl MethodSpec {
    /// Create a spec from parameter name lists.
    pub fn new<I, J, S, T>(name: impl Into<String>, required: I, optional: J, filterable: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            required: required.into_iter().map(Into::into).collect(),
            optional: optional.into_iter().map(Into::into).collect(),
            filterable,
        }
    }

    /// Whether `name` is one of this method's parameters.
    pub fn accepts(&self, name: &str) -> bool {
        self.required.iter().any(|p| p == name) || self.optional.iter().any(|p| p == name)
    }

    /// Check `args` against this spec and return the params to send.
    ///
    /// `null` values count as absent: they are dropped for optional
    /// parameters and reported as missing for required ones.
    pub fn prepare(&self, mut args: Map<String, Value>, filtered: bool) -> Result<Map<String, Value>> {
        if filtered && !self.filterable {
            return Err(SchemaError::FilterNotSupported(self.name.clone()));
        }

        if let Some(unknown) = args.keys().find(|key| !self.accepts(key.as_str())) {
            return Err(SchemaError::UnknownParameter {
                method: self.name.clone(),
                name: unknown.clone(),
            });
        }

        let mut params = Map::with_capacity(args.len());
        for name in &self.required {
            match args.remove(name) {
                Some(value) if !value.is_null() => {
                    params.insert(name.clone(), value);
                }
                _ => {
                    return Err(SchemaError::MissingParameter {
                        method: self.name.clone(),
                        name: name.clone(),
                    })
                }
            }
        }
        for name in &self.optional {
            if let Some(value) = args.remove(name).filter(|value| !value.is_null()) {
                params.insert(name.clone(), value);
            }
        }

        Ok(params)
    }

    /// Derive a spec from a lightningd request schema document.
    ///
    /// Accepts either a bare request schema (`{"required": [...],
    /// "properties": {...}}`) or a full method document with a `request`
    /// member. The document's `rpc` field names the method when present,
    /// otherwise `fallback_name` is used. Returns the spec and the request
    /// schema itself.
    pub fn from_request_schema(fallback_name: Option<&str>, document: &Value) -> Result<(Self, Value)> {
        let request = match document.get("request") {
            Some(request) if request.is_object() => request,
            _ => document,
        };
        let Some(schema) = request.as_object() else {
            return Err(SchemaError::LoadFailed(
                "request schema must be a JSON object".to_string(),
            ));
        };

        let name = document
            .get("rpc")
            .and_then(Value::as_str)
            .or(fallback_name)
            .ok_or_else(|| SchemaError::LoadFailed("schema does not name its method".to_string()))?;

        let required: Vec<String> = match schema.get("required") {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        SchemaError::LoadFailed(format!("{name}: required entries must be strings"))
                    })
                })
                .collect::<Result<_>>()?,
            Some(_) => {
                return Err(SchemaError::LoadFailed(format!(
                    "{name}: `required` must be an array"
                )))
            }
        };

        let optional = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| {
                properties
                    .keys()
                    .filter(|key| !required.contains(*key))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let spec = Self {
            name: name.to_string(),
            required,
            optional,
            filterable: true,
        };
        Ok((spec, request.clone()))
    }
}

impl From<&BuiltinMethod> for MethodSpec {
    fn from(method: &BuiltinMethod) -> Self {
        Self::new(
            method.name,
            method.required.iter().copied(),
            method.optional.iter().copied(),
            method.filterable,
        )
    }
}
