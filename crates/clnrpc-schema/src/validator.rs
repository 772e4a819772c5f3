use jsonschema::Validator;
use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};

const JSON_TYPES: [&str; 7] = [
    "null", "boolean", "object", "array", "number", "string", "integer",
];

pub(crate) fn compile(method: &str, schema: &Value) -> Result<Validator> {
    let mut schema = schema.clone();
    normalize_types(&mut schema);
    jsonschema::validator_for(&schema).map_err(|err| SchemaError::CompileFailed {
        method: method.to_string(),
        message: err.to_string(),
    })
}

pub(crate) fn validate_params(method: &str, params: &Value, validator: &Validator) -> Result<()> {
    let mut errors = validator.iter_errors(params);
    if let Some(first) = errors.next() {
        let mut message = first.to_string();
        for err in errors.take(3) {
            message.push_str("; ");
            message.push_str(&err.to_string());
        }
        return Err(SchemaError::ValidationFailed {
            method: method.to_string(),
            message,
        });
    }

    Ok(())
}

/// Rewrite lightningd's extended `type` names (`u64`, `msat`, `pubkey`, ...)
/// into JSON Schema types. Unknown names drop the `type` constraint.
pub(crate) fn normalize_types(value: &mut Value) {
    match value {
        Value::Object(map) => {
            normalize_type_keyword(map);
            for child in map.values_mut() {
                normalize_types(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                normalize_types(item);
            }
        }
        _ => {}
    }
}

fn normalize_type_keyword(map: &mut Map<String, Value>) {
    let Some(Value::String(kind)) = map.get("type") else {
        return;
    };
    if JSON_TYPES.contains(&kind.as_str()) {
        return;
    }

    match json_type_for(kind) {
        Some(mapped) => {
            map.insert("type".to_string(), mapped);
        }
        None => {
            map.remove("type");
        }
    }
}

fn json_type_for(kind: &str) -> Option<Value> {
    match kind {
        "u64" | "u32" | "u16" | "u8" => Some(Value::from("integer")),
        "msat" | "sat" | "msat_or_any" | "sat_or_all" | "feerate" => {
            Some(Value::from(vec!["integer", "string"]))
        }
        "pubkey" | "hex" | "hash" | "secret" | "txid" | "short_channel_id"
        | "short_channel_id_dir" | "outpoint" | "signature" | "bip340sig" | "point32" => {
            Some(Value::from("string"))
        }
        _ => None,
    }
}
