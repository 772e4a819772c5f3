use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use jsonschema::Validator;
use serde_json::{Map, Value};
use tracing::debug;

use crate::builtin::METHODS;
use crate::config::RegistryConfig;
use crate::error::{Result, SchemaError};
use crate::spec::MethodSpec;
use crate::validator::{compile, validate_params};

struct Entry {
    spec: MethodSpec,
    validator: Option<Validator>,
}

/// Name-keyed registry of method specs, with optional compiled request schemas.
pub struct MethodRegistry {
    entries: HashMap<String, Entry>,
    config: RegistryConfig,
}

impl MethodRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
        }
    }

    /// Registry seeded with the built-in method table.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for method in METHODS {
            registry.register(MethodSpec::from(method));
        }
        registry
    }

    /// Register (or replace) a method spec.
    pub fn register(&mut self, spec: MethodSpec) {
        self.entries.insert(
            spec.name.clone(),
            Entry {
                spec,
                validator: None,
            },
        );
    }

    /// Register a method from a request schema document.
    ///
    /// The derived spec replaces any existing entry of the same name, and
    /// the request schema is compiled for argument validation.
    pub fn register_schema(&mut self, fallback_name: Option<&str>, document: &Value) -> Result<&MethodSpec> {
        let (spec, request) = MethodSpec::from_request_schema(fallback_name, document)?;
        let validator = compile(&spec.name, &request)?;
        let name = spec.name.clone();
        debug!(method = %name, required = spec.required.len(), optional = spec.optional.len(), "registered method schema");
        self.entries.insert(
            name.clone(),
            Entry {
                spec,
                validator: Some(validator),
            },
        );
        Ok(&self.entries[&name].spec)
    }

    /// Register a method from a request schema JSON string.
    pub fn register_schema_str(&mut self, fallback_name: Option<&str>, document: &str) -> Result<&MethodSpec> {
        let document: Value = serde_json::from_str(document)?;
        self.register_schema(fallback_name, &document)
    }

    /// Load schemas from a directory into a fresh registry.
    pub fn from_directory(path: &Path) -> Result<Self> {
        Self::from_directory_with_config(path, RegistryConfig::default())
    }

    /// Load schemas from a directory with explicit config.
    pub fn from_directory_with_config(path: &Path, config: RegistryConfig) -> Result<Self> {
        let mut registry = Self::with_config(config);
        registry.load_directory(path)?;
        Ok(registry)
    }

    /// Load request schema documents from a directory into this registry.
    ///
    /// Recognized files are `<method>.request.json` and
    /// `lightning-<method>.json`; everything else is ignored. Returns the
    /// number of schemas loaded.
    pub fn load_directory(&mut self, path: &Path) -> Result<usize> {
        let mut loaded = 0usize;

        let entries = std::fs::read_dir(path)
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;

        for entry in entries {
            let entry = entry.map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            let Some(method) = method_from_file_name(&file_name) else {
                continue;
            };

            let entry_path = entry.path();
            let metadata = std::fs::symlink_metadata(&entry_path)
                .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
            if metadata.file_type().is_symlink() {
                return Err(SchemaError::LoadFailed(format!(
                    "refusing to load schema symlink: {file_name}"
                )));
            }
            if !metadata.is_file() {
                continue;
            }

            loaded = loaded.saturating_add(1);
            if loaded > self.config.max_schemas_from_directory {
                return Err(SchemaError::LoadFailed(format!(
                    "schema count exceeds configured max ({}): {}",
                    self.config.max_schemas_from_directory, loaded
                )));
            }

            let content = self.read_schema_file(&entry_path, &file_name)?;
            self.register_schema_str(Some(method), &content)?;
        }

        Ok(loaded)
    }

    fn read_schema_file(&self, path: &Path, file_name: &str) -> Result<String> {
        let max_bytes = self.config.max_schema_file_size;
        let file = std::fs::File::open(path).map_err(|err| {
            SchemaError::LoadFailed(format!("failed opening schema {}: {err}", path.display()))
        })?;

        let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
        let mut content = String::new();
        file.take(read_limit)
            .read_to_string(&mut content)
            .map_err(|err| {
                SchemaError::LoadFailed(format!("failed reading schema {}: {err}", path.display()))
            })?;
        if content.len() > max_bytes {
            return Err(SchemaError::LoadFailed(format!(
                "schema file too large: {file_name}"
            )));
        }
        Ok(content)
    }

    /// Look up a method spec.
    pub fn get(&self, name: &str) -> Option<&MethodSpec> {
        self.entries.get(name).map(|entry| &entry.spec)
    }

    /// Whether a method is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered method names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered specs, sorted by name.
    pub fn specs(&self) -> Vec<&MethodSpec> {
        let mut specs: Vec<&MethodSpec> = self.entries.values().map(|entry| &entry.spec).collect();
        specs.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// Whether a method has a compiled request schema.
    pub fn has_schema(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .is_some_and(|entry| entry.validator.is_some())
    }

    /// Validate a registered call and return the keyword params to send.
    pub fn prepare(&self, name: &str, args: Map<String, Value>, filtered: bool) -> Result<Map<String, Value>> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| SchemaError::UnknownMethod(name.to_string()))?;

        let params = entry.spec.prepare(args, filtered)?;

        if let Some(validator) = &entry.validator {
            if self.config.validate_argument_types {
                validate_params(name, &Value::Object(params.clone()), validator)?;
            }
        }

        Ok(params)
    }

    /// Check a registered call without building its params.
    pub fn validate(&self, name: &str, args: &Map<String, Value>, filter: Option<&Map<String, Value>>) -> Result<()> {
        self.prepare(name, args.clone(), filter.is_some()).map(|_| ())
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.entries.len())
            .field("config", &self.config)
            .finish()
    }
}

fn method_from_file_name(file_name: &str) -> Option<&str> {
    let method = if let Some(stem) = file_name.strip_suffix(".request.json") {
        stem
    } else {
        file_name.strip_prefix("lightning-")?.strip_suffix(".json")?
    };

    let valid = !method.is_empty()
        && method
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    valid.then_some(method)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;

    const INVOICE_DOCUMENT: &str = r#"{
        "rpc": "invoice",
        "request": {
            "type": "object",
            "additionalProperties": false,
            "required": ["amount_msat", "label", "description"],
            "properties": {
                "amount_msat": {"type": "msat_or_any"},
                "label": {"type": "string"},
                "description": {"type": "string"},
                "expiry": {"type": "u64"}
            }
        }
    }"#;

    fn make_temp_schema_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "clnrpc-schema-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn builtin_contains_table() {
        let registry = MethodRegistry::builtin();
        assert_eq!(registry.len(), METHODS.len());
        assert!(registry.contains("getinfo"));
        assert!(registry.contains("invoice"));
        assert!(!registry.has_schema("invoice"));
        assert_eq!(registry.names()[0], "check");
    }

    #[test]
    fn prepare_unknown_method() {
        let registry = MethodRegistry::builtin();
        assert!(matches!(
            registry.prepare("foo", Map::new(), false),
            Err(SchemaError::UnknownMethod(name)) if name == "foo"
        ));
    }

    #[test]
    fn prepare_getinfo_without_arguments() {
        let registry = MethodRegistry::builtin();
        let params = registry.prepare("getinfo", Map::new(), true).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn validate_checks_filter_and_arguments() {
        let registry = MethodRegistry::builtin();
        let filter = args(json!({"id": true}));
        registry.validate("getinfo", &Map::new(), Some(&filter)).unwrap();
        assert!(matches!(
            registry.validate("stop", &Map::new(), Some(&filter)),
            Err(SchemaError::FilterNotSupported(_))
        ));
        assert!(matches!(
            registry.validate("pay", &Map::new(), None),
            Err(SchemaError::MissingParameter { name, .. }) if name == "bolt11"
        ));
    }

    #[test]
    fn register_replaces_builtin_entry() {
        let mut registry = MethodRegistry::builtin();
        registry.register(MethodSpec::new("getinfo", ["verbose"], Vec::<String>::new(), true));
        assert_eq!(registry.get("getinfo").unwrap().required, vec!["verbose"]);
    }

    #[test]
    fn schema_document_enables_type_validation() {
        let mut registry = MethodRegistry::builtin();
        registry.register_schema_str(None, INVOICE_DOCUMENT).unwrap();
        assert!(registry.has_schema("invoice"));

        let ok = registry.prepare(
            "invoice",
            args(json!({"amount_msat": "any", "label": "l", "description": "d", "expiry": 10})),
            false,
        );
        assert!(ok.is_ok());

        let bad = registry.prepare(
            "invoice",
            args(json!({"amount_msat": 1000, "label": "l", "description": "d", "expiry": "later"})),
            false,
        );
        assert!(matches!(bad, Err(SchemaError::ValidationFailed { .. })));
    }

    #[test]
    fn type_validation_can_be_disabled() {
        let mut registry = MethodRegistry::with_config(RegistryConfig {
            validate_argument_types: false,
            ..RegistryConfig::default()
        });
        registry.register_schema_str(None, INVOICE_DOCUMENT).unwrap();
        let params = registry
            .prepare(
                "invoice",
                args(json!({"amount_msat": 1, "label": "l", "description": "d", "expiry": "later"})),
                false,
            )
            .unwrap();
        assert_eq!(params["expiry"], "later");
    }

    #[test]
    fn from_directory_loads_recognized_files() {
        let dir = make_temp_schema_dir("load");
        std::fs::write(dir.join("lightning-invoice.json"), INVOICE_DOCUMENT).unwrap();
        std::fs::write(
            dir.join("waitinvoice.request.json"),
            r#"{"type":"object","required":["label"],"properties":{"label":{"type":"string"}}}"#,
        )
        .unwrap();
        std::fs::write(dir.join("README.md"), "not a schema").unwrap();

        let registry = MethodRegistry::from_directory(&dir).unwrap();
        assert_eq!(registry.names(), vec!["invoice", "waitinvoice"]);
        assert_eq!(registry.get("waitinvoice").unwrap().required, vec!["label"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn schema_count_limit_is_enforced() {
        let dir = make_temp_schema_dir("count");
        std::fs::write(dir.join("lightning-invoice.json"), INVOICE_DOCUMENT).unwrap();
        std::fs::write(dir.join("getinfo.request.json"), r#"{"properties":{}}"#).unwrap();

        let config = RegistryConfig {
            max_schemas_from_directory: 1,
            ..RegistryConfig::default()
        };
        let result = MethodRegistry::from_directory_with_config(&dir, config);
        assert!(matches!(result, Err(SchemaError::LoadFailed(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn schema_file_size_limit_is_enforced() {
        let dir = make_temp_schema_dir("size");
        std::fs::write(dir.join("lightning-invoice.json"), INVOICE_DOCUMENT).unwrap();

        let config = RegistryConfig {
            max_schema_file_size: 8,
            ..RegistryConfig::default()
        };
        let result = MethodRegistry::from_directory_with_config(&dir, config);
        assert!(matches!(result, Err(SchemaError::LoadFailed(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_schema_is_rejected() {
        let dir = make_temp_schema_dir("symlink");
        let target = dir.join("target.json");
        std::fs::write(&target, INVOICE_DOCUMENT).unwrap();
        std::os::unix::fs::symlink(&target, dir.join("lightning-invoice.json")).unwrap();

        let result = MethodRegistry::from_directory(&dir);
        assert!(matches!(result, Err(SchemaError::LoadFailed(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_name_parsing() {
        assert_eq!(method_from_file_name("lightning-pay.json"), Some("pay"));
        assert_eq!(method_from_file_name("listpeers.request.json"), Some("listpeers"));
        assert_eq!(method_from_file_name("lightning-cli.1.md"), None);
        assert_eq!(method_from_file_name("lightning-.json"), None);
        assert_eq!(method_from_file_name("pay.response.json"), None);
    }
}
