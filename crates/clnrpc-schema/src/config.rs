/// Controls registry loading and argument checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, arguments of methods loaded from schema documents are
    /// checked against the request schema before sending.
    pub validate_argument_types: bool,
    /// Maximum number of schemas loaded from a directory.
    pub max_schemas_from_directory: usize,
    /// Maximum bytes allowed per schema file loaded from a directory.
    pub max_schema_file_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            validate_argument_types: true,
            max_schemas_from_directory: 512,
            max_schema_file_size: 256 * 1024,
        }
    }
}
