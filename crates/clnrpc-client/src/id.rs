use std::collections::HashMap;

/// Id prefix used when the caller does not configure one.
pub const DEFAULT_ID_PREFIX: &str = "clnrpc";

const FIRST_CALL: u64 = 1;

/// Per-method request id counter.
///
/// Ids read `"<prefix>:<method>#<n>"`, where `n` counts calls to that
/// method on this generator, starting at 1. Counters are created on first
/// use and never reset.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    counters: HashMap<String, u64>,
}

impl IdGenerator {
    /// Create a generator with an explicit prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counters: HashMap::new(),
        }
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Allocate the id for the next call to `method`.
    pub fn next(&mut self, method: &str) -> String {
        let counter = self
            .counters
            .entry(method.to_string())
            .or_insert(FIRST_CALL);
        let n = *counter;
        *counter += 1;
        self.format(method, n)
    }

    /// The id the next call to `method` would get, without allocating it.
    pub fn peek(&self, method: &str) -> String {
        let n = self.counters.get(method).copied().unwrap_or(FIRST_CALL);
        self.format(method, n)
    }

    fn format(&self, method: &str, n: u64) -> String {
        format!("{}:{}#{}", self.prefix, method, n)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_PREFIX)
    }
}
