use std::collections::HashMap;
use std::time::Duration;

/// Suffix the document tree uses to tell REST calls apart from static files.
pub const DEFAULT_SUFFIX: &str = ".json";

/// Client-wide settings shared by every node derived from the same root.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Per-request timeout handed to the reqwest transport.
    pub timeout: Duration,
    /// Appended to a node's URL to form the wire endpoint.
    pub suffix: String,
    /// Headers sent with every request.
    pub default_headers: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            suffix: DEFAULT_SUFFIX.to_string(),
            default_headers: HashMap::new(),
        }
    }
}

impl Config {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Add a default header that will be sent with every request
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }
}
