//! Connector configuration.
//!
//! The configuration is loaded once from a TOML file and resolved for every
//! request: `${server.base.url}` in any property is replaced with the base URL of
//! the incoming request, which yields the read-only [`ResolvedConfig`] consumed by
//! the launcher core.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [properties]
//! "weasis.pref.url" = "${server.base.url}/prefs"
//! "manifest.service.url" = "${server.base.url}/manifest"
//! "hosts.allow" = "127.0.0.1, 10.0.0.12"
//! ```

use crate::constants::{DEFAULT_HOST, DEFAULT_PORT, SERVER_BASE_URL_PLACEHOLDER};
use crate::error::{LaunchError, LaunchResult};
use crate::request::LaunchRequest;
use crate::text::has_text;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Regex for `${...}` placeholders in property values.
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("Invalid regex pattern"));

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Deployment configuration of the launcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// Connector properties, resolved per request.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Connector properties resolved for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    settings: BTreeMap<String, String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ConnectorConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> LaunchResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> LaunchResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LaunchError::ConfigParseError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            "Loaded connector configuration from {} ({} properties)",
            path.display(),
            config.properties.len()
        );
        Ok(config)
    }

    /// Load the file at `path` when given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> LaunchResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Set a property, builder-style.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Resolve the properties for one request.
    ///
    /// `${server.base.url}` is replaced with the request base URL when the request
    /// has one. Unknown placeholders are left as written.
    pub fn resolve(&self, request: &LaunchRequest) -> ResolvedConfig {
        let settings = self
            .properties
            .iter()
            .map(|(key, value)| {
                (
                    key.clone(),
                    substitute_placeholders(value, request.base_url.as_deref()),
                )
            })
            .collect();
        ResolvedConfig { settings }
    }
}

impl ResolvedConfig {
    /// Value of `key` when it has text.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.raw(key).filter(|value| has_text(value))
    }

    /// Value of `key` as configured, even when blank.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResolvedConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            settings: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Replace known placeholders in a property value.
fn substitute_placeholders(value: &str, base_url: Option<&str>) -> String {
    PLACEHOLDER_REGEX
        .replace_all(value, |cap: &Captures| match (cap[1].trim(), base_url) {
            (SERVER_BASE_URL_PLACEHOLDER, Some(base)) => base.trim_end_matches('/').to_string(),
            _ => cap[0].to_string(),
        })
        .into_owned()
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestParameters;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[server]
host = "0.0.0.0"
port = 9090

[properties]
"weasis.pref.url" = "${server.base.url}/prefs"
"weasis.base.url" = ""
"hosts.allow" = "127.0.0.1"
"#;

    fn request_from(base: &str) -> LaunchRequest {
        LaunchRequest::new(RequestParameters::new()).with_base_url(base)
    }

    #[test]
    fn test_parse_sample() {
        let config = ConnectorConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.properties.len(), 3);
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = ConnectorConfig::from_toml_str("").unwrap();
        assert_eq!(config.server, ServerSettings::default());
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(config.properties.is_empty());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let result = ConnectorConfig::from_toml_str("[server\nport = ");
        assert!(matches!(result, Err(LaunchError::DeserializationError(_))));
    }

    #[test]
    fn test_resolve_base_url_placeholder() {
        let config = ConnectorConfig::from_toml_str(SAMPLE).unwrap();
        let resolved = config.resolve(&request_from("https://pacs.example.org/"));
        assert_eq!(
            resolved.get("weasis.pref.url"),
            Some("https://pacs.example.org/prefs")
        );
    }

    #[test]
    fn test_placeholder_kept_without_base_url() {
        let config = ConnectorConfig::from_toml_str(SAMPLE).unwrap();
        let resolved = config.resolve(&LaunchRequest::default());
        assert_eq!(
            resolved.get("weasis.pref.url"),
            Some("${server.base.url}/prefs")
        );
    }

    #[test]
    fn test_unknown_placeholder_untouched() {
        let config = ConnectorConfig::default().with_property("x", "${other}/a");
        let resolved = config.resolve(&request_from("http://h"));
        assert_eq!(resolved.get("x"), Some("${other}/a"));
    }

    #[test]
    fn test_blank_values_hidden_from_get_but_not_raw() {
        let config = ConnectorConfig::from_toml_str(SAMPLE).unwrap();
        let resolved = config.resolve(&LaunchRequest::default());
        assert_eq!(resolved.get("weasis.base.url"), None);
        assert_eq!(resolved.raw("weasis.base.url"), Some(""));
        assert_eq!(resolved.raw("missing"), None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = ConnectorConfig::load(file.path()).unwrap();
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = ConnectorConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(LaunchError::ConfigParseError(_))));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = ConnectorConfig::load_or_default(None).unwrap();
        assert_eq!(config, ConnectorConfig::default());
    }
}
