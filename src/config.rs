//! Configuration types for the proxycheck client.

use crate::request::RequestConfiguration;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Root configuration for the proxycheck client.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// API key, sent as `key`. Anonymous queries are allowed but heavily rate limited.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Endpoint configuration.
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// HTTP timeouts.
    #[serde(default)]
    pub timeout: TimeoutConfig,

    /// Settings the service does not guarantee to keep supporting.
    #[serde(default)]
    pub unsupported: UnsupportedConfig,

    /// Default options for every query.
    #[serde(default)]
    pub request: RequestConfiguration,
}

/// Endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionConfig {
    /// Base URL of the v3 API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
        }
    }
}

fn default_endpoint() -> String {
    "https://proxycheck.io/v3/".to_string()
}

/// HTTP timeouts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Whole request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub read_timeout_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_timeout_ms(),
            read_timeout_ms: default_timeout_ms(),
        }
    }
}

impl TimeoutConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnsupportedConfig {
    /// API version the response model was written against, sent as `ver`.
    /// Empty to use the version selected in the dashboard.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for UnsupportedConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
        }
    }
}

fn default_api_version() -> String {
    "12-August-2025".to_string()
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        debug!(
            path = %path.display(),
            endpoint = %config.connection.endpoint,
            authenticated = config.api_key().is_some(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate YAML content, expanding `${VAR}` references first.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let expanded = expand_env_vars(content)?;
        let config: Config = serde_yaml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        let endpoint = self.endpoint()?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            anyhow::bail!(
                "endpoint must use http or https, got '{}'",
                endpoint.scheme()
            );
        }

        if self.timeout.connect_timeout_ms == 0 {
            anyhow::bail!("connect_timeout_ms must be greater than 0");
        }
        if self.timeout.read_timeout_ms == 0 {
            anyhow::bail!("read_timeout_ms must be greater than 0");
        }

        if self.request.max_days == 0 {
            anyhow::bail!("max_days must be at least 1");
        }

        Ok(())
    }

    /// Parsed endpoint URL.
    pub fn endpoint(&self) -> anyhow::Result<Url> {
        let url = Url::parse(&self.connection.endpoint).map_err(|e| {
            anyhow::anyhow!("invalid endpoint '{}': {}", self.connection.endpoint, e)
        })?;
        if url.cannot_be_a_base() {
            anyhow::bail!("invalid endpoint '{}': not a base URL", url);
        }
        Ok(url)
    }

    /// API key, if one is configured and not empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    /// API version override, if not empty.
    pub fn api_version(&self) -> Option<&str> {
        Some(self.unsupported.api_version.as_str()).filter(|ver| !ver.is_empty())
    }

    /// Generate example configuration YAML.
    pub fn example() -> String {
        r#"# proxycheck client configuration

api_key: "${PROXYCHECK_API_KEY}"   # Optional; sent as `key`

connection:
  endpoint: "https://proxycheck.io/v3/"

timeout:
  connect_timeout_ms: 10000
  read_timeout_ms: 10000

unsupported:
  api_version: "12-August-2025"    # Sent as `ver`; empty for the dashboard default

# Defaults for every query
request:
  pretty_print: false              # `p`
  max_days: 7                      # `days`
  return_node: false               # `node`
  tag: null                        # `tag`
"#
        .to_string()
    }
}

/// Replace `${VAR}` with the value of the environment variable `VAR`; unset variables expand to nothing.
fn expand_env_vars(content: &str) -> anyhow::Result<String> {
    expand_vars(content, |name| std::env::var(name).ok())
}

fn expand_vars(content: &str, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}")?;
    let expanded = re.replace_all(content, |caps: &regex::Captures<'_>| {
        lookup(&caps[1]).unwrap_or_default()
    });
    Ok(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.connection.endpoint, "https://proxycheck.io/v3/");
        assert_eq!(config.timeout.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.timeout.read_timeout(), Duration::from_secs(10));
        assert_eq!(config.api_version(), Some("12-August-2025"));
        assert_eq!(config.api_key(), None);
        assert_eq!(config.request, RequestConfiguration::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_expand_vars() {
        let lookup = |name: &str| (name == "PROXYCHECK_API_KEY").then(|| "secret123".to_string());
        let result = expand_vars("api_key: \"${PROXYCHECK_API_KEY}\"\ntag: \"${OTHER}\"", lookup).unwrap();
        assert_eq!(result, "api_key: \"secret123\"\ntag: \"\"");
    }

    #[test]
    fn test_expand_env_vars_reads_environment() {
        let path = std::env::var("PATH").unwrap_or_default();
        let result = expand_env_vars("path: \"${PATH}\"").unwrap();
        assert_eq!(result, format!("path: \"{}\"", path));
    }

    #[test]
    fn test_expand_env_vars_missing() {
        let result = expand_env_vars("api_key: \"${PROXYCHECK_NONEXISTENT_VAR}\"").unwrap();
        assert_eq!(result, "api_key: \"\"");
    }

    #[test]
    fn test_empty_api_key_is_anonymous() {
        let config = Config::parse("api_key: \"${PROXYCHECK_NONEXISTENT_VAR}\"").unwrap();
        assert_eq!(config.api_key.as_deref(), Some(""));
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
api_key: "abc-123"
connection:
  endpoint: "http://localhost:8080/v3/"
timeout:
  read_timeout_ms: 2500
unsupported:
  api_version: ""
request:
  max_days: 30
  return_node: true
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.api_key(), Some("abc-123"));
        assert_eq!(config.endpoint().unwrap().port(), Some(8080));
        assert_eq!(config.timeout.connect_timeout_ms, 10_000);
        assert_eq!(config.timeout.read_timeout_ms, 2500);
        assert_eq!(config.api_version(), None);
        assert_eq!(config.request.max_days, 30);
        assert!(config.request.return_node);
        assert!(!config.request.pretty_print);
    }

    #[test]
    fn test_validate_endpoint() {
        let mut config = Config::default();
        config.connection.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());

        config.connection.endpoint = "ftp://proxycheck.io/v3/".to_string();
        assert!(config.validate().is_err());

        config.connection.endpoint = "mailto:someone@example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_timeouts_and_days() {
        let mut config = Config::default();
        config.timeout.connect_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.timeout.read_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.request.max_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_is_valid() {
        let config = Config::parse(&Config::example()).unwrap();
        assert_eq!(config.request, RequestConfiguration::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("proxycheck-config-{}.yaml", std::process::id()));
        std::fs::write(&path, "request:\n  tag: nightly\n").unwrap();

        let config = Config::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.request.tag.as_deref(), Some("nightly"));
    }
}
