//! Configuration parsing and validation for router-smoke.
//!
//! Every section is optional: an empty document yields a configuration that
//! targets the local router with the built-in fixtures.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::fixtures::{self, Fixtures, TaskFixture};

/// Chat-completions endpoint of a router running on the local machine.
pub const DEFAULT_ROUTER_URL: &str = "http://localhost:8085/v1/chat/completions";

/// Env var consulted when the config file does not set `router.api_key`.
pub const API_KEY_ENV_VAR: &str = "ROUTER_SMOKE_API_KEY";

/// Root configuration structure.
#[derive(Debug, Clone)]
pub struct Config {
    pub router: RouterConfig,
    pub run: RunConfig,
    pub fixtures: Fixtures,
    pub logging: LoggingConfig,
}

/// Router endpoint configuration.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Full URL of the chat-completions endpoint
    pub url: String,
    /// Optional bearer token sent to the router
    pub api_key: Option<ApiKey>,
    /// Per-request timeout; unset means no timeout
    pub timeout_secs: Option<u64>,
}

impl RouterConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

fn default_url() -> String {
    DEFAULT_ROUTER_URL.to_string()
}

/// Run pacing and payload settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Pause after every probe, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// `max_tokens` sent with every request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Number of leading tasks the agentic suite sends
    #[serde(default = "default_agentic_task_limit")]
    pub agentic_task_limit: usize,
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_max_tokens() -> u32 {
    100
}

fn default_agentic_task_limit() -> usize {
    3
}

impl RunConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            max_tokens: default_max_tokens(),
            agentic_task_limit: default_agentic_task_limit(),
        }
    }
}

/// Bearer token for the router. Never printed: `Debug` and `Display` show
/// `[REDACTED]`, and the secret is zeroized on drop.
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        ApiKey(SecretString::from(s))
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        ApiKey::from(s.to_string())
    }
}

/// How the router API key was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum KeySource {
    /// Key was a literal string in config (no ${} references)
    Literal,
    /// Key contained ${VAR} references expanded from environment
    EnvExpanded,
    /// Key was read from `ROUTER_SMOKE_API_KEY`
    Convention,
    /// No key available
    None,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Literal => write!(f, "config-literal"),
            KeySource::EnvExpanded => write!(f, "env-expanded"),
            KeySource::Convention => write!(f, "convention ({})", API_KEY_ENV_VAR),
            KeySource::None => write!(f, "none"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level for the `router_smoke` target
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable '{var}' not set for '{field}': {message}")]
    EnvVar {
        var: String,
        field: String,
        message: String,
    },
}

/// Raw router section deserialized directly from TOML.
/// api_key is `Option<String>` so it may contain `${VAR}` references not yet expanded.
#[derive(Deserialize)]
pub struct RawRouterConfig {
    #[serde(default = "default_url")]
    url: String,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for RawRouterConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

/// Raw fixture overrides. Absent lists fall back to the built-in fixtures.
#[derive(Deserialize, Default)]
pub struct RawFixtures {
    tasks: Option<Vec<TaskFixture>>,
    models: Option<Vec<String>>,
    manual_prompt: Option<String>,
}

/// Raw configuration deserialized directly from TOML.
#[derive(Deserialize, Default)]
pub struct RawConfig {
    #[serde(default)]
    router: RawRouterConfig,
    #[serde(default)]
    run: RunConfig,
    #[serde(default)]
    fixtures: RawFixtures,
    #[serde(default)]
    logging: LoggingConfig,
}

/// Substitute every `${VAR}` in `input` with `lookup(VAR)`.
///
/// A bare `$` is left alone. An unclosed `${`, an empty name or an unset
/// variable fails, naming `field` in the error.
fn expand_env_vars_with<F>(input: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let env_error = |var: &str, message: &str| ConfigError::EnvVar {
        var: var.to_string(),
        field: field.to_string(),
        message: message.to_string(),
    };

    let mut expanded = String::with_capacity(input.len());
    let mut rest = input;

    while let Some((literal, reference)) = rest.split_once("${") {
        expanded.push_str(literal);

        let (name, tail) = reference
            .split_once('}')
            .ok_or_else(|| env_error("<unclosed>", "unclosed '${' reference"))?;
        if name.is_empty() {
            return Err(env_error("", "empty variable name in '${}'"));
        }

        let value = lookup(name).ok_or_else(|| env_error(name, "variable is not set"))?;
        expanded.push_str(&value);
        rest = tail;
    }

    expanded.push_str(rest);
    Ok(expanded)
}

/// Expand all `${VAR}` references in a string using real environment variables.
fn expand_env_vars(input: &str, field: &str) -> Result<String, ConfigError> {
    expand_env_vars_with(input, field, |name| std::env::var(name).ok())
}

impl Config {
    /// Convert raw (deserialized) config to final config with env var expansion.
    ///
    /// - If `api_key` contains `${VAR}`: expand from environment, source = `EnvExpanded`
    /// - If `api_key` is a literal string: wrap directly, source = `Literal`
    /// - If `api_key` is absent: try `ROUTER_SMOKE_API_KEY`,
    ///   source = `Convention` or `KeySource::None`
    pub fn from_raw(raw: RawConfig) -> Result<(Self, KeySource), ConfigError> {
        let (api_key, source) = match raw.router.api_key {
            Some(ref raw_key) if raw_key.contains("${") => {
                let expanded = expand_env_vars(raw_key, "router.api_key")?;
                (Some(ApiKey::from(expanded)), KeySource::EnvExpanded)
            }
            Some(ref raw_key) => (Some(ApiKey::from(raw_key.as_str())), KeySource::Literal),
            None => match std::env::var(API_KEY_ENV_VAR) {
                Ok(value) => (Some(ApiKey::from(value)), KeySource::Convention),
                Err(_) => (None, KeySource::None),
            },
        };

        let fixtures = Fixtures {
            tasks: raw.fixtures.tasks.unwrap_or_else(fixtures::default_tasks),
            models: raw.fixtures.models.unwrap_or_else(fixtures::default_models),
            manual_prompt: raw
                .fixtures
                .manual_prompt
                .unwrap_or_else(fixtures::default_manual_prompt),
        };

        let config = Config {
            router: RouterConfig {
                url: raw.router.url,
                api_key,
                timeout_secs: raw.router.timeout_secs,
            },
            run: raw.run,
            fixtures,
            logging: raw.logging,
        };

        Ok((config, source))
    }

    /// Parse configuration from a TOML string.
    pub fn parse_str(content: &str) -> Result<(Self, KeySource), ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
        let (config, key_source) = Self::from_raw(raw)?;
        config.validate()?;
        Ok((config, key_source))
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<(Self, KeySource), ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;

        Self::parse_str(&content)
    }

    /// Load from `path` when given, otherwise start from defaults.
    pub fn load(path: Option<&Path>) -> Result<(Self, KeySource), ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::parse_str(""),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.router.url.is_empty() {
            return Err(ConfigError::Validation("router.url is empty".to_string()));
        }

        let url = reqwest::Url::parse(&self.router.url).map_err(|e| {
            ConfigError::Validation(format!("router.url '{}' is invalid: {}", self.router.url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "router.url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.run.max_tokens == 0 {
            return Err(ConfigError::Validation(
                "run.max_tokens must be greater than zero".to_string(),
            ));
        }

        if self.router.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "router.timeout_secs must be greater than zero when set".to_string(),
            ));
        }

        if let Some(task) = self.fixtures.tasks.iter().find(|t| t.name.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "fixture task with prompt '{}' has an empty name",
                task.prompt
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let (config, _) = Config::parse_str("").unwrap();
        assert_eq!(config.router.url, DEFAULT_ROUTER_URL);
        assert!(config.router.timeout().is_none());
        assert_eq!(config.run.delay(), Duration::from_secs(1));
        assert_eq!(config.run.max_tokens, 100);
        assert_eq!(config.run.agentic_task_limit, 3);
        assert_eq!(config.fixtures, Fixtures::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [router]
            url = "http://10.0.0.5:9000/v1/chat/completions"
            api_key = "literal-router-key"
            timeout_secs = 30

            [run]
            delay_ms = 250
            max_tokens = 64
            agentic_task_limit = 5

            [fixtures]
            manual_prompt = "Which model are you?"
            models = ["meta/llama-3.1-70b-instruct"]

            [[fixtures.tasks]]
            name = "Translation"
            prompt = "Translate 'good morning' into French."

            [logging]
            level = "debug"
        "#;

        let (config, source) = Config::parse_str(toml).unwrap();
        assert_eq!(source, KeySource::Literal);
        assert_eq!(config.router.url, "http://10.0.0.5:9000/v1/chat/completions");
        assert_eq!(config.router.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.run.delay(), Duration::from_millis(250));
        assert_eq!(config.run.max_tokens, 64);
        assert_eq!(config.run.agentic_task_limit, 5);
        assert_eq!(config.fixtures.tasks.len(), 1);
        assert_eq!(config.fixtures.tasks[0].name, "Translation");
        assert_eq!(config.fixtures.models, vec!["meta/llama-3.1-70b-instruct"]);
        assert_eq!(config.fixtures.manual_prompt, "Which model are you?");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_partial_fixture_override_keeps_other_defaults() {
        let toml = r#"
            [fixtures]
            models = ["meta/llama-3.1-8b-instruct"]
        "#;

        let (config, _) = Config::parse_str(toml).unwrap();
        assert_eq!(config.fixtures.tasks, fixtures::default_tasks());
        assert_eq!(config.fixtures.models, vec!["meta/llama-3.1-8b-instruct"]);
        assert_eq!(config.fixtures.manual_prompt, fixtures::MANUAL_PROMPT);
    }

    #[test]
    fn test_empty_url_rejected() {
        let err = Config::parse_str("[router]\nurl = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_non_http_url_rejected() {
        let err = Config::parse_str("[router]\nurl = \"ftp://localhost/v1\"").unwrap_err();
        assert!(err.to_string().contains("http or https"), "{}", err);
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let err = Config::parse_str("[run]\nmax_tokens = 0").unwrap_err();
        assert!(err.to_string().contains("max_tokens"), "{}", err);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Config::parse_str("[router]\ntimeout_secs = 0").unwrap_err();
        assert!(err.to_string().contains("timeout_secs"), "{}", err);
    }

    #[test]
    fn test_unnamed_task_rejected() {
        let toml = r#"
            [[fixtures.tasks]]
            name = " "
            prompt = "anything"
        "#;
        let err = Config::parse_str(toml).unwrap_err();
        assert!(err.to_string().contains("empty name"), "{}", err);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = Config::parse_str("[router\nurl = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_api_key_debug_redaction() {
        let key = ApiKey::from("super-secret-router-token");
        let debug_output = format!("{:?}", key);
        assert_eq!(debug_output, "[REDACTED]");
        assert!(!debug_output.contains("super-secret"));
    }

    #[test]
    fn test_router_config_debug_redaction() {
        let config = RouterConfig {
            api_key: Some(ApiKey::from("nvapi-secret-1234")),
            ..RouterConfig::default()
        };
        let debug_output = format!("{:?}", config);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("nvapi-secret-1234"));
    }

    fn fake_env(name: &str) -> Option<String> {
        match name {
            "HOST_KEY" => Some("nvapi-abcd".to_string()),
            "REGION" => Some("us-west".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_expand_substitutes_references() {
        let cases = [
            ("${HOST_KEY}", "nvapi-abcd"),
            ("key-${HOST_KEY}@${REGION}", "key-nvapi-abcd@us-west"),
            ("$HOST_KEY stays literal", "$HOST_KEY stays literal"),
            ("no references", "no references"),
        ];
        for (input, expected) in cases {
            let expanded = expand_env_vars_with(input, "router.api_key", fake_env).unwrap();
            assert_eq!(expanded, expected, "input: {}", input);
        }
    }

    #[test]
    fn test_expand_rejects_bad_references() {
        let cases = [
            ("${UNSET_VAR}", "UNSET_VAR"),
            ("${HOST_KEY", "unclosed"),
            ("prefix-${}", "empty variable name"),
        ];
        for (input, needle) in cases {
            let err = expand_env_vars_with(input, "router.api_key", fake_env)
                .unwrap_err()
                .to_string();
            assert!(err.contains(needle), "{} -> {}", input, err);
            assert!(err.contains("router.api_key"), "{} -> {}", input, err);
        }
    }

    #[test]
    fn test_from_raw_env_expanded_key() {
        // Unique env var name to avoid parallel test interference
        let var_name = "TEST_ROUTER_SMOKE_EXPAND_KEY";
        unsafe { std::env::set_var(var_name, "nvapi-expanded-abc123") };

        let toml = format!("[router]\napi_key = \"${{{}}}\"", var_name);
        let (config, source) = Config::parse_str(&toml).unwrap();

        assert_eq!(source, KeySource::EnvExpanded);
        assert_eq!(
            config.router.api_key.as_ref().unwrap().expose_secret(),
            "nvapi-expanded-abc123"
        );

        unsafe { std::env::remove_var(var_name) };
    }

    #[test]
    fn test_from_raw_missing_env_var_fails() {
        let var_name = "TEST_ROUTER_SMOKE_DEFINITELY_MISSING";
        unsafe { std::env::remove_var(var_name) };

        let toml = format!("[router]\napi_key = \"${{{}}}\"", var_name);
        let err = Config::parse_str(&toml).unwrap_err().to_string();
        assert!(err.contains(var_name), "Error should name the variable: {}", err);
    }
}
