use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};

pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_theme_cache_ttl")]
    pub theme_cache_ttl_secs: u64,

    #[serde(default = "default_autosave_debounce")]
    pub autosave_debounce_ms: u64,

    #[serde(default = "default_submission_limit")]
    pub submission_limit: u64,

    #[serde(default = "default_submission_window")]
    pub submission_window_secs: u64,

    #[serde(default)]
    pub trust_x_forwarded_for: bool,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Invitation-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_max_connections() -> u32 {
    10
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_theme_cache_ttl() -> u64 {
    300
}
fn default_autosave_debounce() -> u64 {
    500
}
fn default_submission_limit() -> u64 {
    5
}
fn default_submission_window() -> u64 {
    60
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;
        config.database_url = fill_or_env(config.database_url, "APP_DATABASE_URL")?;

        config.validate()?;
        Ok(config)
    }

    /// In-process configuration over the memory backend, bound to an ephemeral port.
    pub fn for_tests() -> Self {
        AppConfig {
            env: AppEnvironment::Testing,
            name: default_name(),
            port: 0,
            host: default_host(),
            worker_count: 1,
            database_url: MEMORY_DATABASE_URL.to_string(),
            database_max_connections: 1,
            cors_allowed_origins: default_cors_origins(),
            theme_cache_ttl_secs: default_theme_cache_ttl(),
            autosave_debounce_ms: default_autosave_debounce(),
            submission_limit: default_submission_limit(),
            submission_window_secs: default_submission_window(),
            trust_x_forwarded_for: false,
            log_format: LogFormat::Pretty,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.database_max_connections == 0 {
            errors.push("DATABASE_MAX_CONNECTIONS must be at least 1");
        }
        if self.submission_window_secs == 0 {
            errors.push("SUBMISSION_WINDOW_SECS must be at least 1");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn uses_memory_storage(&self) -> bool {
        self.database_url.starts_with(MEMORY_DATABASE_URL)
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn theme_cache_ttl(&self) -> chrono::Duration {
        i64::try_from(self.theme_cache_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    pub fn submission_window(&self) -> Duration {
        Duration::from_secs(self.submission_window_secs)
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

// Connection strings carry credentials; only the scheme is shown.
impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else if self.starts_with(MEMORY_DATABASE_URL) {
            MEMORY_DATABASE_URL
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("database_max_connections", &self.database_max_connections)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("theme_cache_ttl_secs", &self.theme_cache_ttl_secs)
            .field("autosave_debounce_ms", &self.autosave_debounce_ms)
            .field("submission_limit", &self.submission_limit)
            .field("submission_window_secs", &self.submission_window_secs)
            .field("trust_x_forwarded_for", &self.trust_x_forwarded_for)
            .field("log_format", &self.log_format)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_database_credentials() {
        let mut config = AppConfig::for_tests();
        config.database_url = "postgres://admin:hunter2@db/invitations".into();

        let printed = format!("{config:?}");
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("[REDACTED]"));
    }

    #[test]
    fn wildcard_cors_is_refused_in_production() {
        let mut config = AppConfig::for_tests();
        config.env = AppEnvironment::Production;
        assert!(config.validate().is_err());

        config.cors_allowed_origins = vec!["https://undangan.example.com, https://admin.example.com".into()];
        assert!(config.validate().is_ok());
        assert_eq!(config.cors_origins().len(), 2);
    }

    #[test]
    fn memory_url_selects_memory_storage() {
        let mut config = AppConfig::for_tests();
        assert!(config.uses_memory_storage());

        config.database_url = "postgres://localhost/invitations".into();
        assert!(!config.uses_memory_storage());
    }
}
