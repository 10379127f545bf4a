use std::sync::OnceLock;
use std::time::Duration;

use leptos::logging;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

const ENV_PREFIX: &str = "PROJECTFLOW_";

const DEFAULT_ALLOWED_FILE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
];

/// Process-wide configuration, sourced from `PROJECTFLOW_*` environment
/// variables exactly once.
///
/// Read it through [`AppConfig::global()`]. Embedders and tests that need a
/// specific configuration call [`AppConfig::init()`] before the first read;
/// afterwards the value is frozen.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Display name of the application.
    pub app_name: String,
    /// Public URL the application is served from.
    pub app_url: String,
    /// Application version string.
    pub app_version: String,
    /// Root URL all API paths are resolved against.
    pub api_url: String,
    /// Advisory request timeout. Not enforced by the hooks themselves.
    pub api_timeout: Duration,
    /// Feature flag: notification center.
    pub enable_notifications: bool,
    /// Feature flag: file uploads.
    pub enable_file_uploads: bool,
    /// Feature flag: task comments.
    pub enable_comments: bool,
    /// Feature flag: time tracking.
    pub enable_time_tracking: bool,
    /// Feature flag: calendar view.
    pub enable_calendar_view: bool,
    /// Verbose logging of configuration and requests.
    pub debug_mode: bool,
    /// Log level label handed to the logging setup.
    pub log_level: String,
    /// Maximum accepted upload size in bytes.
    pub max_file_size: u64,
    /// MIME types accepted for uploads.
    pub allowed_file_types: Vec<String>,
    /// Path uploads are posted to.
    pub upload_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "ProjectFlow".into(),
            app_url: "http://localhost:3000".into(),
            app_version: "1.0.0".into(),
            api_url: "http://localhost:3001/api".into(),
            api_timeout: Duration::from_millis(30_000),
            enable_notifications: true,
            enable_file_uploads: true,
            enable_comments: true,
            enable_time_tracking: true,
            enable_calendar_view: true,
            debug_mode: false,
            log_level: "info".into(),
            max_file_size: 10_485_760,
            allowed_file_types: DEFAULT_ALLOWED_FILE_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            upload_path: "/uploads".into(),
        }
    }
}

impl AppConfig {
    /// Read the configuration from the environment, falling back to defaults
    /// for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            app_name: env_var("APP_NAME", &defaults.app_name),
            app_url: env_var("APP_URL", &defaults.app_url),
            app_version: env_var("APP_VERSION", &defaults.app_version),
            api_url: env_var("API_URL", &defaults.api_url),
            api_timeout: Duration::from_millis(env_number("API_TIMEOUT", 30_000)),
            enable_notifications: env_bool("ENABLE_NOTIFICATIONS", true),
            enable_file_uploads: env_bool("ENABLE_FILE_UPLOADS", true),
            enable_comments: env_bool("ENABLE_COMMENTS", true),
            enable_time_tracking: env_bool("ENABLE_TIME_TRACKING", true),
            enable_calendar_view: env_bool("ENABLE_CALENDAR_VIEW", true),
            debug_mode: env_bool("DEBUG_MODE", false),
            log_level: env_var("LOG_LEVEL", &defaults.log_level),
            max_file_size: env_number("MAX_FILE_SIZE", defaults.max_file_size),
            allowed_file_types: env_list("ALLOWED_FILE_TYPES", &DEFAULT_ALLOWED_FILE_TYPES),
            upload_path: env_var("UPLOAD_PATH", &defaults.upload_path),
        }
    }

    /// The frozen process-wide configuration, reading the environment on
    /// first use.
    pub fn global() -> &'static AppConfig {
        CONFIG.get_or_init(Self::from_env)
    }

    /// Freeze an explicit configuration before the first [`global()`] read.
    ///
    /// Returns `false` (and leaves the existing value in place) when the
    /// configuration was already initialized.
    pub fn init(config: AppConfig) -> bool {
        let accepted = CONFIG.set(config).is_ok();
        if !accepted {
            logging::debug_warn!("Configuration already initialized; ignoring AppConfig::init.");
        }
        accepted
    }
}

/// Warn about missing required environment variables and, in debug mode, log
/// the effective configuration. Missing variables are never fatal; defaults
/// apply.
pub fn validate_config() {
    let missing: Vec<&str> = ["APP_NAME", "APP_URL"]
        .into_iter()
        .filter(|key| raw_var(key).is_none())
        .collect();

    if !missing.is_empty() {
        logging::warn!(
            "Missing environment variables: {}. Using default values.",
            missing
                .iter()
                .map(|key| format!("{ENV_PREFIX}{key}"))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let config = AppConfig::global();
    if config.debug_mode {
        logging::log!("Configuration loaded: {config:#?}");
    }
}

fn raw_var(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}")).ok()
}

fn env_var(key: &str, default: &str) -> String {
    raw_var(key).unwrap_or_else(|| default.to_string())
}

fn env_bool(key: &str, default: bool) -> bool {
    parse_bool(raw_var(key), default)
}

fn env_number(key: &str, default: u64) -> u64 {
    parse_number(raw_var(key), default)
}

fn env_list(key: &str, default: &[&str]) -> Vec<String> {
    parse_list(raw_var(key), default)
}

fn parse_bool(raw: Option<String>, default: bool) -> bool {
    match raw {
        Some(value) => matches!(value.to_lowercase().as_str(), "true" | "1" | "yes"),
        None => default,
    }
}

fn parse_number(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(default)
}

fn parse_list(raw: Option<String>, default: &[&str]) -> Vec<String> {
    match raw {
        Some(value) => value.split(',').map(|item| item.trim().to_string()).collect(),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_the_usual_spellings() {
        for truthy in ["true", "TRUE", "1", "yes", "Yes"] {
            assert!(parse_bool(Some(truthy.into()), false), "{truthy} should be true");
        }
        for falsy in ["false", "0", "no", "nonsense"] {
            assert!(!parse_bool(Some(falsy.into()), true), "{falsy} should be false");
        }
        assert!(parse_bool(None, true), "unset falls back to the default");
    }

    #[test]
    fn parse_number_falls_back_on_garbage() {
        assert_eq!(parse_number(Some("2048".into()), 7), 2048);
        assert_eq!(parse_number(Some("not a number".into()), 7), 7);
        assert_eq!(parse_number(None, 7), 7);
    }

    #[test]
    fn parse_list_splits_and_trims() {
        assert_eq!(
            parse_list(Some("image/png , image/gif".into()), &[]),
            vec!["image/png".to_string(), "image/gif".to_string()]
        );
        assert_eq!(parse_list(None, &["a", "b"]), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn defaults_match_the_documented_contract() {
        let config = AppConfig::default();
        assert_eq!(config.app_name, "ProjectFlow");
        assert_eq!(config.api_url, "http://localhost:3001/api");
        assert_eq!(config.api_timeout, Duration::from_millis(30_000));
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.allowed_file_types.len(), 5);
        assert!(!config.debug_mode);
    }
}
