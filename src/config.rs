use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use validator::Validate;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const CONFIG_DIR: &str = "config";
const DEFAULT_UPLOAD_DIR: &str = "uploads/warehouses";
const DEFAULT_UPLOAD_PREFIX: &str = "/uploads/warehouses";
/// Tokens are valid for 7 days, matching the session length the dashboard
/// expects.
const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;
const DEV_DEFAULT_JWT_SECRET: &str = "development_only_signing_secret_do_not_deploy";

/// Application configuration, loaded once at startup and treated as immutable
/// afterwards. Components receive it (or slices of it) through `AppState`
/// rather than ambient lookup.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Database connection URL (PostgreSQL in production, SQLite in tests)
    pub database_url: String,

    /// HMAC signing secret for session tokens
    #[validate(length(min = 32))]
    pub jwt_secret: String,

    /// Token lifetime in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment ("development", "production", ...)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level filter
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as structured JSON
    #[serde(default)]
    pub log_json: bool,

    /// Run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// Directory warehouse images are written to
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    /// Public URL prefix under which `upload_dir` is served
    #[serde(default = "default_upload_prefix")]
    pub upload_public_prefix: String,

    /// Comma-separated list of allowed CORS origins; unset means permissive
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,
}

fn default_token_ttl() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_upload_dir() -> String {
    DEFAULT_UPLOAD_DIR.to_string()
}
fn default_upload_prefix() -> String {
    DEFAULT_UPLOAD_PREFIX.to_string()
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

/// Load configuration from `config/default.toml`, an environment-specific
/// overlay, and `APP__`-prefixed environment variables (later sources win).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let run_env = std::env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let mut builder = Config::builder()
        .set_default("environment", run_env.clone())?
        .set_default("database_url", "")?
        .set_default("jwt_secret", "")?;

    let default_file = Path::new(CONFIG_DIR).join("default.toml");
    if default_file.exists() {
        builder = builder.add_source(File::from(default_file));
    }
    let env_file = Path::new(CONFIG_DIR).join(format!("{run_env}.toml"));
    if env_file.exists() {
        builder = builder.add_source(File::from(env_file));
    }

    builder = builder.add_source(Environment::with_prefix("APP").separator("__"));

    let mut cfg: AppConfig = builder.build()?.try_deserialize()?;

    if cfg.jwt_secret.is_empty() {
        if cfg.is_development() {
            info!("APP__JWT_SECRET not set; using the development default secret");
            cfg.jwt_secret = DEV_DEFAULT_JWT_SECRET.to_string();
        } else {
            return Err(ConfigError::Message(
                "jwt_secret must be configured outside development".to_string(),
            ));
        }
    }
    if cfg.database_url.is_empty() {
        return Err(ConfigError::Message(
            "database_url must be configured".to_string(),
        ));
    }

    cfg.validate()
        .map_err(|e| ConfigError::Message(format!("invalid configuration: {e}")))?;

    Ok(cfg)
}

/// Initialize the global tracing subscriber. Call once, before anything logs.
pub fn init_tracing(log_level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    if json {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}
