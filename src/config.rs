// Configuration module
// Immutable settings built once at startup and passed to handlers explicitly.

use serde::Deserialize;
use std::net::SocketAddr;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub assets: AssetsConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    /// Reserved for session support; loaded once, never used at runtime yet.
    pub secret_key: String,
    pub workers: Option<usize>,
}

/// Asset root configuration
///
/// Lookups try `primary_root` (the build output) first, then
/// `secondary_root`, then the entry document in the same order.
#[derive(Debug, Deserialize, Clone)]
pub struct AssetsConfig {
    pub primary_root: String,
    pub secondary_root: String,
    pub entry_document: String,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub enable_cors: bool,
    pub server_name: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
}

impl Config {
    /// Load configuration from the default `config.toml` (optional) plus
    /// environment overrides.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension).
    ///
    /// The file is optional; defaults cover every key. The `PORT`,
    /// `FLASK_DEBUG` and `SECRET_KEY` environment variables override the
    /// corresponding settings — the variable names predate this server and
    /// existing deployments still set them.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8081)?
            .set_default("server.debug", true)?
            .set_default("server.secret_key", "dev-secret-key-change-in-production")?
            .set_default("assets.primary_root", "dist")?
            .set_default("assets.secondary_root", ".")?
            .set_default("assets.entry_document", "index.html")?
            .set_default("http.enable_cors", true)?
            .set_default("http.server_name", "spaserve/0.1")?
            .set_default("logging.access_log", true)?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option(
                "server.debug",
                std::env::var("FLASK_DEBUG").ok().map(|v| is_truthy(&v)),
            )?
            .set_override_option("server.secret_key", std::env::var("SECRET_KEY").ok())?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Access logging is forced on in debug mode.
    #[must_use]
    pub const fn access_log_enabled(&self) -> bool {
        self.logging.access_log || self.server.debug
    }
}

/// Case-insensitive boolean-like string check ("true", "TRUE", " True ").
fn is_truthy(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
