//! Service configuration
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, `JMRL_POOL__SECTION__KEY` environment variables, then command line
//! flags.

use clap::Parser;
use config::{ConfigError, Environment, File};
use jmrl_query::{IdentifierPolicy, TranslateOptions};
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

/// Command line flags.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "jmrl-pool", version, about = "Virgo4 search pool for the JMRL Sierra catalog")]
pub struct Cli {
    /// Configuration file (TOML); missing files are ignored
    #[arg(long, env = "JMRL_POOL_CONFIG", default_value = "config.toml")]
    pub config: PathBuf,

    /// Service port
    #[arg(long)]
    pub port: Option<u16>,

    /// Sierra API base URL, e.g. https://catalog.example.org/iii/sierra-api/v5
    #[arg(long)]
    pub api: Option<String>,

    /// Sierra API key
    #[arg(long)]
    pub apikey: Option<String>,

    /// Sierra API secret
    #[arg(long)]
    pub apisecret: Option<String>,

    /// JWT signature key
    #[arg(long)]
    pub jwtkey: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub auth: AuthConfig,
    pub query: QueryConfig,
    pub library: LibraryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Empty allows any origin.
    pub cors_origins: Vec<String>,
    pub max_request_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
            max_request_body_size: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub api_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub keepalive_seconds: u64,
    pub max_idle_per_host: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            timeout_seconds: 5,
            connect_timeout_seconds: 2,
            keepalive_seconds: 600,
            max_idle_per_host: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub enabled: bool,
    pub jwt_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            jwt_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub identifier_policy: IdentifierPolicy,
}

impl QueryConfig {
    pub fn translate_options(&self) -> TranslateOptions {
        TranslateOptions {
            identifier_policy: self.identifier_policy,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Key of the health check report.
    pub name: String,
    pub external_url: String,
    pub logo_url: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            name: "jmrl".to_string(),
            external_url: "https://jmrl.org".to_string(),
            logo_url: "/assets/jmrl_logo.svg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    /// daily, hourly or never
    pub file_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_enabled: false,
            file_directory: "logs".to_string(),
            file_prefix: "jmrl-pool".to_string(),
            file_rotation: "daily".to_string(),
        }
    }
}

impl Config {
    /// Parse the process arguments and load every configuration layer.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load_with(&Cli::parse())
    }

    pub fn load_with(cli: &Cli) -> Result<Self, ConfigError> {
        config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?)
            .add_source(File::from(cli.config.as_path()).required(false))
            .add_source(
                Environment::with_prefix("JMRL_POOL")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .set_override_option("server.port", cli.port.map(i64::from))?
            .set_override_option("upstream.api_url", cli.api.clone())?
            .set_override_option("upstream.api_key", cli.apikey.clone())?
            .set_override_option("upstream.api_secret", cli.apisecret.clone())?
            .set_override_option("auth.jwt_key", cli.jwtkey.clone())?
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.upstream.api_url.trim().is_empty() {
            return Err("upstream.api_url (--api) is required".to_string());
        }
        if self.upstream.api_key.is_empty() {
            return Err("upstream.api_key (--apikey) is required".to_string());
        }
        if self.upstream.api_secret.is_empty() {
            return Err("upstream.api_secret (--apisecret) is required".to_string());
        }
        if self.auth.enabled && self.auth.jwt_key.is_empty() {
            return Err("auth.jwt_key (--jwtkey) is required when auth is enabled".to_string());
        }
        if self.upstream.timeout_seconds == 0 {
            return Err("upstream.timeout_seconds must be greater than 0".to_string());
        }
        if !matches!(self.logging.file_rotation.as_str(), "daily" | "hourly" | "never") {
            return Err(format!(
                "logging.file_rotation must be daily, hourly or never, got '{}'",
                self.logging.file_rotation
            ));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> std::io::Result<SocketAddr> {
        (self.server.host.as_str(), self.server.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("no address for {}:{}", self.server.host, self.server.port),
                )
            })
    }
}
