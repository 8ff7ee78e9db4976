//! Server configuration
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. Optional TOML file (`medrecords-server.toml` unless overridden)
//! 3. Environment variables prefixed `MEDRECORDS__`, with `__` between
//!    nesting levels, e.g. `MEDRECORDS__IDENTITY__JWT_SECRET` or
//!    `MEDRECORDS__GATEWAY__PUBLIC_PREFIXES=/login,/static/`
//!
//! A `.env` file is loaded into the process environment first. With
//! `environment = "development"` the logging level and format default to
//! [`LoggerConfig::development`], below both the file and the environment.

use auth_gateway::GatewayConfig;
use auth_identity::IdentityConfig;
use config::{Config, ConfigError, Environment, File};
use logger_redacted::LoggerConfig;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "medrecords-server.toml";
pub const ENV_PREFIX: &str = "MEDRECORDS";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `development` or `production`
    pub environment: String,
    pub identity: IdentityConfig,
    pub gateway: GatewayConfig,
    pub logging: LoggerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: "production".to_string(),
            identity: IdentityConfig::default(),
            gateway: GatewayConfig::default(),
            logging: LoggerConfig::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl ServerConfig {
    /// Load `.env`, then layer the config file and the process environment.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "Ignoring unreadable .env file");
            }
        }
        Self::from_sources(path, None)
    }

    /// Build from a config file and an explicit environment map. `None`
    /// reads the process environment.
    pub fn from_sources(
        path: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let base = layered(path, env.clone(), false)?;
        let development = base
            .get_string("environment")
            .is_ok_and(|value| value.eq_ignore_ascii_case("development"));

        if development {
            layered(path, env, true)?.try_deserialize()
        } else {
            base.try_deserialize()
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn layered(
    path: &str,
    env: Option<config::Map<String, String>>,
    development: bool,
) -> Result<Config, ConfigError> {
    let mut builder = Config::builder();
    if development {
        let logging = LoggerConfig::development();
        builder = builder
            .set_default("logging.level", logging.level)?
            .set_default("logging.format", logging.format.as_str())?;
    }

    builder
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("gateway.public_prefixes")
                .try_parsing(true)
                .source(env),
        )
        .build()
}
