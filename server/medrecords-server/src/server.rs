use auth_gateway::GatewayState;
use auth_identity::SessionAuthenticator;
use chrono::{DateTime, Utc};
use error_common::{MedRecordsError, Result};

use crate::config::ServerConfig;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub gateway: GatewayState,
    pub started_at: DateTime<Utc>,
    /// Mask credentials in request URIs recorded by the trace layer
    pub redact_logs: bool,
}

impl AppState {
    /// Build the perimeter from configuration. Fails when no usable
    /// verification key is configured.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let authenticator = SessionAuthenticator::new(&config.identity)
            .map_err(|e| MedRecordsError::ConfigError(e.to_string()))?;

        Ok(Self {
            gateway: GatewayState::new(config.gateway.clone(), authenticator),
            started_at: Utc::now(),
            redact_logs: config.logging.redaction_enabled,
        })
    }
}
