use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use config::{Config as ConfigLib, ConfigBuilder, ConfigError, Environment, builder::DefaultState};
use serde::{Deserialize, Serialize};

use crate::inbound::stream::SignatureScheme;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub stream: StreamConfig,
    pub webhook: WebhookConfig,
    pub reconnect: ReconnectConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Vendor stream endpoint and credentials.
#[derive(Clone, Deserialize)]
pub struct StreamConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub signing_material: String,
    pub signature_scheme: SignatureScheme,
    pub credential_ttl_secs: u64,
    pub keepalive_interval_secs: u64,
}

impl StreamConfig {
    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_secs(self.keepalive_interval_secs)
    }
}

// The secret key must never reach the logs.
impl fmt::Debug for StreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("signing_material", &self.signing_material)
            .field("signature_scheme", &self.signature_scheme)
            .field("credential_ttl_secs", &self.credential_ttl_secs)
            .field("keepalive_interval_secs", &self.keepalive_interval_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    pub base_delay_secs: u64,
    pub max_delay_secs: u64,
    /// Reset the attempt counter once a session has forwarded an event.
    pub reset_on_success: bool,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    fn load_with_sources(env_vars: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let mut builder = Self::set_defaults()?;
        // If env_vars is provided, we use it instead of system environment
        // This is to avoid systems variables pollution across tests
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // Should be in the format APP_STREAM__ACCESS_KEY or APP_WEBHOOK__URL
            builder = builder.add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

            // Cloud Run injects the listen port as a bare PORT variable
            if let Ok(port) = std::env::var("PORT") {
                builder = builder.set_override("server.port", port)?;
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Set default values for the configuration.
    /// Credentials default to empty and must be supplied through the environment.
    fn set_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        ConfigLib::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("stream.endpoint", "https://events.rex.dynata.com")?
            .set_default("stream.access_key", "")?
            .set_default("stream.secret_key", "")?
            .set_default("stream.signing_material", "")?
            .set_default("stream.signature_scheme", "chained")?
            .set_default("stream.credential_ttl_secs", 1000)?
            .set_default("stream.keepalive_interval_secs", 1)?
            .set_default("webhook.url", "http://localhost:8081/events")?
            .set_default("webhook.timeout_secs", 10)?
            .set_default("reconnect.base_delay_secs", 5)?
            .set_default("reconnect.max_delay_secs", 300)?
            .set_default("reconnect.reset_on_success", true)
    }

    /// Reject configurations the relay cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stream.access_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "stream.access_key must be set (APP_STREAM__ACCESS_KEY)".to_string(),
            ));
        }
        if self.stream.secret_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "stream.secret_key must be set (APP_STREAM__SECRET_KEY)".to_string(),
            ));
        }
        if self.stream.credential_ttl_secs == 0 {
            return Err(ConfigError::Message(
                "stream.credential_ttl_secs must be greater than zero".to_string(),
            ));
        }
        if self.webhook.url.trim().is_empty() {
            return Err(ConfigError::Message("webhook.url must be set".to_string()));
        }
        if self.reconnect.base_delay_secs > self.reconnect.max_delay_secs {
            return Err(ConfigError::Message(format!(
                "reconnect.base_delay_secs ({}) exceeds reconnect.max_delay_secs ({})",
                self.reconnect.base_delay_secs, self.reconnect.max_delay_secs
            )));
        }
        Ok(())
    }
}
