// Application configuration
// Layered from an optional `intake.toml` file plus INTAKE_-prefixed
// environment variables (INTAKE_PROVIDER__USER_ID, INTAKE_DATABASE_URL, ...).

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Upstream quoting/proposal provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub base_url: String,
    pub user_id: String,
    pub password: String,
    pub sales_channel_user_id: String,
    /// Sent as the `Origin` header on provider calls.
    pub origin: String,
    /// Per-request timeout for provider HTTP calls.
    pub request_timeout_secs: u64,
    /// How long a provider access token is trusted before re-authenticating.
    pub token_ttl_minutes: i64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api-prod.ensuredit.com".to_string(),
            user_id: String::new(),
            password: String::new(),
            sales_channel_user_id: String::new(),
            origin: String::new(),
            request_timeout_secs: 12,
            token_ttl_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderSettings,
    /// Absent database URL runs the service in degraded no-persistence mode.
    pub database_url: Option<String>,
    pub log_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderSettings::default(),
            database_url: None,
            log_dir: "logs".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name("intake").required(false))
            .add_source(Environment::with_prefix("INTAKE").separator("__"))
            .build()
            .context("failed to assemble configuration sources")?;

        settings
            .try_deserialize()
            .context("failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_without_persistence() {
        let cfg = AppConfig::default();
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.provider.request_timeout_secs, 12);
        assert_eq!(cfg.provider.token_ttl_minutes, 30);
        assert!(cfg.provider.base_url.starts_with("https://"));
    }
}
