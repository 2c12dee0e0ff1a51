// Application state
//
// Holds the runtime context shared by every facade operation: configuration,
// the upstream quote provider client, and the optional Postgres pool. A
// missing or unreachable database degrades the service to mock/no-persistence
// behavior instead of failing startup.

use log::{info, warn};
use sqlx::{Pool, Postgres};

use crate::config::AppConfig;
use crate::database::connection::connect_with_retry;
use crate::quotes::provider::QuoteProvider;
use crate::utils::logging::mask_connection_string;

pub struct AppState {
    config: AppConfig,
    provider: QuoteProvider,
    pool: Option<Pool<Postgres>>,
}

impl AppState {
    /// Build state and attempt the database connection. Connection failure is
    /// logged and tolerated; provider misconfiguration is not.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let provider = QuoteProvider::new(config.provider.clone())?;

        let pool = match config.database_url.as_deref() {
            Some(url) => match connect_with_retry(url).await {
                Ok(pool) => {
                    info!(
                        "[PHASE: STARTUP] [STEP: database] connected to {}",
                        mask_connection_string(url)
                    );
                    Some(pool)
                }
                Err(e) => {
                    warn!(
                        "[PHASE: STARTUP] [STEP: database] connection failed, running without persistence: {:#}",
                        e
                    );
                    None
                }
            },
            None => {
                info!("[PHASE: STARTUP] [STEP: database] no database configured; running without persistence");
                None
            }
        };

        Ok(Self {
            config,
            provider,
            pool,
        })
    }

    /// Build state with no database pool regardless of configuration.
    pub fn without_persistence(config: AppConfig) -> anyhow::Result<Self> {
        let provider = QuoteProvider::new(config.provider.clone())?;
        Ok(Self {
            config,
            provider,
            pool: None,
        })
    }

    pub fn has_persistence(&self) -> bool {
        self.pool.is_some()
    }

    pub fn pool(&self) -> Option<&Pool<Postgres>> {
        self.pool.as_ref()
    }

    pub fn provider(&self) -> &QuoteProvider {
        &self.provider
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
