//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::services::mailer::{Mailer, MailerError};
use crate::services::news::{NewsClient, NewsError};
use crate::services::plant_health::{PlantHealthClient, PlantHealthError};

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("mailer: {0}")]
    Mailer(#[from] MailerError),
    #[error("plant health client: {0}")]
    PlantHealth(#[from] PlantHealthError),
    #[error("news client: {0}")]
    News(#[from] NewsError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and upstream clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    mailer: Mailer,
    plant_health: PlantHealthClient,
    news: NewsClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if any upstream client fails to construct (for
    /// example an API key that is not a valid header value).
    pub fn new(config: ApiConfig, pool: PgPool) -> Result<Self, StateError> {
        let mailer = Mailer::new(&config.mailer)?;
        let plant_health = PlantHealthClient::new(&config.plant_health)?;
        let news = NewsClient::new(&config.news)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                mailer,
                plant_health,
                news,
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the transactional email client.
    #[must_use]
    pub fn mailer(&self) -> &Mailer {
        &self.inner.mailer
    }

    /// Get a reference to the plant health assessment client.
    #[must_use]
    pub fn plant_health(&self) -> &PlantHealthClient {
        &self.inner.plant_health
    }

    /// Get a reference to the news client.
    #[must_use]
    pub fn news(&self) -> &NewsClient {
        &self.inner.news
    }
}
