//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::Repository;
use crate::services::AssistantService;
use crate::services::assistant::AssistantError;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    repo: Arc<dyn Repository>,
    /// Present for the `PostgreSQL` backend; used by the readiness probe.
    pool: Option<PgPool>,
    assistant: AssistantService,
}

impl AppState {
    /// Build the state. The assistant is remote when the config carries an
    /// API key and keyword-based otherwise.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError` if the assistant HTTP client cannot be built.
    pub fn new(
        config: StorefrontConfig,
        repo: Arc<dyn Repository>,
        pool: Option<PgPool>,
    ) -> Result<Self, AssistantError> {
        let assistant = AssistantService::from_config(config.assistant.as_ref())?;
        if assistant.is_remote() {
            tracing::info!("Assistant uses the remote model");
        } else {
            tracing::info!("Assistant uses built-in keyword replies");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                repo,
                pool,
                assistant,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The repository behind every service.
    #[must_use]
    pub fn repo(&self) -> &dyn Repository {
        self.inner.repo.as_ref()
    }

    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    #[must_use]
    pub fn assistant(&self) -> &AssistantService {
        &self.inner.assistant
    }
}
