//! Application state - shared across all handlers.

use std::sync::Arc;

use anyhow::Context;

use folio_core::ports::{
    MarkdownRenderer, PortfolioRepository, PostRepository, RateLimiter, SessionRepository,
    UploadStore, UserRepository,
};
use folio_core::services::{AuthService, ContentService};
use folio_infra::{
    Argon2PasswordService, InMemoryStore, LocalUploadStore, PulldownMarkdown, UuidTokenGenerator,
};

#[cfg(feature = "postgres")]
use folio_infra::DocumentStore;
#[cfg(feature = "rate-limit")]
use folio_infra::InMemoryRateLimiter;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentService>,
    pub auth: Arc<AuthService>,
    pub markdown: Arc<dyn MarkdownRenderer>,
    pub uploads: Arc<dyn UploadStore>,
    /// Largest accepted upload; the multipart reader stops past it.
    pub upload_max_bytes: usize,
    /// Throttles login attempts per client address when present.
    pub login_limiter: Option<Arc<dyn RateLimiter>>,
    pub registration_enabled: bool,
    pub cookie_secure: bool,
    #[cfg(feature = "postgres")]
    pub store: Option<DocumentStore>,
}

/// One handle per collection, all backed by the same store.
struct Repositories {
    posts: Arc<dyn PostRepository>,
    portfolio: Arc<dyn PortfolioRepository>,
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            posts: store.clone(),
            portfolio: store.clone(),
            users: store.clone(),
            sessions: store,
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(store: &DocumentStore) -> Self {
        Self {
            posts: Arc::new(store.posts()),
            portfolio: Arc::new(store.portfolio()),
            users: Arc::new(store.users()),
            sessions: Arc::new(store.sessions()),
        }
    }
}

impl AppState {
    /// Build the application state. A configured store that cannot be reached
    /// is an error; no store configured means in-memory mode.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        #[cfg(feature = "postgres")]
        {
            if let Some(store_config) = &config.store {
                let store = DocumentStore::connect(store_config)
                    .await
                    .context("document store unavailable")?;
                let mut state = Self::build(Repositories::postgres(&store), config)?;
                state.store = Some(store);
                return Ok(state);
            }
        }

        #[cfg(not(feature = "postgres"))]
        if config.store.is_some() {
            anyhow::bail!("DATABASE_URL is set but the server was built without `postgres`");
        }

        tracing::warn!(
            "DATABASE_URL not set. Running with the in-memory store; data is not persisted."
        );
        Self::in_memory(config)
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(config: &AppConfig) -> anyhow::Result<Self> {
        Self::build(Repositories::in_memory(), config)
    }

    fn build(repos: Repositories, config: &AppConfig) -> anyhow::Result<Self> {
        let passwords = Argon2PasswordService::new(&config.passwords)
            .context("invalid Argon2 parameters")?;

        let content = ContentService::new(repos.posts, repos.portfolio);
        let auth = AuthService::new(
            repos.users,
            repos.sessions,
            Arc::new(passwords),
            Arc::new(UuidTokenGenerator),
        )
        .with_session_ttl(config.session_ttl);

        #[cfg(feature = "rate-limit")]
        let login_limiter: Option<Arc<dyn RateLimiter>> = Some(Arc::new(
            InMemoryRateLimiter::new(config.login_rate_limit.clone()),
        ));
        #[cfg(not(feature = "rate-limit"))]
        let login_limiter: Option<Arc<dyn RateLimiter>> = None;

        tracing::info!(
            registration_enabled = config.registration_enabled,
            login_throttled = login_limiter.is_some(),
            upload_dir = %config.uploads.dir.display(),
            "Application state initialized"
        );

        Ok(Self {
            content: Arc::new(content),
            auth: Arc::new(auth),
            markdown: Arc::new(PulldownMarkdown::new()),
            uploads: Arc::new(LocalUploadStore::new(config.uploads.clone())),
            upload_max_bytes: config.uploads.max_bytes,
            login_limiter,
            registration_enabled: config.registration_enabled,
            cookie_secure: config.cookie_secure,
            #[cfg(feature = "postgres")]
            store: None,
        })
    }

    /// Name of the backing store, for health reporting.
    pub fn store_kind(&self) -> &'static str {
        #[cfg(feature = "postgres")]
        if self.store.is_some() {
            return "postgres";
        }
        "memory"
    }
}
