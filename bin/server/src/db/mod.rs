//! Storage wiring.
//!
//! [`Storage`] bundles one implementation of every store trait. The server
//! picks Postgres when `DATABASE_URL` is set and in-memory stores otherwise.

pub mod content;

pub use content::{ProgressRepository, ZunzunRepository};

use std::sync::Arc;

use clubee_content::{
    ProgressStore, ZunzunStore,
    memory::{InMemoryProgressStore, InMemoryZunzunStore},
};
use clubee_platform_access::{
    LoginLogStore, SessionStore, UserStore,
    memory::{InMemoryLoginLogStore, InMemorySessionStore, InMemoryUserStore},
};
use sqlx::PgPool;

use crate::auth::db::{LoginLogRepository, SessionRepository, UserRepository};

/// One implementation of each store.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub login_log: Arc<dyn LoginLogStore>,
    pub zunzuns: Arc<dyn ZunzunStore>,
    pub progress: Arc<dyn ProgressStore>,
}

impl Storage {
    /// Process-local stores. Everything is lost on restart.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserStore::new()),
            sessions: Arc::new(InMemorySessionStore::new()),
            login_log: Arc::new(InMemoryLoginLogStore::new()),
            zunzuns: Arc::new(InMemoryZunzunStore::new()),
            progress: Arc::new(InMemoryProgressStore::new()),
        }
    }

    /// Postgres-backed stores sharing one pool.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            sessions: Arc::new(SessionRepository::new(pool.clone())),
            login_log: Arc::new(LoginLogRepository::new(pool.clone())),
            zunzuns: Arc::new(ZunzunRepository::new(pool.clone())),
            progress: Arc::new(ProgressRepository::new(pool)),
        }
    }
}
