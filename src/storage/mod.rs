use std::sync::Arc;

use tracing::error;

use crate::errors::{LinkmintError, Result};

pub mod click;
pub mod models;
mod sea_orm;

pub use models::Link;
pub use self::sea_orm::SeaOrmRepository;

/// Data access boundary for links. One implementation per storage backend;
/// mocks implement this in tests.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    /// Fetch the non-deleted link with this exact code. Absent and
    /// soft-deleted rows are indistinguishable here.
    async fn find_active(&self, code: &str) -> Result<Option<Link>>;

    /// Insert a fresh link row. A uniqueness-constraint hit maps to
    /// `LinkmintError::Conflict`, never to a generic storage error; the
    /// constraint is the final backstop against check-then-insert races.
    async fn insert(&self, code: &str, target_url: &str) -> Result<Link>;

    /// Mark the non-deleted link with this code as deleted.
    async fn soft_delete(&self, code: &str) -> Result<()>;

    /// All non-deleted links, newest first, optionally filtered by a
    /// case-insensitive substring match on code or target URL.
    async fn list(&self, search: Option<&str>) -> Result<Vec<Link>>;

    /// Count of non-deleted links (health probe).
    async fn count_active(&self) -> Result<u64>;

    /// The click-ledger write channel, if this backend supports one.
    fn as_click_sink(&self) -> Option<Arc<dyn click::ClickSink>> {
        None
    }
}

pub struct RepositoryFactory;

impl RepositoryFactory {
    pub async fn create() -> Result<Arc<SeaOrmRepository>> {
        let config = crate::config::get_config();
        let backend = &config.storage.backend;
        let database_url = &config.storage.database_url;

        match backend.as_str() {
            "sqlite" | "postgres" => {
                let repository = SeaOrmRepository::new(database_url, backend).await?;
                Ok(Arc::new(repository))
            }
            _ => {
                error!("Unknown storage backend: {}", backend);
                Err(LinkmintError::database_config(format!(
                    "Unknown storage backend: {}. Supported: sqlite, postgres",
                    backend
                )))
            }
        }
    }
}
