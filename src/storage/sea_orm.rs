use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectOptions, Database, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{debug, error, info};

use crate::errors::{LinkmintError, Result};
use crate::storage::click::{ClickSink, ClickUpdate};
use crate::storage::{Link, Repository};

use migration::{entities::link, Migrator, MigratorTrait};

#[derive(Clone)]
pub struct SeaOrmRepository {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmRepository {
    /// Connect, run pending migrations, and hand back a ready repository.
    /// Schema setup happens here, at startup, never lazily per request.
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(LinkmintError::database_config("DATABASE_URL is not set"));
        }

        let db = if backend_name == "sqlite" {
            Self::connect_sqlite(database_url).await?
        } else {
            Self::connect_generic(database_url, backend_name).await?
        };

        let repository = SeaOrmRepository {
            db,
            backend_name: backend_name.to_string(),
        };

        repository.run_migrations().await?;

        info!(
            "{} repository initialized",
            repository.backend_name.to_uppercase()
        );
        Ok(repository)
    }

    async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
        use sea_orm::sqlx::SqlitePool;
        use sea_orm::SqlxSqliteConnector;
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                LinkmintError::database_config(format!("Invalid SQLite URL: {}", e))
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePool::connect_with(opt).await.map_err(|e| {
            LinkmintError::database_connection(format!("Cannot connect to SQLite: {}", e))
        })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    async fn connect_generic(database_url: &str, backend_name: &str) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(database_url.to_owned());
        opt.max_connections(50)
            .min_connections(2)
            .connect_timeout(std::time::Duration::from_secs(8))
            .acquire_timeout(std::time::Duration::from_secs(8))
            .sqlx_logging(false);

        Database::connect(opt).await.map_err(|e| {
            LinkmintError::database_connection(format!(
                "Cannot connect to {} database: {}",
                backend_name.to_uppercase(),
                e
            ))
        })
    }

    async fn run_migrations(&self) -> Result<()> {
        Migrator::up(&self.db, None)
            .await
            .map_err(|e| LinkmintError::database_operation(format!("Migration failed: {}", e)))?;

        info!("Database migrations completed");
        Ok(())
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn model_to_link(model: link::Model) -> Link {
        Link {
            id: model.id,
            code: model.code,
            target_url: model.target_url,
            clicks: model.clicks.max(0),
            created_at: model.created_at,
            last_clicked_at: model.last_clicked_at,
        }
    }

    /// Unique-constraint violations are how the code-uniqueness backstop
    /// reports a lost check-then-insert race; everything else is a real
    /// storage failure.
    fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
        matches!(
            err.sql_err(),
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
        )
    }
}

#[async_trait]
impl Repository for SeaOrmRepository {
    async fn find_active(&self, code: &str) -> Result<Option<Link>> {
        let model = link::Entity::find()
            .filter(link::Column::Code.eq(code))
            .filter(link::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| {
                LinkmintError::database_operation(format!("Failed to look up link: {}", e))
            })?;

        Ok(model.map(Self::model_to_link))
    }

    async fn insert(&self, code: &str, target_url: &str) -> Result<Link> {
        use sea_orm::ActiveValue::{NotSet, Set};

        let active_model = link::ActiveModel {
            id: NotSet,
            code: Set(code.to_string()),
            target_url: Set(target_url.to_string()),
            clicks: Set(0),
            created_at: Set(Utc::now()),
            last_clicked_at: Set(None),
            deleted_at: Set(None),
        };

        match active_model.insert(&self.db).await {
            Ok(model) => {
                info!("Link created: {} -> {}", model.code, model.target_url);
                Ok(Self::model_to_link(model))
            }
            Err(e) if Self::is_unique_violation(&e) => Err(LinkmintError::conflict(format!(
                "Code '{}' is already taken",
                code
            ))),
            Err(e) => Err(LinkmintError::database_operation(format!(
                "Failed to insert link: {}",
                e
            ))),
        }
    }

    async fn soft_delete(&self, code: &str) -> Result<()> {
        let result = link::Entity::update_many()
            .col_expr(link::Column::DeletedAt, Expr::value(Some(Utc::now())))
            .filter(link::Column::Code.eq(code))
            .filter(link::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| {
                LinkmintError::database_operation(format!("Failed to delete link: {}", e))
            })?;

        if result.rows_affected == 0 {
            return Err(LinkmintError::not_found(format!("Link not found: {}", code)));
        }

        info!("Link soft-deleted: {}", code);
        Ok(())
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Link>> {
        let mut query = link::Entity::find()
            .filter(link::Column::DeletedAt.is_null())
            .order_by_desc(link::Column::CreatedAt);

        if let Some(term) = search.filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", term.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(link::Column::Code)))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(link::Column::TargetUrl))).like(pattern),
                    ),
            );
        }

        let models = query.all(&self.db).await.map_err(|e| {
            LinkmintError::database_operation(format!("Failed to list links: {}", e))
        })?;

        Ok(models.into_iter().map(Self::model_to_link).collect())
    }

    async fn count_active(&self) -> Result<u64> {
        link::Entity::find()
            .filter(link::Column::DeletedAt.is_null())
            .count(&self.db)
            .await
            .map_err(|e| {
                LinkmintError::database_operation(format!("Failed to count links: {}", e))
            })
    }

    fn as_click_sink(&self) -> Option<Arc<dyn ClickSink>> {
        Some(Arc::new(self.clone()) as Arc<dyn ClickSink>)
    }
}

#[async_trait]
impl ClickSink for SeaOrmRepository {
    async fn flush_clicks(&self, updates: Vec<ClickUpdate>) -> anyhow::Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to begin transaction: {}", e))?;

        for update in updates {
            // Increment relative to the stored value; rows are addressed by
            // internal id so a reused code never double-counts.
            let result = link::Entity::update_many()
                .col_expr(
                    link::Column::Clicks,
                    Expr::col(link::Column::Clicks).add(update.count as i64),
                )
                .col_expr(
                    link::Column::LastClickedAt,
                    Expr::value(Some(update.last_clicked_at)),
                )
                .filter(link::Column::Id.eq(update.link_id))
                .exec(&txn)
                .await;

            if let Err(e) = result {
                error!("Click update failed for link {}: {}", update.link_id, e);
            }
        }

        txn.commit()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to commit click updates: {}", e))?;

        debug!(
            "Click counts flushed to {} database",
            self.backend_name.to_uppercase()
        );
        Ok(())
    }
}
