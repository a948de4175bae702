use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::OnceCell;

use crate::{entities::asset::AssetKind, errors::AppError, repositories::schema};

/// Postgres handle shared by every sqlx repository.
#[derive(Clone)]
pub struct SqlxRepo {
    pool: PgPool,
    schema: Arc<OnceCell<()>>,
}

impl SqlxRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxRepo {
            pool,
            schema: Arc::new(OnceCell::new()),
        }
    }

    /// The pool, after making sure the tables exist.
    pub async fn pool(&self) -> Result<&PgPool, AppError> {
        self.schema
            .get_or_try_init(|| schema::create_tables(&self.pool))
            .await?;
        Ok(&self.pool)
    }

    pub async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }
}

/// One asset library table.
#[derive(Clone)]
pub struct SqlxAssetRepo {
    pub db: SqlxRepo,
    pub kind: AssetKind,
}

impl SqlxAssetRepo {
    pub fn new(db: SqlxRepo, kind: AssetKind) -> Self {
        SqlxAssetRepo { db, kind }
    }
}

/// OFFSET from a 1-based page.
pub fn page_offset(page: u32, per_page: u32) -> i64 {
    let page = page.saturating_sub(1);
    (page as i64) * (per_page as i64)
}

/// Maps a unique violation to a conflict with a caller-chosen message.
pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::Conflict(message.to_string()),
        _ => AppError::from(err),
    }
}
