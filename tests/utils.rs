use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool as Pool;

use storefront::{AuthSqlService, CatalogSqlService};

static MIGRATOR: Migrator = sqlx::migrate!();

pub type AnyHow = Box<dyn std::error::Error>;

#[allow(dead_code)]
pub const TEST_SECRET: &[u8] = b"storefront-test-secret";

// a single connection so the in-memory database is shared by every call
pub async fn restore_db() -> Result<Pool, AnyHow> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

#[allow(dead_code)]
pub async fn catalog_service() -> Result<CatalogSqlService, AnyHow> {
    Ok(CatalogSqlService::new(restore_db().await?))
}

#[allow(dead_code)]
pub async fn auth_service() -> Result<AuthSqlService, AnyHow> {
    Ok(AuthSqlService::new(restore_db().await?, TEST_SECRET))
}
