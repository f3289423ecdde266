use anyhow::Result;
use sea_orm::{DatabaseConnection, SqlxPostgresConnector};
use sea_orm_migration::MigratorTrait;
use sqlx::postgres::PgPoolOptions;

use crate::migration::Migrator;

pub type DbPool = sqlx::PgPool;
pub type OrmConn = DatabaseConnection;

/// Open the shared Postgres pool.
pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Build a pool that connects on first use.
pub fn create_lazy_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_lazy(database_url)?;
    Ok(pool)
}

/// SeaORM connection sharing the given sqlx pool.
pub fn orm_from_pool(pool: &DbPool) -> OrmConn {
    SqlxPostgresConnector::from_sqlx_postgres_pool(pool.clone())
}

/// Create a SeaORM connection together with the pool backing it.
pub async fn create_orm_conn(database_url: &str) -> Result<(DbPool, OrmConn)> {
    let pool = create_pool(database_url).await?;
    let orm = orm_from_pool(&pool);
    Ok((pool, orm))
}

/// Apply every pending migration in `migrations/`.
pub async fn run_migrations(conn: &OrmConn) -> Result<()> {
    Migrator::up(conn, None).await?;
    Ok(())
}
