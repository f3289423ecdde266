use mart_connect_api::db::{create_orm_conn, run_migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL is not set"))?;
    let (_pool, orm) = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;
    println!("Migrations applied");
    Ok(())
}
