use crate::error::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Single-connection pool: storage calls are strictly sequential.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(database_url)
        .await?;
    Ok(pool)
}
