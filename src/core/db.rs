use std::{sync::Arc, time::Duration};

use sqlx::{migrate::Migrator, pool::PoolOptions, Pool, Postgres};
use tracing::{info, warn};

use crate::{
    repository::{memory::MemoryUserRepository, user::PgUserRepository, user::UserRepository},
    settings::Config,
};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn init_pool(database_url: &str) -> anyhow::Result<Pool<Postgres>> {
    let pool = PoolOptions::new()
        .min_connections(1)
        .max_connections(20)
        .idle_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// `DATABASE_URL` from the config, an error when it is unset.
pub fn require_database_url(config: &Config) -> anyhow::Result<&str> {
    config
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))
}

/// Postgres store only. Admin commands run in their own process and would
/// see an empty in-memory store, so they never fall back to one.
pub async fn init_pg_repository(config: &Config) -> anyhow::Result<Arc<dyn UserRepository>> {
    let pool = init_pool(require_database_url(config)?).await?;
    Ok(Arc::new(PgUserRepository::new(pool)))
}

/// Postgres store when `DATABASE_URL` is set, in-memory store otherwise.
pub async fn init_repository(config: &Config) -> anyhow::Result<Arc<dyn UserRepository>> {
    match &config.database_url {
        Some(database_url) => {
            info!("Init Postgres connection");
            let pool = init_pool(database_url).await?;
            if config.migrate_on_start {
                info!("run pending migrations");
                MIGRATOR.run(&pool).await?;
            }
            Ok(Arc::new(PgUserRepository::new(pool)))
        }
        None => {
            warn!("DATABASE_URL is not set, users are kept in memory only");
            Ok(Arc::new(MemoryUserRepository::new()))
        }
    }
}
