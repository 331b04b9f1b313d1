use sqlx::PgPool;

use crate::core::db::MIGRATOR;

pub struct MigrationStatus {
    pub version: i64,
    pub description: String,
    pub applied: bool,
}

pub async fn db_migrate(pool: &PgPool) -> anyhow::Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

async fn applied_versions(pool: &PgPool) -> anyhow::Result<Vec<i64>> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT to_regclass('public._sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await?;
    if !exists {
        return Ok(vec![]);
    }
    let rows: Vec<(i64,)> =
        sqlx::query_as("SELECT version FROM public._sqlx_migrations WHERE success ORDER BY version")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|(version,)| version).collect())
}

pub async fn db_list(pool: &PgPool) -> anyhow::Result<Vec<MigrationStatus>> {
    let applied = applied_versions(pool).await?;
    Ok(MIGRATOR
        .iter()
        .filter(|x| !x.migration_type.is_down_migration())
        .map(|x| MigrationStatus {
            version: x.version,
            description: x.description.to_string(),
            applied: applied.contains(&x.version),
        })
        .collect())
}

/// Reverts the latest applied migration and returns its version.
pub async fn db_revert(pool: &PgPool) -> anyhow::Result<Option<i64>> {
    let applied = applied_versions(pool).await?;
    let Some((latest, rest)) = applied.split_last() else {
        return Ok(None);
    };
    let target = rest.last().copied().unwrap_or(0);
    MIGRATOR.undo(pool, target).await?;
    Ok(Some(*latest))
}
