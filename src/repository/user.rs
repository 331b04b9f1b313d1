use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    core::sqlx_utils::{binds_query_as, query_builder, SqlxBinds},
    model::user::{User, TABLE_NAME},
};

/// Persistence for user records. Implementations assign nothing themselves:
/// ids and timestamps arrive already set on the [`User`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users in storage order.
    async fn get_all_user(&self) -> anyhow::Result<Vec<User>>;

    async fn get_user_by_id(&self, id: &Uuid) -> anyhow::Result<Option<User>>;

    async fn create_user(&self, user: &User) -> anyhow::Result<()>;

    /// Overwrites every mutable column. Returns `false` if no row has `user.id`.
    async fn update_user(&self, user: &User) -> anyhow::Result<bool>;

    /// Removes the row and hands it back, `None` if it did not exist.
    async fn delete_user(&self, id: &Uuid) -> anyhow::Result<Option<User>>;
}

pub struct PgUserRepository {
    db: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(db: Pool<Postgres>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_all_user(&self) -> anyhow::Result<Vec<User>> {
        let stmt = query_builder(
            TABLE_NAME,
            &[],
            &["created_date ASC".to_string(), "id ASC".to_string()],
        );
        let data = binds_query_as::<User>(&stmt, vec![])
            .fetch_all(&self.db)
            .await?;
        Ok(data)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> anyhow::Result<Option<User>> {
        let binds: Vec<SqlxBinds> = vec![SqlxBinds::Uuid(*id)];
        let stmt = query_builder(TABLE_NAME, &["id = $1".to_string()], &[]);
        let user = binds_query_as::<User>(&stmt, binds)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            format!(
                r#"
        INSERT INTO {} (id, first_name, last_name, email, phone, profile_image, created_date, updated_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
                TABLE_NAME
            )
            .as_str(),
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.profile_image)
        .bind(user.created_date)
        .bind(user.updated_date)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn update_user(&self, user: &User) -> anyhow::Result<bool> {
        let res = sqlx::query(
            format!(
                r#"UPDATE {}
            SET first_name = $1, last_name = $2, email = $3, phone = $4, profile_image = $5,
            updated_date = $6
            WHERE id = $7"#,
                TABLE_NAME
            )
            .as_str(),
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.profile_image)
        .bind(user.updated_date)
        .bind(user.id)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_user(&self, id: &Uuid) -> anyhow::Result<Option<User>> {
        let user: Option<User> =
            sqlx::query_as(format!(r#"DELETE FROM {} WHERE id = $1 RETURNING *"#, TABLE_NAME).as_str())
                .bind(id)
                .fetch_optional(&self.db)
                .await?;
        Ok(user)
    }
}
