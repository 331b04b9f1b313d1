use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::user::UserRepository;
use crate::model::user::User;

/// Process-local record store. Used when no database is configured and by
/// the test harness. Keeps users in insertion order.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn get_all_user(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn get_user_by_id(&self, id: &Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|x| x.id == *id).cloned())
    }

    async fn create_user(&self, user: &User) -> anyhow::Result<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|x| x.id == user.id) {
            anyhow::bail!("duplicate user id {}", user.id);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> anyhow::Result<bool> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|x| x.id == user.id) {
            Some(stored) => {
                stored.first_name = user.first_name.clone();
                stored.last_name = user.last_name.clone();
                stored.email = user.email.clone();
                stored.phone = user.phone.clone();
                stored.profile_image = user.profile_image.clone();
                stored.updated_date = user.updated_date;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: &Uuid) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        let idx = users.iter().position(|x| x.id == *id);
        Ok(idx.map(|idx| users.remove(idx)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;
    use uuid::Uuid;

    use super::MemoryUserRepository;
    use crate::{model::user::User, repository::user::UserRepository};

    fn new_user(first_name: &str) -> User {
        let now = Local::now().fixed_offset();
        User {
            id: Uuid::now_v7(),
            first_name: first_name.to_string(),
            last_name: "Lee".to_string(),
            email: "a@x.com".to_string(),
            phone: "555".to_string(),
            profile_image: "0000-p.png".to_string(),
            created_date: now,
            updated_date: now,
        }
    }

    #[tokio::test]
    async fn test_keeps_insertion_order() -> anyhow::Result<()> {
        let repo = MemoryUserRepository::new();
        for name in ["c", "a", "b"] {
            repo.create_user(&new_user(name)).await?;
        }

        let names: Vec<String> = repo
            .get_all_user()
            .await?
            .into_iter()
            .map(|x| x.first_name)
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_duplicate_id() -> anyhow::Result<()> {
        let repo = MemoryUserRepository::new();
        let user = new_user("Ann");
        repo.create_user(&user).await?;

        assert!(repo.create_user(&user).await.is_err());
        assert_eq!(repo.get_all_user().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_keeps_identity_and_created_date() -> anyhow::Result<()> {
        let repo = MemoryUserRepository::new();
        let user = new_user("Ann");
        repo.create_user(&user).await?;

        let mut changed = user.clone();
        changed.first_name = "Anna".to_string();
        changed.created_date = Local::now().fixed_offset();
        assert!(repo.update_user(&changed).await?);

        let stored = repo.get_user_by_id(&user.id).await?.unwrap();
        assert_eq!(stored.first_name, "Anna");
        assert_eq!(stored.created_date, user.created_date);
        assert!(!repo.update_user(&new_user("Ghost")).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user() -> anyhow::Result<()> {
        let repo = MemoryUserRepository::new();
        let user = new_user("Ann");
        let other = new_user("Bob");
        repo.create_user(&user).await?;
        repo.create_user(&other).await?;

        let deleted = repo.delete_user(&user.id).await?;

        assert_eq!(deleted, Some(user.clone()));
        assert!(repo.delete_user(&user.id).await?.is_none());
        assert_eq!(repo.get_all_user().await?, vec![other]);
        Ok(())
    }
}
