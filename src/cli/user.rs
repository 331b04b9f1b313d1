use crate::{
    core::blob::BlobStore, factory::user::UserFactory, model::user::User,
    repository::user::UserRepository,
};

/// Inserts `count` users with fake data and a placeholder image.
pub async fn user_seed(
    db: &dyn UserRepository,
    blobs: &BlobStore,
    count: u32,
) -> anyhow::Result<Vec<User>> {
    let mut factory = UserFactory::new();
    factory.generate_many(db, blobs, count, ()).await
}

pub async fn user_list(db: &dyn UserRepository) -> anyhow::Result<Vec<User>> {
    db.get_all_user().await
}
