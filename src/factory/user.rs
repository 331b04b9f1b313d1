use chrono::{Duration, Local};
use fake::{
    faker::{
        internet::en::SafeEmail,
        name::en::{FirstName, LastName},
        phone_number::en::PhoneNumber,
    },
    Dummy, Fake, Faker,
};
use uuid::Uuid;

use crate::{core::blob::BlobStore, model::user::User, repository::user::UserRepository};

/// 1x1 transparent PNG, stored as the profile image of generated users.
pub const PLACEHOLDER_IMAGE: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae,
    0x42, 0x60, 0x82,
];

const PLACEHOLDER_NAME: &str = "placeholder.png";

/// Creates users with fake names and a stored placeholder image. The
/// modifiers run on each generated user before it is persisted.
pub struct UserFactory<T: Clone> {
    modifier_one: fn(x: &User, ext: T) -> User,
    modifier_many: fn(x: &User, idx: usize, ext: T) -> User,
}

impl<T: Clone> Default for UserFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> UserFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &User, ext: T) -> User) {
        self.modifier_one = modifier
    }

    pub fn modified_many(&mut self, modifier: fn(x: &User, idx: usize, ext: T) -> User) {
        self.modifier_many = modifier
    }

    pub async fn generate_one(
        &mut self,
        db: &dyn UserRepository,
        blobs: &BlobStore,
        ext: T,
    ) -> anyhow::Result<User> {
        let profile_image = blobs.save(Some(PLACEHOLDER_NAME), PLACEHOLDER_IMAGE).await?;
        let data = UserDummy::new().into_user(profile_image, 0);
        let data = (self.modifier_one)(&data, ext);
        db.create_user(&data).await?;
        Ok(data)
    }

    pub async fn generate_many(
        &mut self,
        db: &dyn UserRepository,
        blobs: &BlobStore,
        num: u32,
        ext: T,
    ) -> anyhow::Result<Vec<User>> {
        let mut result: Vec<User> = vec![];
        for idx in 0..num as usize {
            let profile_image = blobs.save(Some(PLACEHOLDER_NAME), PLACEHOLDER_IMAGE).await?;
            let data = UserDummy::new().into_user(profile_image, idx);
            let data = (self.modifier_many)(&data, idx, ext.clone());
            db.create_user(&data).await?;
            result.push(data);
        }
        Ok(result)
    }
}

#[derive(Debug, Dummy, Clone)]
struct UserDummy {
    #[dummy(faker = "FirstName()")]
    pub first_name: String,
    #[dummy(faker = "LastName()")]
    pub last_name: String,
    #[dummy(faker = "SafeEmail()")]
    pub email: String,
    #[dummy(faker = "PhoneNumber()")]
    pub phone: String,
}

impl UserDummy {
    pub fn new() -> Self {
        Faker.fake::<Self>()
    }

    /// `idx` staggers creation dates so batches keep a stable order.
    pub fn into_user(self, profile_image: String, idx: usize) -> User {
        let now = Local::now().fixed_offset() + Duration::milliseconds(idx as i64);
        User {
            id: Uuid::now_v7(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            profile_image,
            created_date: now,
            updated_date: now,
        }
    }
}
