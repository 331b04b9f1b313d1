use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

pub const TABLE_NAME: &str = "public.user";

#[derive(Clone, Debug, Deserialize, FromRow, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// File name inside the blob store.
    pub profile_image: String,
    pub created_date: DateTime<FixedOffset>,
    pub updated_date: DateTime<FixedOffset>,
}
