use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use super::{
    form::{NewUser, UserChanges},
    ClientError,
};
use crate::{
    core::blob::UPLOADS_PATH,
    schema::user::{DeleteUserResponse, UserResponse},
};

/// Requests the directory issues against the user service.
#[async_trait]
pub trait UserApi: Send + Sync {
    async fn list(&self) -> Result<Vec<UserResponse>, ClientError>;

    async fn get(&self, id: &str) -> Result<UserResponse, ClientError>;

    async fn create(&self, new_user: NewUser) -> Result<UserResponse, ClientError>;

    async fn update(&self, id: &str, changes: UserChanges) -> Result<UserResponse, ClientError>;

    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

/// reqwest implementation of [`UserApi`].
#[derive(Clone, Debug)]
pub struct HttpUserApi {
    client: reqwest::Client,
    base_url: String,
    api_prefix: String,
}

impl HttpUserApi {
    /// `base_url` is the server origin, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_prefix(base_url, "/api")
    }

    pub fn with_prefix(
        base_url: impl Into<String>,
        api_prefix: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(base_url));
        }
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url,
            api_prefix: api_prefix.into().trim_end_matches('/').to_string(),
        })
    }

    /// Where the browser loads the user's profile image from.
    pub fn image_url(&self, user: &UserResponse) -> String {
        format!("{}{}/{}", self.base_url, UPLOADS_PATH, user.profile_image)
    }

    fn users_url(&self) -> String {
        format!("{}{}/users", self.base_url, self.api_prefix)
    }

    fn user_url(&self, id: &str) -> String {
        format!("{}/{}", self.users_url(), id)
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        Err(Self::parse_error(response).await)
    }

    /// Maps a failed response to a [`ClientError`] using the `error` field
    /// of the body when there is one.
    async fn parse_error(response: Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|x| x.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or(body);
        match status {
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST => ClientError::BadRequest(message),
            _ => ClientError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    async fn list(&self) -> Result<Vec<UserResponse>, ClientError> {
        let response = self.client.get(self.users_url()).send().await?;
        Self::handle_response(response).await
    }

    async fn get(&self, id: &str) -> Result<UserResponse, ClientError> {
        let response = self.client.get(self.user_url(id)).send().await?;
        Self::handle_response(response).await
    }

    async fn create(&self, new_user: NewUser) -> Result<UserResponse, ClientError> {
        let form = new_user.into_multipart()?;
        let response = self
            .client
            .post(self.users_url())
            .multipart(form)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn update(&self, id: &str, changes: UserChanges) -> Result<UserResponse, ClientError> {
        let form = changes.into_multipart()?;
        let response = self
            .client
            .put(self.user_url(id))
            .multipart(form)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let response = self.client.delete(self.user_url(id)).send().await?;
        let _: DeleteUserResponse = Self::handle_response(response).await?;
        Ok(())
    }
}
