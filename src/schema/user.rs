use poem_openapi::{payload::Json, types::multipart::Upload, ApiResponse, Multipart, Object};
use serde::{Deserialize, Serialize};

use super::common::{BadRequestResponse, InternalServerErrorResponse, NotFoundResponse};
use crate::{core::utils::datetime_to_string, model::user::User};

#[derive(Object, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub profile_image: String,
    pub created_date: String,
    pub updated_date: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            profile_image: user.profile_image,
            created_date: datetime_to_string(user.created_date),
            updated_date: datetime_to_string(user.updated_date),
        }
    }
}

/// Body of `POST /users` and `PUT /users/:id`. Every part is optional at
/// the parsing level so the handlers can answer with their own 400 body.
#[derive(Multipart, Debug)]
pub struct UserFormRequest {
    #[oai(rename = "firstName")]
    pub first_name: Option<String>,
    #[oai(rename = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[oai(rename = "profileImage")]
    pub profile_image: Option<Upload>,
}

impl UserFormRequest {
    /// Error message for the first missing required text field. Applies to
    /// update as well as create: names stay non-empty on every record.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.first_name.as_deref().map_or(true, |x| x.trim().is_empty()) {
            return Some("firstName is required");
        }
        if self.last_name.as_deref().map_or(true, |x| x.trim().is_empty()) {
            return Some("lastName is required");
        }
        None
    }

    /// Detaches the uploaded file. A `profileImage` part without a file
    /// name (a browser sends the text `null` when nothing was picked)
    /// does not count as a file.
    pub fn take_file(&mut self) -> Option<Upload> {
        self.profile_image
            .take()
            .filter(|x| x.file_name().is_some_and(|name| !name.is_empty()))
    }
}

#[derive(Object, Serialize, Deserialize, Debug)]
pub struct DeleteUserResponse {
    pub message: String,
}

#[derive(ApiResponse)]
pub enum GetAllUserResponses {
    #[oai(status = 200)]
    Ok(Json<Vec<UserResponse>>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum UserDetailResponses {
    #[oai(status = 200)]
    Ok(Json<UserResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum UserCreateResponses {
    #[oai(status = 200)]
    Ok(Json<UserResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum UserUpdateResponses {
    #[oai(status = 200)]
    Ok(Json<UserResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum UserDeleteResponses {
    #[oai(status = 200)]
    Ok(Json<DeleteUserResponse>),

    #[oai(status = 404)]
    NotFound(Json<NotFoundResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}
