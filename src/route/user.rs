use std::sync::Arc;

use chrono::Local;
use poem::web::Data;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    model::user::User,
    schema::{
        common::{BadRequestResponse, InternalServerErrorResponse, NotFoundResponse},
        user::{
            DeleteUserResponse, GetAllUserResponses, UserCreateResponses, UserDeleteResponses,
            UserDetailResponses, UserFormRequest, UserUpdateResponses,
        },
    },
    AppState,
};

#[derive(Tags)]
enum ApiUserTags {
    User,
}

pub struct ApiUser;

#[OpenApi]
impl ApiUser {
    #[oai(path = "/users", method = "get", tag = "ApiUserTags::User")]
    async fn get_all_user_api(&self, state: Data<&Arc<AppState>>) -> GetAllUserResponses {
        let data = match state.db.get_all_user().await {
            Ok(val) => val,
            Err(err) => {
                return GetAllUserResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.user",
                        "get_all_user_api",
                        "get_all_user",
                        &err.to_string(),
                    ),
                ))
            }
        };
        GetAllUserResponses::Ok(Json(data.into_iter().map(Into::into).collect()))
    }

    #[oai(path = "/users/:id", method = "get", tag = "ApiUserTags::User")]
    async fn user_detail_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
    ) -> UserDetailResponses {
        let user_id = match Uuid::parse_str(&id) {
            Ok(val) => val,
            Err(_) => return UserDetailResponses::NotFound(Json(NotFoundResponse::user(&id))),
        };
        let user = match state.db.get_user_by_id(&user_id).await {
            Ok(val) => val,
            Err(err) => {
                return UserDetailResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.user",
                        "user_detail_api",
                        "get_user_by_id",
                        &err.to_string(),
                    ),
                ))
            }
        };
        match user {
            Some(user) => UserDetailResponses::Ok(Json(user.into())),
            None => UserDetailResponses::NotFound(Json(NotFoundResponse::user(&id))),
        }
    }

    #[oai(path = "/users", method = "post", tag = "ApiUserTags::User")]
    async fn user_create_api(
        &self,
        form: UserFormRequest,
        state: Data<&Arc<AppState>>,
    ) -> UserCreateResponses {
        let mut form = form;
        // Validate before anything touches the blob store
        if let Some(message) = form.missing_field() {
            return UserCreateResponses::BadRequest(Json(BadRequestResponse {
                error: message.to_string(),
            }));
        }
        let upload = match form.take_file() {
            Some(val) => val,
            None => {
                return UserCreateResponses::BadRequest(Json(BadRequestResponse {
                    error: "profileImage file is required".to_string(),
                }))
            }
        };

        // Store profile image
        let original_name = upload.file_name().map(str::to_string);
        let data = match upload.into_vec().await {
            Ok(val) => val,
            Err(err) => {
                return UserCreateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.user",
                        "user_create_api",
                        "read upload",
                        &err.to_string(),
                    ),
                ))
            }
        };
        let profile_image = match state.blobs.save(original_name.as_deref(), &data).await {
            Ok(val) => val,
            Err(err) => {
                return UserCreateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.user",
                        "user_create_api",
                        "save profile image",
                        &err.to_string(),
                    ),
                ))
            }
        };

        // Insert user
        let now = Local::now().fixed_offset();
        let new_user = User {
            id: Uuid::now_v7(),
            first_name: form.first_name.unwrap_or_default(),
            last_name: form.last_name.unwrap_or_default(),
            email: form.email.unwrap_or_default(),
            phone: form.phone.unwrap_or_default(),
            profile_image,
            created_date: now,
            updated_date: now,
        };
        if let Err(err) = state.db.create_user(&new_user).await {
            if let Err(remove_err) = state.blobs.remove(&new_user.profile_image).await {
                warn!(
                    profile_image = %new_user.profile_image,
                    "failed to remove blob of unsaved user: {}", remove_err
                );
            }
            return UserCreateResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.user",
                    "user_create_api",
                    "create_user",
                    &err.to_string(),
                ),
            ));
        }
        info!(id = %new_user.id, profile_image = %new_user.profile_image, "user created");
        UserCreateResponses::Ok(Json(new_user.into()))
    }

    #[oai(path = "/users/:id", method = "put", tag = "ApiUserTags::User")]
    async fn user_update_api(
        &self,
        Path(id): Path<String>,
        form: UserFormRequest,
        state: Data<&Arc<AppState>>,
    ) -> UserUpdateResponses {
        let mut form = form;
        // get user on db
        let user_id = match Uuid::parse_str(&id) {
            Ok(val) => val,
            Err(_) => return UserUpdateResponses::NotFound(Json(NotFoundResponse::user(&id))),
        };
        let user = match state.db.get_user_by_id(&user_id).await {
            Ok(val) => val,
            Err(err) => {
                return UserUpdateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.user",
                        "user_update_api",
                        "get_user_by_id",
                        &err.to_string(),
                    ),
                ))
            }
        };
        let mut user = match user {
            Some(val) => val,
            None => return UserUpdateResponses::NotFound(Json(NotFoundResponse::user(&id))),
        };
        if let Some(message) = form.missing_field() {
            return UserUpdateResponses::BadRequest(Json(BadRequestResponse {
                error: message.to_string(),
            }));
        }

        // Replace profile image only when a new file was sent, the old one stays on disk
        if let Some(upload) = form.take_file() {
            let original_name = upload.file_name().map(str::to_string);
            let data = match upload.into_vec().await {
                Ok(val) => val,
                Err(err) => {
                    return UserUpdateResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.user",
                            "user_update_api",
                            "read upload",
                            &err.to_string(),
                        ),
                    ))
                }
            };
            user.profile_image = match state.blobs.save(original_name.as_deref(), &data).await {
                Ok(val) => val,
                Err(err) => {
                    return UserUpdateResponses::InternalServerError(Json(
                        InternalServerErrorResponse::new(
                            "route.user",
                            "user_update_api",
                            "save profile image",
                            &err.to_string(),
                        ),
                    ))
                }
            };
        }

        // Full overwrite of the text fields
        user.first_name = form.first_name.unwrap_or_default();
        user.last_name = form.last_name.unwrap_or_default();
        user.email = form.email.unwrap_or_default();
        user.phone = form.phone.unwrap_or_default();
        user.updated_date = Local::now().fixed_offset();
        match state.db.update_user(&user).await {
            Ok(true) => {}
            Ok(false) => return UserUpdateResponses::NotFound(Json(NotFoundResponse::user(&id))),
            Err(err) => {
                return UserUpdateResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.user",
                        "user_update_api",
                        "update_user",
                        &err.to_string(),
                    ),
                ))
            }
        }
        info!(id = %user.id, profile_image = %user.profile_image, "user updated");
        UserUpdateResponses::Ok(Json(user.into()))
    }

    #[oai(path = "/users/:id", method = "delete", tag = "ApiUserTags::User")]
    async fn user_delete_api(
        &self,
        Path(id): Path<String>,
        state: Data<&Arc<AppState>>,
    ) -> UserDeleteResponses {
        let user_id = match Uuid::parse_str(&id) {
            Ok(val) => val,
            Err(_) => return UserDeleteResponses::NotFound(Json(NotFoundResponse::user(&id))),
        };
        let deleted = match state.db.delete_user(&user_id).await {
            Ok(val) => val,
            Err(err) => {
                return UserDeleteResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.user",
                        "user_delete_api",
                        "delete_user",
                        &err.to_string(),
                    ),
                ))
            }
        };
        if deleted.is_none() {
            return UserDeleteResponses::NotFound(Json(NotFoundResponse::user(&id)));
        }
        info!(id = %user_id, "user deleted");
        UserDeleteResponses::Ok(Json(DeleteUserResponse {
            message: "User deleted successfully".to_string(),
        }))
    }
}
