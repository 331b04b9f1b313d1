use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Object, Serialize, Deserialize, Debug)]
pub struct BadRequestResponse {
    pub error: String,
}

#[derive(Object, Serialize, Deserialize, Debug)]
pub struct NotFoundResponse {
    pub error: String,
}

impl NotFoundResponse {
    pub fn user(id: &str) -> Self {
        Self {
            error: format!("user with id = {} not found", id),
        }
    }
}

#[derive(Object, Serialize, Deserialize, Debug)]
pub struct InternalServerErrorResponse {
    pub error: String,
}

impl InternalServerErrorResponse {
    /// Logs where the failure happened and returns the generic body. The
    /// cause never reaches the client.
    pub fn new(module: &str, function: &str, step: &str, err: &str) -> Self {
        error!(module, function, step, "{}", err);
        Self {
            error: "Internal Server Error".to_string(),
        }
    }
}
