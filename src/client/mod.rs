//! Client side of the user directory.
//!
//! [`UserDirectory`] mirrors the server's user list plus one in-progress
//! form and keeps the mirror in step with every successful mutation, so the
//! list never has to be refetched. Requests go through the [`UserApi`] seam;
//! [`HttpUserApi`] is the reqwest implementation.

mod api;
mod directory;
mod form;

pub use api::{HttpUserApi, UserApi};
pub use directory::{FormMode, UserDirectory};
pub use form::{ImageFile, NewUser, UserChanges, UserFields, UserForm};

use thiserror::Error;

/// Errors surfaced by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or invalid request parts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No user with the requested id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server rejected the submission.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Any other non-success status.
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    /// A create form was submitted without a profile image.
    #[error("Profile image is required to create a user")]
    MissingImage,

    #[error("Invalid base url: {0}")]
    InvalidBaseUrl(String),
}
