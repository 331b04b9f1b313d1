use std::path::Path;

use reqwest::multipart::{Form, Part};

use super::ClientError;
use crate::schema::user::UserResponse;

/// An image file picked on the client side.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            data,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|x| x.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::new(file_name, data))
    }

    fn into_part(self) -> Result<Part, ClientError> {
        let part = Part::bytes(self.data).file_name(self.file_name);
        match self.content_type {
            Some(content_type) => Ok(part.mime_str(&content_type)?),
            None => Ok(part),
        }
    }
}

/// Text fields shared by create and update submissions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl UserFields {
    fn into_form(self) -> Form {
        Form::new()
            .text("firstName", self.first_name)
            .text("lastName", self.last_name)
            .text("email", self.email)
            .text("phone", self.phone)
    }
}

/// Create submission. The profile image is mandatory.
#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub fields: UserFields,
    pub profile_image: ImageFile,
}

impl NewUser {
    pub(crate) fn into_multipart(self) -> Result<Form, ClientError> {
        let part = self.profile_image.into_part()?;
        Ok(self.fields.into_form().part("profileImage", part))
    }
}

/// Update submission. All text fields are resent; a missing image keeps
/// the one stored on the server.
#[derive(Clone, Debug, PartialEq)]
pub struct UserChanges {
    pub fields: UserFields,
    pub profile_image: Option<ImageFile>,
}

impl UserChanges {
    pub(crate) fn into_multipart(self) -> Result<Form, ClientError> {
        let form = self.fields.into_form();
        match self.profile_image {
            Some(image) => Ok(form.part("profileImage", image.into_part()?)),
            None => Ok(form),
        }
    }
}

/// The in-progress form, used for both creating and editing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserForm {
    pub fields: UserFields,
    pub profile_image: Option<ImageFile>,
}

impl UserForm {
    /// Form pre-filled from an existing user. The file is left empty.
    pub fn from_user(user: &UserResponse) -> Self {
        Self {
            fields: UserFields {
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                email: user.email.clone(),
                phone: user.phone.clone(),
            },
            profile_image: None,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn to_new_user(&self) -> Result<NewUser, ClientError> {
        let profile_image = self
            .profile_image
            .clone()
            .ok_or(ClientError::MissingImage)?;
        Ok(NewUser {
            fields: self.fields.clone(),
            profile_image,
        })
    }

    pub fn to_changes(&self) -> UserChanges {
        UserChanges {
            fields: self.fields.clone(),
            profile_image: self.profile_image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserResponse {
        UserResponse {
            id: "0195b2f0-0000-7000-8000-000000000000".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "a@x.com".to_string(),
            phone: "555".to_string(),
            profile_image: "abc-p.png".to_string(),
            created_date: "2025-03-20T08:15:00.000+00:00".to_string(),
            updated_date: "2025-03-20T08:15:00.000+00:00".to_string(),
        }
    }

    #[test]
    fn test_from_user_clears_file() {
        let form = UserForm::from_user(&user());
        assert_eq!(form.fields.first_name, "Ann");
        assert_eq!(form.fields.phone, "555");
        assert!(form.profile_image.is_none());
    }

    #[test]
    fn test_new_user_requires_image() {
        let mut form = UserForm::from_user(&user());
        assert!(matches!(form.to_new_user(), Err(ClientError::MissingImage)));

        form.profile_image = Some(ImageFile::new("p.png", vec![1, 2, 3]));
        let new_user = form.to_new_user().unwrap();
        assert_eq!(new_user.profile_image.file_name, "p.png");
        assert_eq!(new_user.fields, form.fields);
    }

    #[test]
    fn test_changes_keep_optional_image() {
        let form = UserForm::from_user(&user());
        assert!(form.to_changes().profile_image.is_none());
    }

    #[test]
    fn test_clear() {
        let mut form = UserForm::from_user(&user());
        form.profile_image = Some(ImageFile::new("p.png", vec![1]));
        form.clear();
        assert_eq!(form, UserForm::default());
    }

    #[test]
    fn test_invalid_content_type() {
        let new_user = NewUser {
            fields: UserFields::default(),
            profile_image: ImageFile::new("p.png", vec![1]).with_content_type("not a mime"),
        };
        assert!(matches!(new_user.into_multipart(), Err(ClientError::Http(_))));
    }
}
