use tracing::{debug, error};

use super::{
    api::UserApi,
    form::{NewUser, UserChanges, UserForm},
    ClientError,
};
use crate::schema::user::UserResponse;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    /// Blank form, submitting creates a user.
    Create,
    /// Form filled from the user with this id, submitting updates it.
    Editing(String),
}

/// Local mirror of the user list plus the active form.
///
/// `load`, `create`, `update` and `remove` are the only operations that
/// change the list. A failed request is logged and leaves list and form as
/// they were.
pub struct UserDirectory<A: UserApi> {
    api: A,
    users: Vec<UserResponse>,
    form: UserForm,
    mode: FormMode,
}

impl<A: UserApi> UserDirectory<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            users: vec![],
            form: UserForm::default(),
            mode: FormMode::Create,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn users(&self) -> &[UserResponse] {
        &self.users
    }

    pub fn form(&self) -> &UserForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut UserForm {
        &mut self.form
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Replaces the local list with the server's.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        match self.api.list().await {
            Ok(users) => {
                debug!(count = users.len(), "user list loaded");
                self.users = users;
                Ok(())
            }
            Err(err) => {
                error!("failed to load users: {}", err);
                Err(err)
            }
        }
    }

    /// Fills the form from `user` and makes it the edit target.
    pub fn start_edit(&mut self, user: &UserResponse) {
        self.form = UserForm::from_user(user);
        self.mode = FormMode::Editing(user.id.clone());
    }

    pub fn cancel_edit(&mut self) {
        self.form.clear();
        self.mode = FormMode::Create;
    }

    /// Sends the form as an update when an edit target is set, as a create
    /// otherwise. On success the form goes back to a blank create form.
    pub async fn submit(&mut self) -> Result<UserResponse, ClientError> {
        let user = match self.mode.clone() {
            FormMode::Editing(id) => {
                let changes = self.form.to_changes();
                self.update(&id, changes).await?
            }
            FormMode::Create => {
                let new_user = match self.form.to_new_user() {
                    Ok(val) => val,
                    Err(err) => {
                        error!("failed to create user: {}", err);
                        return Err(err);
                    }
                };
                self.create(new_user).await?
            }
        };
        self.cancel_edit();
        Ok(user)
    }

    /// Creates a user and appends the stored record to the list.
    pub async fn create(&mut self, new_user: NewUser) -> Result<UserResponse, ClientError> {
        match self.api.create(new_user).await {
            Ok(user) => {
                self.users.push(user.clone());
                Ok(user)
            }
            Err(err) => {
                error!("failed to create user: {}", err);
                Err(err)
            }
        }
    }

    /// Updates a user and swaps the stored record into its slot.
    pub async fn update(
        &mut self,
        id: &str,
        changes: UserChanges,
    ) -> Result<UserResponse, ClientError> {
        match self.api.update(id, changes).await {
            Ok(user) => {
                if let Some(slot) = self.users.iter_mut().find(|x| x.id == id) {
                    *slot = user.clone();
                }
                Ok(user)
            }
            Err(err) => {
                error!(id, "failed to update user: {}", err);
                Err(err)
            }
        }
    }

    pub async fn remove(&mut self, id: &str) -> Result<(), ClientError> {
        match self.api.delete(id).await {
            Ok(()) => {
                self.users.retain(|x| x.id != id);
                Ok(())
            }
            Err(err) => {
                error!(id, "failed to delete user: {}", err);
                Err(err)
            }
        }
    }

    /// Users whose "first last" name contains `query`, ignoring case, in
    /// list order. An empty query matches everyone.
    pub fn search(&self, query: &str) -> Vec<&UserResponse> {
        let query = query.to_lowercase();
        self.users
            .iter()
            .filter(|x| {
                format!("{} {}", x.first_name, x.last_name)
                    .to_lowercase()
                    .contains(&query)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::client::form::{ImageFile, UserFields};

    /// In-process stand-in for the service. `fail` makes every call error.
    #[derive(Default)]
    struct FakeApi {
        users: Mutex<Vec<UserResponse>>,
        next_id: Mutex<u32>,
        fail: bool,
    }

    impl FakeApi {
        fn with_users(users: Vec<UserResponse>) -> Self {
            Self {
                users: Mutex::new(users),
                ..Default::default()
            }
        }

        fn failing(users: Vec<UserResponse>) -> Self {
            Self {
                fail: true,
                ..Self::with_users(users)
            }
        }

        fn check(&self) -> Result<(), ClientError> {
            if self.fail {
                return Err(ClientError::Server {
                    status: 500,
                    message: "Internal Server Error".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UserApi for FakeApi {
        async fn list(&self) -> Result<Vec<UserResponse>, ClientError> {
            self.check()?;
            Ok(self.users.lock().unwrap().clone())
        }

        async fn get(&self, id: &str) -> Result<UserResponse, ClientError> {
            self.check()?;
            let users = self.users.lock().unwrap();
            users
                .iter()
                .find(|x| x.id == id)
                .cloned()
                .ok_or(ClientError::NotFound(id.to_string()))
        }

        async fn create(&self, new_user: NewUser) -> Result<UserResponse, ClientError> {
            self.check()?;
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let mut user = user(
                &format!("new-{}", next_id),
                &new_user.fields.first_name,
                &new_user.fields.last_name,
            );
            user.profile_image = format!("{}-{}", next_id, new_user.profile_image.file_name);
            self.users.lock().unwrap().push(user.clone());
            Ok(user)
        }

        async fn update(
            &self,
            id: &str,
            changes: UserChanges,
        ) -> Result<UserResponse, ClientError> {
            self.check()?;
            let mut users = self.users.lock().unwrap();
            let stored = users
                .iter_mut()
                .find(|x| x.id == id)
                .ok_or(ClientError::NotFound(id.to_string()))?;
            stored.first_name = changes.fields.first_name;
            stored.last_name = changes.fields.last_name;
            stored.email = changes.fields.email;
            stored.phone = changes.fields.phone;
            if let Some(image) = changes.profile_image {
                stored.profile_image = format!("updated-{}", image.file_name);
            }
            Ok(stored.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), ClientError> {
            self.check()?;
            let mut users = self.users.lock().unwrap();
            let before = users.len();
            users.retain(|x| x.id != id);
            if users.len() == before {
                return Err(ClientError::NotFound(id.to_string()));
            }
            Ok(())
        }
    }

    fn user(id: &str, first_name: &str, last_name: &str) -> UserResponse {
        UserResponse {
            id: id.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: format!("{}@x.com", first_name.to_lowercase()),
            phone: "555".to_string(),
            profile_image: format!("{}.png", id),
            created_date: String::new(),
            updated_date: String::new(),
        }
    }

    fn fields(first_name: &str, last_name: &str) -> UserFields {
        UserFields {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: "a@x.com".to_string(),
            phone: "555".to_string(),
        }
    }

    fn sample_users() -> Vec<UserResponse> {
        vec![
            user("1", "Ann", "Lee"),
            user("2", "Bob", "Annett"),
            user("3", "Carl", "Smith"),
        ]
    }

    #[tokio::test]
    async fn test_load() {
        let mut directory = UserDirectory::new(FakeApi::with_users(sample_users()));
        directory.load().await.unwrap();
        assert_eq!(directory.users(), sample_users().as_slice());
    }

    #[tokio::test]
    async fn test_load_failure_keeps_list() {
        let mut directory = UserDirectory::new(FakeApi::failing(sample_users()));
        assert!(directory.load().await.is_err());
        assert!(directory.users().is_empty());
    }

    #[tokio::test]
    async fn test_search() {
        let mut directory = UserDirectory::new(FakeApi::with_users(sample_users()));
        directory.load().await.unwrap();

        let ids = |found: Vec<&UserResponse>| -> Vec<String> {
            found.into_iter().map(|x| x.id.clone()).collect()
        };
        assert_eq!(ids(directory.search("ann")), vec!["1", "2"]);
        assert_eq!(ids(directory.search("ANN LEE")), vec!["1"]);
        assert_eq!(ids(directory.search("n l")), vec!["1"]);
        assert_eq!(ids(directory.search("smith")), vec!["3"]);
        assert!(directory.search("zed").is_empty());
        assert_eq!(ids(directory.search("")), vec!["1", "2", "3"]);
        // search does not touch the list
        assert_eq!(directory.users().len(), 3);
    }

    #[tokio::test]
    async fn test_submit_create() {
        let mut directory = UserDirectory::new(FakeApi::with_users(sample_users()));
        directory.load().await.unwrap();
        directory.form_mut().fields = fields("Dana", "Ray");
        directory.form_mut().profile_image = Some(ImageFile::new("d.png", vec![1, 2]));

        let created = directory.submit().await.unwrap();

        assert_eq!(created.first_name, "Dana");
        assert_eq!(directory.users().len(), 4);
        assert_eq!(directory.users().last(), Some(&created));
        assert_eq!(directory.form(), &UserForm::default());
        assert_eq!(directory.mode(), &FormMode::Create);
    }

    #[tokio::test]
    async fn test_submit_create_without_image() {
        let mut directory = UserDirectory::new(FakeApi::with_users(vec![]));
        directory.form_mut().fields = fields("Dana", "Ray");

        let res = directory.submit().await;

        assert!(matches!(res, Err(ClientError::MissingImage)));
        assert!(directory.users().is_empty());
        assert!(directory.api().users.lock().unwrap().is_empty());
        // form is kept for another try
        assert_eq!(directory.form().fields.first_name, "Dana");
    }

    #[tokio::test]
    async fn test_submit_update() {
        let mut directory = UserDirectory::new(FakeApi::with_users(sample_users()));
        directory.load().await.unwrap();
        let target = directory.users()[1].clone();

        directory.start_edit(&target);
        assert_eq!(directory.mode(), &FormMode::Editing("2".to_string()));
        assert_eq!(directory.form().fields.first_name, "Bob");
        assert!(directory.form().profile_image.is_none());
        directory.form_mut().fields.first_name = "Robert".to_string();
        let updated = directory.submit().await.unwrap();

        assert_eq!(updated.first_name, "Robert");
        assert_eq!(updated.profile_image, target.profile_image);
        assert_eq!(directory.users()[1], updated);
        assert_eq!(directory.users().len(), 3);
        assert_eq!(directory.mode(), &FormMode::Create);
        assert_eq!(directory.form(), &UserForm::default());
    }

    #[tokio::test]
    async fn test_submit_update_failure_keeps_state() {
        let mut directory = UserDirectory::new(FakeApi::failing(vec![]));
        let target = user("1", "Ann", "Lee");
        directory.users = vec![target.clone()];

        directory.start_edit(&target);
        directory.form_mut().fields.first_name = "Anna".to_string();
        assert!(directory.submit().await.is_err());

        assert_eq!(directory.users(), &[target]);
        assert_eq!(directory.mode(), &FormMode::Editing("1".to_string()));
        assert_eq!(directory.form().fields.first_name, "Anna");
    }

    #[tokio::test]
    async fn test_cancel_edit() {
        let mut directory = UserDirectory::new(FakeApi::with_users(vec![]));
        directory.start_edit(&user("1", "Ann", "Lee"));
        directory.cancel_edit();
        assert_eq!(directory.mode(), &FormMode::Create);
        assert_eq!(directory.form(), &UserForm::default());
    }

    #[tokio::test]
    async fn test_remove() {
        let mut directory = UserDirectory::new(FakeApi::with_users(sample_users()));
        directory.load().await.unwrap();

        directory.remove("2").await.unwrap();

        let ids: Vec<&str> = directory.users().iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_remove_failure_keeps_list() {
        let mut directory = UserDirectory::new(FakeApi::with_users(sample_users()));
        directory.load().await.unwrap();

        let res = directory.remove("missing").await;

        assert!(matches!(res, Err(ClientError::NotFound(_))));
        assert_eq!(directory.users(), sample_users().as_slice());
    }
}
