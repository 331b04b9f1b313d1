use std::{net::SocketAddr, sync::Arc};

use poem::{
    listener::{Acceptor, Listener, TcpListener},
    test::{TestForm, TestFormField},
    Server,
};
use tempfile::TempDir;

use crate::{
    core::blob::BlobStore,
    factory::user::PLACEHOLDER_IMAGE,
    init_openapi_route,
    repository::{memory::MemoryUserRepository, user::UserRepository},
    settings::Config,
    AppState,
};

pub struct TestApp {
    pub app_state: Arc<AppState>,
    pub config: Config,
    // Removed with the app
    _upload_dir: TempDir,
}

pub fn test_config(upload_dir: &str) -> Config {
    Config {
        env: "test".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        prefix: Some("/api".to_string()),
        database_url: None,
        upload_dir: upload_dir.to_string(),
        log_dir: "./logs".to_string(),
        log_level: "debug".to_string(),
        migrate_on_start: false,
    }
}

/// App state over an in-memory record store and a throwaway upload dir.
pub async fn init_test_app() -> anyhow::Result<TestApp> {
    let upload_dir = tempfile::tempdir()?;
    let config = test_config(&upload_dir.path().to_string_lossy());
    let blobs = BlobStore::init(&config.upload_dir).await?;
    let db: Arc<dyn UserRepository> = Arc::new(MemoryUserRepository::new());
    Ok(TestApp {
        app_state: Arc::new(AppState { db, blobs }),
        config,
        _upload_dir: upload_dir,
    })
}

/// Multipart body with the four text fields, the way the browser form sends them.
pub fn user_form(first_name: &str, last_name: &str, email: &str, phone: &str) -> TestForm {
    TestForm::new()
        .text("firstName", first_name)
        .text("lastName", last_name)
        .text("email", email)
        .text("phone", phone)
}

pub fn image_field(file_name: &str) -> TestFormField {
    TestFormField::bytes(PLACEHOLDER_IMAGE.to_vec())
        .name("profileImage")
        .filename(file_name)
        .content_type("image/png")
}

/// Serves the app on an ephemeral port and returns its base url.
pub async fn spawn_test_server(test_app: &TestApp) -> anyhow::Result<String> {
    let app = init_openapi_route(test_app.app_state.clone(), &test_app.config);
    let acceptor = TcpListener::bind("127.0.0.1:0").into_acceptor().await?;
    let addr: SocketAddr = acceptor
        .local_addr()
        .first()
        .and_then(|x| x.as_socket_addr().cloned())
        .ok_or_else(|| anyhow::anyhow!("test server has no socket address"))?;
    tokio::spawn(Server::new_with_acceptor(acceptor).run(app));
    Ok(format!("http://{}", addr))
}
