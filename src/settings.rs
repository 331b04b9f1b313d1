use std::env;

use serde::Deserialize;
use tracing::info;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_env")]
    pub env: String, // file / server
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub prefix: Option<String>,
    /// Postgres record store. Unset means the in-memory store is used.
    pub database_url: Option<String>,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_migrate_on_start")]
    pub migrate_on_start: bool,
}

fn default_env() -> String {
    "file".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_log_dir() -> String {
    "./logs".to_string()
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_migrate_on_start() -> bool {
    true
}

impl Config {
    pub fn api_prefix(&self) -> String {
        self.prefix.clone().unwrap_or("/api".to_string())
    }
}

pub fn get_config() -> anyhow::Result<Config> {
    let env_var = env::var("ENV").unwrap_or("file".to_string());
    if env_var == "file" {
        info!("using .env file as environment variable");
        let _ = dotenvy::dotenv();
    } else {
        info!("using server environment as environment variable");
    }
    let config = envy::from_env::<Config>()?;
    Ok(config)
}
