//! Filesystem storage for uploaded profile images.
//!
//! Every upload lands in a single flat directory under a generated name
//! (`<uuid>-<original name>`). Records only keep that name, and files are
//! served back by the static endpoint mounted on [`UPLOADS_PATH`].

use std::path::{Path, PathBuf};

use anyhow::bail;
use tokio::{
    fs::{self, OpenOptions},
    io::AsyncWriteExt,
};
use tracing::debug;
use uuid::Uuid;

/// URL prefix the blob directory is served under.
pub const UPLOADS_PATH: &str = "/uploads";

const FALLBACK_FILE_NAME: &str = "upload";

#[derive(Clone, Debug)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Opens the store, creating the directory if it does not exist yet.
    pub async fn init(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Unique name for a new upload. The prefix is a v7 uuid, the suffix is
    /// the sanitized client file name.
    pub fn generate_file_name(original_name: Option<&str>) -> String {
        format!(
            "{}-{}",
            Uuid::now_v7().simple(),
            sanitize_file_name(original_name.unwrap_or_default())
        )
    }

    /// Writes `data` under a freshly generated name and returns that name.
    pub async fn save(&self, original_name: Option<&str>, data: &[u8]) -> anyhow::Result<String> {
        let file_name = Self::generate_file_name(original_name);
        let path = self.resolve_path(&file_name)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(data).await?;
        file.sync_all().await?;

        debug!(path = ?path, size = data.len(), "blob stored");
        Ok(file_name)
    }

    pub async fn exists(&self, file_name: &str) -> anyhow::Result<bool> {
        let path = self.resolve_path(file_name)?;
        Ok(fs::try_exists(&path).await?)
    }

    pub async fn read(&self, file_name: &str) -> anyhow::Result<Vec<u8>> {
        let path = self.resolve_path(file_name)?;
        Ok(fs::read(&path).await?)
    }

    /// Returns `false` when there was nothing to remove.
    pub async fn remove(&self, file_name: &str) -> anyhow::Result<bool> {
        let path = self.resolve_path(file_name)?;
        if !fs::try_exists(&path).await? {
            return Ok(false);
        }
        fs::remove_file(&path).await?;
        debug!(path = ?path, "blob removed");
        Ok(true)
    }

    /// Names of all regular files in the store, sorted.
    pub async fn list(&self) -> anyhow::Result<Vec<String>> {
        let mut names = vec![];
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn resolve_path(&self, file_name: &str) -> anyhow::Result<PathBuf> {
        if file_name.is_empty()
            || file_name.contains("..")
            || file_name.contains('/')
            || file_name.contains('\\')
        {
            bail!("invalid blob name: {file_name:?}");
        }
        Ok(self.root.join(file_name))
    }
}

/// Keeps the last path component of a client supplied name and replaces
/// anything outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.');
    if sanitized.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        sanitized.to_string()
    }
}
