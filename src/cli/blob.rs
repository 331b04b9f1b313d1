use std::collections::HashSet;

use tracing::info;

use crate::{core::blob::BlobStore, repository::user::UserRepository};

/// Files in the blob store that no user's `profile_image` points at. They
/// pile up because updates and deletes never remove the old file.
pub async fn find_orphans(
    db: &dyn UserRepository,
    blobs: &BlobStore,
) -> anyhow::Result<Vec<String>> {
    let referenced: HashSet<String> = db
        .get_all_user()
        .await?
        .into_iter()
        .map(|x| x.profile_image)
        .collect();
    Ok(blobs
        .list()
        .await?
        .into_iter()
        .filter(|x| !referenced.contains(x))
        .collect())
}

/// Deletes the orphans and returns their names.
pub async fn remove_orphans(
    db: &dyn UserRepository,
    blobs: &BlobStore,
) -> anyhow::Result<Vec<String>> {
    let orphans = find_orphans(db, blobs).await?;
    for name in orphans.iter() {
        blobs.remove(name).await?;
        info!(file = %name, "orphaned blob removed");
    }
    Ok(orphans)
}
