use std::path::{Component, Path, PathBuf};

use uuid::Uuid;

use crate::error::{AppError, Result};

/// Filesystem blob store for product images. Files live under the configured
/// storage root and are addressed by the relative path persisted on the
/// product row; the same root is served read-only under `/storage`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Writes `data` under `dir` with a generated file name and returns the
    /// relative path to persist, e.g. `products/<uuid>.png`.
    pub async fn save(&self, dir: &str, content_type: &str, data: &[u8]) -> Result<String> {
        let extension = extension_for(content_type);
        let relative = format!("{}/{}.{}", dir, Uuid::new_v4(), extension);

        let target = self.root.join(&relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&target, data).await?;

        Ok(relative)
    }

    /// Removes a previously stored file. Deleting a path that no longer
    /// exists is a no-op; absolute URLs and paths escaping the root are
    /// skipped entirely.
    pub async fn delete(&self, path: &str) -> Result<()> {
        if !Self::is_managed(path) {
            return Ok(());
        }

        match tokio::fs::remove_file(self.root.join(path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::InternalError(format!(
                "Failed to delete image {}: {}",
                path, e
            ))),
        }
    }

    /// A path is managed when it is a plain relative path inside the storage
    /// root. Seeded catalog rows may carry absolute image URLs instead.
    pub fn is_managed(path: &str) -> bool {
        if path.starts_with("http://") || path.starts_with("https://") {
            return false;
        }

        Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ImageStore) {
        let dir = TempDir::new().unwrap();
        let store = ImageStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_save_writes_file_and_returns_relative_path() {
        let (dir, store) = store();

        let path = store.save("products", "image/png", b"fake-png").await.unwrap();

        assert!(path.starts_with("products/"));
        assert!(path.ends_with(".png"));

        let on_disk = std::fs::read(dir.path().join(&path)).unwrap();
        assert_eq!(on_disk, b"fake-png");
    }

    #[tokio::test]
    async fn test_save_uses_jpg_for_jpeg_types() {
        let (_dir, store) = store();

        let path = store.save("products", "image/jpeg", b"fake-jpg").await.unwrap();

        assert!(path.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_delete_removes_stored_file() {
        let (dir, store) = store();

        let path = store.save("products", "image/png", b"bytes").await.unwrap();
        store.delete(&path).await.unwrap();

        assert!(!dir.path().join(&path).exists());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_dir, store) = store();

        let path = store.save("products", "image/png", b"bytes").await.unwrap();
        store.delete(&path).await.unwrap();
        store.delete(&path).await.unwrap();
        store.delete("products/never-existed.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_skips_absolute_urls() {
        let (_dir, store) = store();

        store
            .delete("https://cdn.example.com/products/external.png")
            .await
            .unwrap();
    }

    #[test]
    fn test_is_managed() {
        assert!(ImageStore::is_managed("products/abc.png"));
        assert!(!ImageStore::is_managed("https://cdn.example.com/a.png"));
        assert!(!ImageStore::is_managed("http://cdn.example.com/a.png"));
        assert!(!ImageStore::is_managed("../outside.png"));
        assert!(!ImageStore::is_managed("/etc/passwd"));
    }
}
