//! Filesystem store for generated images.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

/// URL prefix the media root is served under.
pub const MEDIA_MOUNT: &str = "/media";

/// Subdirectory under the media root that holds generated images.
const GENERATED_DIR: &str = "generated_images";

/// The public URL for a media-relative path.
pub fn media_url(relative: &str) -> String {
    format!("{MEDIA_MOUNT}/{relative}")
}

/// Writes generated images under a media root and hands back the
/// media-relative path that gets persisted on the message row.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this store writes under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write PNG bytes to a fresh random filename.
    ///
    /// Returns the path relative to the media root, e.g.
    /// `generated_images/generated_<hex>.png`. The parent directory is
    /// created on demand.
    pub async fn save_png(&self, bytes: &[u8]) -> io::Result<String> {
        let filename = format!("generated_{}.png", Uuid::new_v4().simple());
        let dir = self.root.join(GENERATED_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(&filename);
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "stored generated image");

        Ok(format!("{GENERATED_DIR}/{filename}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_png_writes_file_and_returns_relative_path() {
        let root = std::env::temp_dir().join(format!("murmur-media-{}", Uuid::new_v4().simple()));
        let store = MediaStore::new(&root);

        let rel = store.save_png(b"not really a png").await.unwrap();
        assert!(rel.starts_with("generated_images/generated_"));
        assert!(rel.ends_with(".png"));

        let on_disk = tokio::fs::read(root.join(&rel)).await.unwrap();
        assert_eq!(on_disk, b"not really a png");

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn save_png_generates_unique_names() {
        let root = std::env::temp_dir().join(format!("murmur-media-{}", Uuid::new_v4().simple()));
        let store = MediaStore::new(&root);

        let a = store.save_png(b"a").await.unwrap();
        let b = store.save_png(b"b").await.unwrap();
        assert_ne!(a, b);

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[test]
    fn media_url_joins_mount_and_relative_path() {
        assert_eq!(
            media_url("generated_images/generated_ab12.png"),
            "/media/generated_images/generated_ab12.png"
        );
    }
}
