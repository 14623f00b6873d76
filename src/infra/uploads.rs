//! Doctor photo storage on local disk.
//!
//! Every file operation goes through a `PathBoundary` anchored at the uploads
//! directory. Stored names are generated, and the names read back from public
//! paths are joined with `strict_join`, so nothing resolves outside the root.

use std::path::Path;

use strict_path::{PathBoundary, StrictPath};
use uuid::Uuid;

use crate::config::UPLOADS_URL_PREFIX;
use crate::errors::{AppError, AppResult};

/// Marker for paths inside the doctor photo directory
#[derive(Debug, Clone, Copy)]
pub struct DoctorPhotos;

/// An uploaded file part as received from the client
#[derive(Debug, Clone)]
pub struct UploadedPhoto {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Writes photos under a root directory and hands back their public path
#[derive(Debug, Clone)]
pub struct PhotoStore {
    boundary: PathBoundary<DoctorPhotos>,
}

impl PhotoStore {
    /// Anchor the store at `root`, creating the directory if needed.
    ///
    /// # Errors
    /// `Internal` if the directory cannot be created or resolved.
    pub fn new(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref();
        let boundary = PathBoundary::try_new_create(root).map_err(|e| {
            AppError::internal(format!("Cannot open uploads dir {}: {}", root.display(), e))
        })?;
        Ok(Self { boundary })
    }

    /// Canonical uploads directory, for serving files
    pub fn root(&self) -> &Path {
        Path::new(self.boundary.interop_path())
    }

    /// Store `photo` and return its public path (`/uploads/<file>`).
    ///
    /// # Errors
    /// `Validation` if the part is empty or not an accepted image type.
    pub async fn save(&self, photo: &UploadedPhoto) -> AppResult<String> {
        if photo.bytes.is_empty() {
            return Err(AppError::validation("Photo is empty"));
        }

        let extension = image_extension(photo.content_type.as_deref(), photo.file_name.as_deref())
            .ok_or_else(|| AppError::validation("Photo must be a PNG, JPEG, GIF, WebP or BMP image"))?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let target = self
            .boundary
            .strict_join(&file_name)
            .map_err(|e| AppError::internal(format!("Cannot place photo {}: {}", file_name, e)))?;

        let bytes = photo.bytes.clone();
        let written = tokio::task::spawn_blocking(move || target.write(&bytes))
            .await
            .map_err(|e| AppError::internal(format!("Photo writer stopped: {}", e)))?;
        written.map_err(|e| AppError::internal(format!("Cannot write {}: {}", file_name, e)))?;

        tracing::debug!(file = %file_name, bytes = photo.bytes.len(), "Stored doctor photo");

        Ok(format!("{}/{}", UPLOADS_URL_PREFIX, file_name))
    }

    /// Remove a previously stored photo by its public path. Missing files,
    /// foreign paths and anything resolving outside the root are ignored.
    pub async fn remove(&self, public_path: &str) {
        let Some(target) = self.stored_file(public_path) else {
            tracing::debug!(path = %public_path, "Not a stored photo, skipping removal");
            return;
        };

        let removed = tokio::task::spawn_blocking(move || target.remove_file()).await;
        match removed {
            Ok(Ok(())) => tracing::debug!(path = %public_path, "Removed doctor photo"),
            Ok(Err(e)) => tracing::debug!(path = %public_path, "Photo not removed: {}", e),
            Err(e) => tracing::warn!(path = %public_path, "Photo remover stopped: {}", e),
        }
    }

    /// Resolve a public path to a file directly inside the boundary.
    fn stored_file(&self, public_path: &str) -> Option<StrictPath<DoctorPhotos>> {
        let name = public_path
            .strip_prefix(UPLOADS_URL_PREFIX)?
            .strip_prefix('/')
            .filter(|name| !name.is_empty())?;

        let target = self.boundary.strict_join(name).ok()?;
        let flat = Path::new(target.interop_path()).parent() == Some(self.root());
        flat.then_some(target)
    }
}

/// Pick a file extension for an image upload, or `None` if the type is not
/// one of the raster formats we serve back. SVG is refused since it can
/// carry script.
fn image_extension(content_type: Option<&str>, file_name: Option<&str>) -> Option<&'static str> {
    let content_type = content_type?.to_ascii_lowercase();
    let subtype = content_type.strip_prefix("image/")?;

    match subtype {
        "png" => Some("png"),
        "jpeg" | "jpg" | "pjpeg" => Some("jpg"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        "bmp" | "x-ms-bmp" => Some("bmp"),
        "svg+xml" => None,
        _ => {
            let ext = Path::new(file_name?).extension()?.to_str()?.to_ascii_lowercase();
            match ext.as_str() {
                "png" => Some("png"),
                "jpg" | "jpeg" => Some("jpg"),
                "gif" => Some("gif"),
                "webp" => Some("webp"),
                "bmp" => Some("bmp"),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn photo(content_type: Option<&str>, bytes: &[u8]) -> UploadedPhoto {
        UploadedPhoto {
            file_name: Some("portrait.PNG".into()),
            content_type: content_type.map(String::from),
            bytes: bytes.to_vec(),
        }
    }

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("photo-store-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_extension_from_content_type() {
        assert_eq!(image_extension(Some("image/jpeg"), None), Some("jpg"));
        assert_eq!(image_extension(Some("IMAGE/PNG"), None), Some("png"));
        assert_eq!(image_extension(Some("image/x-icon"), Some("a.bmp")), Some("bmp"));
    }

    #[test]
    fn test_unknown_image_types_need_a_known_extension() {
        assert_eq!(image_extension(Some("image/x-icon"), None), None);
        assert_eq!(image_extension(Some("image/x-icon"), Some("favicon.ico")), None);
    }

    #[test]
    fn test_svg_is_refused() {
        assert_eq!(image_extension(Some("image/svg+xml"), Some("a.svg")), None);
        assert_eq!(image_extension(Some("image/svg+xml"), Some("a.png")), None);
        assert_eq!(image_extension(Some("image/x-unknown"), Some("a.svg")), None);
    }

    #[test]
    fn test_non_images_rejected() {
        assert_eq!(image_extension(Some("application/pdf"), Some("cv.png")), None);
        assert_eq!(image_extension(None, Some("a.png")), None);
    }

    #[test]
    fn test_new_creates_the_root() {
        let root = temp_root();
        let store = PhotoStore::new(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), root.canonicalize().unwrap().as_path());
        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_save_writes_file_under_root() {
        let root = temp_root();
        let store = PhotoStore::new(&root).unwrap();

        let public = store.save(&photo(Some("image/png"), b"\x89PNG")).await.unwrap();
        assert!(public.starts_with("/uploads/"));
        assert!(public.ends_with(".png"));

        let file_name = public.trim_start_matches("/uploads/");
        let written = tokio::fs::read(root.join(file_name)).await.unwrap();
        assert_eq!(written, b"\x89PNG");

        store.remove(&public).await;
        assert!(!root.join(file_name).exists());
        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_save_rejects_empty_non_image_and_svg() {
        let root = temp_root();
        let store = PhotoStore::new(&root).unwrap();
        assert!(matches!(
            store.save(&photo(Some("image/png"), b"")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            store.save(&photo(Some("text/plain"), b"hello")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            store.save(&photo(Some("image/svg+xml"), b"<svg onload=\"x()\"/>")).await,
            Err(AppError::Validation(_))
        ));
        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_remove_never_leaves_the_root() {
        let base = temp_root();
        let root = base.join("uploads");
        let store = PhotoStore::new(&root).unwrap();

        let outside = base.join("secret.txt");
        std::fs::write(&outside, b"keep").unwrap();
        let nested = root.join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("inner.png"), b"keep").unwrap();

        store.remove("/uploads/../secret.txt").await;
        store.remove("/uploads/..%2Fsecret.txt").await;
        store.remove(&format!("/uploads/{}", outside.display())).await;
        store.remove("/uploads/nested/inner.png").await;
        store.remove("/etc/passwd").await;
        store.remove("/uploads/").await;

        assert!(outside.exists());
        assert!(nested.join("inner.png").exists());
        std::fs::remove_dir_all(&base).unwrap();
    }
}
