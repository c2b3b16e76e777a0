//! Image store - upload directory bookkeeping for task images
use log::warn;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Extensions accepted for task images, matched case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Request-body cap enforced at the transport boundary; uploads above this
/// never reach the store.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Maps uploaded files to generated names inside a fixed upload directory.
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist an uploaded file under a generated unique name preserving
    /// its extension. Returns `None` without error when the extension is
    /// not in the allowed set; rejection is not a failure, the task simply
    /// ends up without an image.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> io::Result<Option<String>> {
        let Some(ext) = allowed_extension(original_name) else {
            return Ok(None);
        };
        let stored_name = format!("{}.{}", Uuid::new_v4().simple(), ext);
        fs::write(self.dir.join(&stored_name), bytes).await?;
        Ok(Some(stored_name))
    }

    /// Validate-then-swap replacement: the new file is stored first and the
    /// old one is deleted only after a successful save, so an invalid
    /// replacement leaves the existing image in place. Returns the new
    /// stored name, or `None` when the replacement was rejected.
    pub async fn replace(
        &self,
        old_name: Option<&str>,
        original_name: &str,
        bytes: &[u8],
    ) -> io::Result<Option<String>> {
        let Some(stored_name) = self.save(original_name, bytes).await? else {
            return Ok(None);
        };
        if let Some(old) = old_name {
            self.remove(old).await;
        }
        Ok(Some(stored_name))
    }

    /// Delete a stored file. Idempotent: a missing file is not an error.
    pub async fn remove(&self, name: &str) {
        if !is_safe_name(name) {
            warn!("Refusing to remove suspicious upload name {:?}", name);
            return;
        }
        if let Err(e) = fs::remove_file(self.dir.join(name)).await {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove upload {}: {}", name, e);
            }
        }
    }

    /// Read a stored file back. `None` covers both unsafe names and files
    /// that do not exist.
    pub async fn read(&self, name: &str) -> Option<Vec<u8>> {
        if !is_safe_name(name) {
            return None;
        }
        fs::read(self.dir.join(name)).await.ok()
    }
}

/// Lowercased extension when the name carries an allowed one.
pub fn allowed_extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Some(ext)
    } else {
        None
    }
}

/// A name is safe when it cannot escape the upload directory: no path
/// separators, no parent-directory segments, not empty, not hidden.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
}

/// Content type for serving a stored image, derived from its extension.
pub fn content_type_for(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
