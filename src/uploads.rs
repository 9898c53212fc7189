use crate::errors::ServiceError;
use bytes::Bytes;
use chrono::Utc;
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Per-file upload size cap (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Writes uploaded warehouse images to disk under server-generated unique
/// names and hands back the public path the API returns to clients. The slot
/// mapper only ever sees the paths produced here.
#[derive(Clone, Debug)]
pub struct ImageStore {
    root: PathBuf,
    public_prefix: String,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist one uploaded file and return its public path.
    ///
    /// Fails with a validation error for non-image content types or files
    /// over [`MAX_IMAGE_BYTES`]; the request is fully buffered before this
    /// point, so the check is a plain length comparison.
    pub async fn save(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<String, ServiceError> {
        if !content_type.is_some_and(|ct| ct.starts_with("image/")) {
            return Err(ServiceError::Validation(
                "Only image files are allowed".to_string(),
            ));
        }
        if data.len() > MAX_IMAGE_BYTES {
            return Err(ServiceError::Validation(
                "Image file exceeds the 5MB limit".to_string(),
            ));
        }

        let filename = unique_filename(original_name);
        let target = self.root.join(&filename);

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ServiceError::Internal(format!("creating upload dir: {e}")))?;
        tokio::fs::write(&target, &data)
            .await
            .map_err(|e| ServiceError::Internal(format!("writing upload: {e}")))?;

        debug!(file = %filename, bytes = data.len(), "stored warehouse image");
        Ok(format!("{}/{}", self.public_prefix, filename))
    }
}

/// `WHIMG-<millis>-<random>` plus the (sanitized) original extension.
fn unique_filename(original_name: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();
    format!("WHIMG-{}-{}{}", Utc::now().timestamp_millis(), suffix, ext)
}
