use anyhow::Context;
use bytes::Bytes;
use tracing::{debug, info};
use uuid::Uuid;

use crate::customers::validation::{Field, FieldError, IMAGE_UNSUPPORTED};
use crate::storage::StorageClient;

const MAX_SLUG_LEN: usize = 48;

/// A file part received from the form, untrusted.
#[derive(Debug, Clone)]
pub struct UploadItem {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// An accepted upload with its final location, not yet written.
#[derive(Debug, Clone)]
pub struct PendingImage {
    pub key: String,
    pub reference: String,
    pub content_type: &'static str,
    body: Bytes,
}

impl PendingImage {
    #[cfg(test)]
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

/// Decides whether an upload produces a new file and where it goes.
///
/// `Ok(None)` means there is nothing to write: the field was absent or the
/// browser sent an empty file part.
pub fn plan_upload(
    prefix: &str,
    name_hint: Option<&str>,
    upload: Option<UploadItem>,
) -> Result<Option<PendingImage>, FieldError> {
    let Some(upload) = upload.filter(|u| !u.body.is_empty()) else {
        return Ok(None);
    };

    let ext = upload
        .file_name
        .as_deref()
        .and_then(ext_from_file_name)
        .or_else(|| upload.content_type.as_deref().and_then(ext_from_mime))
        .ok_or_else(|| FieldError::invalid(Field::Image, IMAGE_UNSUPPORTED))?;

    let file_name = format!(
        "{}-{}.{}",
        slugify(name_hint.unwrap_or_default()),
        Uuid::new_v4().simple(),
        ext
    );
    let key = format!("{}/{}", prefix, file_name);
    Ok(Some(PendingImage {
        reference: format!("/{}", key),
        key,
        content_type: mime_from_ext(ext),
        body: upload.body,
    }))
}

/// Writes the image and returns its public reference.
pub async fn store_image(storage: &dyn StorageClient, image: PendingImage) -> anyhow::Result<String> {
    let size = image.body.len();
    storage
        .put_object(&image.key, image.body, image.content_type)
        .await
        .with_context(|| format!("put_object {}", image.key))?;
    info!(key = %image.key, size, "customer image stored");
    Ok(image.reference)
}

/// Removes a file previously returned by [`store_image`].
pub async fn discard_image(storage: &dyn StorageClient, reference: &str) -> anyhow::Result<()> {
    let key = reference.trim_start_matches('/');
    storage
        .delete_object(key)
        .await
        .with_context(|| format!("delete_object {}", key))?;
    debug!(key, "customer image discarded");
    Ok(())
}

/// Lower-case ASCII slug; anything else collapses into single dashes.
pub fn slugify(hint: &str) -> String {
    let mut slug = String::with_capacity(hint.len().min(MAX_SLUG_LEN));
    let mut pending_dash = false;
    for c in hint.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
            if slug.len() >= MAX_SLUG_LEN {
                break;
            }
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("customer");
    }
    slug
}

fn ext_from_file_name(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("png"),
        "jpg" | "jpeg" => Some("jpg"),
        "webp" => Some("webp"),
        "gif" => Some("gif"),
        _ => None,
    }
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

fn mime_from_ext(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "jpg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}
