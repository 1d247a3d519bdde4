//! Image uploads
//!
//! Uploaded images are written to `<upload_dir>/<kind>/<uuid>.<ext>` and
//! served back under `/static/<kind>/<uuid>.<ext>`.

use crate::error::AppError;
use axum::extract::multipart::Field;
use axum::extract::Multipart;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// URL prefix the upload directory is mounted on.
pub const STATIC_PREFIX: &str = "/static";

/// Pull the image named `field_name` out of a multipart body and store it.
/// Other fields are skipped.
pub async fn store_image_field(
    mut multipart: Multipart,
    field_name: &str,
    upload_dir: &Path,
    kind: &str,
) -> Result<String, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(field_name) {
            return store_image(field, upload_dir, kind).await;
        }
    }
    Err(AppError::Validation(format!("{} is required", field_name)))
}

async fn store_image(field: Field<'_>, upload_dir: &Path, kind: &str) -> Result<String, AppError> {
    let content_type = field.content_type().unwrap_or_default().to_ascii_lowercase();
    let ext = raster_extension(&content_type).ok_or_else(|| {
        AppError::Validation(format!(
            "{} must be a PNG, JPEG, WebP or GIF image, got '{}'",
            field.name().unwrap_or("file"),
            content_type
        ))
    })?;

    let bytes = field.bytes().await?;
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let dir = upload_dir.join(kind);
    tokio::fs::create_dir_all(&dir).await?;
    let file_name = format!("{}.{}", Uuid::new_v4(), ext);
    tokio::fs::write(dir.join(&file_name), &bytes).await?;

    info!("Stored {} upload {} ({} bytes)", kind, file_name, bytes.len());
    Ok(format!("{}/{}/{}", STATIC_PREFIX, kind, file_name))
}

/// Stored extension for an accepted image type. Raster formats only; the
/// client's file name is ignored.
fn raster_extension(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    match essence {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_types_map_to_fixed_extensions() {
        assert_eq!(raster_extension("image/png"), Some("png"));
        assert_eq!(raster_extension("image/jpeg"), Some("jpg"));
        assert_eq!(raster_extension("image/webp"), Some("webp"));
        assert_eq!(raster_extension("image/gif; charset=binary"), Some("gif"));
    }

    #[test]
    fn test_scriptable_and_unknown_types_are_refused() {
        assert_eq!(raster_extension("image/svg+xml"), None);
        assert_eq!(raster_extension("text/html"), None);
        assert_eq!(raster_extension("image/x-icon"), None);
        assert_eq!(raster_extension(""), None);
    }
}
