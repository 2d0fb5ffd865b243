// crates/peticoes-api/src/uploads.rs
// ============================================================================
// Module: Upload Handler
// Description: Multipart image upload with date-bucketed storage.
// Purpose: Accept allow-listed image types and persist them under the
//          uploads directory.
// Dependencies: axum, peticoes-core, serde, time, tokio
// ============================================================================

//! ## Overview
//! One multipart route. Files land under `<dir>/YYYY/MM/DD/<ts>_<name>` with
//! path separators in the client filename replaced, so a crafted name cannot
//! escape the uploads directory. Only image content types on the allow-list
//! are accepted; everything else is a 400.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::extract::Multipart;
use axum::extract::State;
use peticoes_core::Timestamp;
use serde::Serialize;

use crate::error::ApiError;
use crate::server::AppState;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Content types accepted for upload.
const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];
/// Fallback name when the client supplies none.
const FALLBACK_FILENAME: &str = "upload.bin";

// ============================================================================
// SECTION: Wire Shapes
// ============================================================================

/// Upload acknowledgement.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    /// Public URL for the stored file.
    pub file_url: String,
    /// Stored filename, including the timestamp prefix.
    pub filename: String,
    /// Stored size in bytes.
    pub size: usize,
}

// ============================================================================
// SECTION: Handler
// ============================================================================

/// `POST /upload` — store one allow-listed image.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("invalid multipart body".to_string()))?
    {
        if field.file_name().is_none() {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(ApiError::Validation(format!(
                "unsupported content type: {content_type}"
            )));
        }
        let client_name = field.file_name().map_or(FALLBACK_FILENAME, str::trim).to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| ApiError::Validation("invalid multipart body".to_string()))?;
        if bytes.len() > state.uploads.max_upload_bytes {
            return Err(ApiError::Validation(format!(
                "file too large: {} bytes (max {})",
                bytes.len(),
                state.uploads.max_upload_bytes
            )));
        }
        return store_file(&state, &client_name, &bytes).await;
    }
    Err(ApiError::Validation("missing file field".to_string()))
}

/// Writes the file under the date-bucketed directory and builds the response.
async fn store_file(
    state: &AppState,
    client_name: &str,
    bytes: &[u8],
) -> Result<Json<UploadResponse>, ApiError> {
    let now = Timestamp::now();
    let day_dir = date_directory(now)
        .ok_or_else(|| ApiError::Internal("current date out of range".to_string()))?;
    let filename = format!("{}_{}", now.as_unix_millis(), sanitize_filename(client_name));
    let target_dir = state.uploads.dir.join(&day_dir);
    tokio::fs::create_dir_all(&target_dir)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    tokio::fs::write(target_dir.join(&filename), bytes)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    let file_url = format!("{}/{day_dir}/{filename}", state.uploads.url_prefix);
    Ok(Json(UploadResponse {
        file_url,
        filename,
        size: bytes.len(),
    }))
}

/// Returns the `YYYY/MM/DD` bucket for an instant.
fn date_directory(instant: Timestamp) -> Option<String> {
    let date = instant.date_utc()?;
    Some(format!("{:04}/{:02}/{:02}", date.year(), u8::from(date.month()), date.day()))
}

/// Replaces path separators so client names stay inside the uploads tree.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|ch| if ch == '/' || ch == '\\' { '_' } else { ch })
        .collect();
    if cleaned.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }
    cleaned
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions and helpers are permitted."
    )]

    use super::ALLOWED_CONTENT_TYPES;
    use super::date_directory;
    use super::sanitize_filename;
    use peticoes_core::Timestamp;

    #[test]
    fn path_separators_are_neutralized() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
        assert_eq!(sanitize_filename("a\\b.png"), "a_b.png");
        assert_eq!(sanitize_filename(""), "upload.bin");
    }

    #[test]
    fn date_bucket_is_zero_padded() {
        // 2024-03-05 00:00:00 UTC.
        let instant = Timestamp::from_unix_millis(1_709_596_800_000);
        assert_eq!(date_directory(instant).expect("in range"), "2024/03/05");
    }

    #[test]
    fn allow_list_covers_exactly_three_image_types() {
        assert!(ALLOWED_CONTENT_TYPES.contains(&"image/png"));
        assert!(!ALLOWED_CONTENT_TYPES.contains(&"text/html"));
        assert!(!ALLOWED_CONTENT_TYPES.contains(&"image/svg+xml"));
    }
}
