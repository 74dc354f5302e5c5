//! Multipart upload handling.
//!
//! Project and progress routes accept `multipart/form-data` carrying text
//! fields alongside file attachments. This module splits a multipart stream
//! into coerced text fields and in-memory file parts, enforcing the per-file
//! size cap and the allowed formats for each attachment slot. Nothing is
//! written to disk at parse time: callers persist the pending files only
//! after the payload has passed the access policy and validation, so a
//! rejected save leaves no orphaned file behind.

use std::path::Path;

use axum::body::Bytes;
use axum::extract::multipart::Multipart;
use promis_core::error::CoreError;
use rand::Rng;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::form::coerce_fields;

/// Maximum size of a single uploaded file (5 MiB).
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const PDF_EXTENSIONS: &[&str] = &["pdf"];

/// File-bearing field names and the extensions each accepts.
const FILE_FIELDS: &[(&str, &[&str])] = &[
    ("project_image", IMAGE_EXTENSIONS),
    ("project_pdf", PDF_EXTENSIONS),
    ("extension_pdf", PDF_EXTENSIONS),
    ("physical_progress_image1", IMAGE_EXTENSIONS),
    ("physical_progress_image2", IMAGE_EXTENSIONS),
    ("physical_progress_image3", IMAGE_EXTENSIONS),
];

/// A validated file part held in memory until the save is authorized.
#[derive(Debug)]
pub struct PendingFile {
    /// The form field the file arrived under.
    pub field: String,
    /// The generated stored filename (also recorded in the field map).
    pub stored: String,
    pub data: Bytes,
}

/// A multipart payload split into typed text fields and pending files.
///
/// File fields appear in `fields` as the stored filename, so the combined
/// object can be screened and deserialized into a DTO in one pass; the
/// bytes themselves stay in `pending` until [`persist_uploads`] runs.
#[derive(Debug, Default)]
pub struct ParsedUpload {
    pub fields: Map<String, Value>,
    pub pending: Vec<PendingFile>,
}

fn accepted_extensions(field: &str) -> Option<&'static [&'static str]> {
    FILE_FIELDS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, exts)| *exts)
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Generate a collision-resistant stored filename preserving the extension.
fn stored_filename(ext: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let nonce: u32 = rand::rng().random();
    format!("{millis}-{nonce:08x}.{ext}")
}

/// Consume a multipart stream: validate and buffer file parts, coerce text
/// parts, and merge both into a single field map.
pub async fn parse_multipart(mut multipart: Multipart) -> AppResult<ParsedUpload> {
    let mut text_fields: Vec<(String, String)> = Vec::new();
    let mut file_fields: Map<String, Value> = Map::new();
    let mut pending: Vec<PendingFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let filename = field.file_name().map(str::to_string);

        match (accepted_extensions(&name), filename) {
            (Some(allowed), Some(filename)) => {
                if filename.is_empty() {
                    continue;
                }
                let ext = extension_of(&filename).ok_or_else(|| {
                    CoreError::Validation(format!("{name}: file has no extension"))
                })?;
                if !allowed.contains(&ext.as_str()) {
                    return Err(CoreError::Validation(format!(
                        "{name}: unsupported file type '.{ext}' (allowed: {})",
                        allowed.join(", ")
                    ))
                    .into());
                }

                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file '{name}': {e}"))
                })?;
                if data.len() > MAX_FILE_SIZE {
                    return Err(CoreError::Validation(format!(
                        "{name}: file exceeds the {} MiB limit",
                        MAX_FILE_SIZE / (1024 * 1024)
                    ))
                    .into());
                }

                let stored = stored_filename(&ext);
                file_fields.insert(name.clone(), Value::String(stored.clone()));
                pending.push(PendingFile {
                    field: name,
                    stored,
                    data,
                });
            }
            _ => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field '{name}': {e}"))
                })?;
                text_fields.push((name, value));
            }
        }
    }

    let mut fields = coerce_fields(text_fields)?;
    fields.append(&mut file_fields);
    Ok(ParsedUpload { fields, pending })
}

/// Write pending files under `upload_dir`.
///
/// Runs only after the payload has cleared the access policy and
/// validation. `fields` is the post-screen field map: a file whose field
/// was dropped by the policy is discarded rather than stored.
pub async fn persist_uploads(
    pending: &[PendingFile],
    fields: &Map<String, Value>,
    upload_dir: &Path,
) -> AppResult<()> {
    for file in pending {
        if !fields.contains_key(&file.field) {
            tracing::debug!(field = %file.field, "discarding upload dropped by the access policy");
            continue;
        }
        tokio::fs::create_dir_all(upload_dir).await.map_err(|e| {
            AppError::InternalError(format!("Failed to create upload directory: {e}"))
        })?;
        tokio::fs::write(upload_dir.join(&file.stored), &file.data)
            .await
            .map_err(|e| {
                AppError::InternalError(format!("Failed to store '{}': {e}", file.field))
            })?;
        tracing::debug!(field = %file.field, stored = %file.stored, size = file.data.len(), "stored upload");
    }
    Ok(())
}
