//! File uploads
//!
//! Files land in the configured upload directory as `<UTC timestamp>.<ext>`
//! and are served back from `/uploads/`.

use crate::error::{ApiError, ApiResult};
use crate::session::Authenticated;
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Form field holding the file
pub const FILE_FIELD: &str = "file";

/// Used when the client's filename has no usable extension
const FALLBACK_EXTENSION: &str = "bin";

const MAX_EXTENSION_LEN: usize = 16;

/// Extension of `filename` when it is short and alphanumeric
pub fn extension_of(filename: Option<&str>) -> &str {
    filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or(FALLBACK_EXTENSION)
}

/// Stored name for an upload received now
pub fn stored_name(extension: &str) -> String {
    format!("{}.{extension}", Utc::now().format("%Y%m%d-%H%M%S%.9f"))
}

pub async fn upload(
    auth: Authenticated,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Value>)> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = stored_name(extension_of(field.file_name()));
        fs::create_dir_all(&state.upload_dir).await?;
        let path = state.upload_dir.join(&name);
        let mut file = fs::File::create(&path).await?;

        let mut written = 0usize;
        let copied: ApiResult<()> = async {
            while let Some(chunk) = field.chunk().await? {
                written += chunk.len();
                file.write_all(&chunk).await?;
            }
            file.flush().await?;
            Ok(())
        }
        .await;
        if let Err(err) = copied {
            let _ = fs::remove_file(&path).await;
            return Err(err);
        }

        info!(user = %auth.session.user_id, file = %name, bytes = written, "stored upload");
        return Ok((
            StatusCode::CREATED,
            Json(json!({ "url": format!("/uploads/{name}") })),
        ));
    }

    Err(ApiError::MissingFile)
}
