//! POST handler (spec.md §4.6): accept a JSON document upload.
//!
//! The target path is never read from disk for POST — only the upload
//! subdirectory is a meaningful destination, per spec.md §4.6's opening
//! line ("any target under the document root where the method is POST").

use crate::clock;
use crate::config::ServerConfig;
use crate::errors::ErrorKind;
use crate::http::response::Response;
use crate::http::types::StatusCode;
use crate::storage;

pub(crate) async fn handle(
    content_type: Option<&str>,
    body: &[u8],
    config: &ServerConfig,
) -> Result<Response, ErrorKind> {
    let is_json = content_type
        .map(|value| value.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false);
    if !is_json {
        return Err(ErrorKind::UnsupportedMedia);
    }

    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| ErrorKind::BadUpload)?;
    let pretty = serde_json::to_vec_pretty(&value).map_err(|_| ErrorKind::Internal)?;

    let upload_dir = config.upload_dir();
    storage::ensure_dir(&upload_dir).await?;

    let filename = clock::upload_filename();
    let filepath = upload_dir.join(&filename);
    storage::write(&filepath, &pretty).await?;

    let filepath_field = format!("/{}/{filename}", config.upload_subdir);
    let response_body = serde_json::json!({
        "status": "success",
        "message": "File created successfully",
        "filepath": filepath_field,
    });
    let response_bytes = serde_json::to_vec(&response_body).map_err(|_| ErrorKind::Internal)?;

    Ok(Response::new(StatusCode::Created)
        .header("Content-Type", "application/json")
        .body(response_bytes))
}
