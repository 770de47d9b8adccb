//! GET handler (spec.md §4.5): serve a file under the document root,
//! dispatched on its extension.

use crate::errors::ErrorKind;
use crate::http::response::Response;
use crate::http::types::StatusCode;
use crate::storage;
use std::path::Path;

pub(crate) async fn handle(resolved: &Path) -> Result<Response, ErrorKind> {
    if !storage::is_regular_file(resolved).await {
        return Err(ErrorKind::NotFound);
    }

    let extension = resolved
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "html" => {
            let body = storage::read(resolved).await?;
            Ok(Response::new(StatusCode::Ok)
                .header("Content-Type", "text/html; charset=utf-8")
                .body(body))
        }
        "txt" | "png" | "jpg" | "jpeg" => {
            let body = storage::read(resolved).await?;
            let filename = resolved
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("download");
            Ok(Response::new(StatusCode::Ok)
                .header("Content-Type", "application/octet-stream")
                .header(
                    "Content-Disposition",
                    format!("attachment; filename=\"{filename}\""),
                )
                .body(body))
        }
        _ => Err(ErrorKind::UnsupportedMedia),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn html_file_is_served_with_charset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, b"<h1>hi</h1>").unwrap();

        let response = handle(&path).await.unwrap();
        let encoded = response.encode("date", true);
        let text = String::from_utf8(encoded).unwrap();
        assert!(text.contains("200 OK"));
        assert!(text.contains("text/html; charset=utf-8"));
        assert!(text.ends_with("<h1>hi</h1>"));
    }

    #[tokio::test]
    async fn binary_file_gets_content_disposition() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logo.png");
        fs::write(&path, [0xDEu8, 0xAD, 0xBE, 0xEF]).unwrap();

        let response = handle(&path).await.unwrap();
        let encoded = response.encode("date", true);
        let text_head = String::from_utf8_lossy(&encoded);
        assert!(text_head.contains("application/octet-stream"));
        assert!(text_head.contains("attachment; filename=\"logo.png\""));
    }

    #[tokio::test]
    async fn unknown_extension_is_unsupported_media() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("script.sh");
        fs::write(&path, b"#!/bin/sh").unwrap();

        let err = handle(&path).await.unwrap_err();
        assert!(matches!(err, ErrorKind::UnsupportedMedia));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.html");
        let err = handle(&path).await.unwrap_err();
        assert!(matches!(err, ErrorKind::NotFound));
    }
}
