//! Imgur image upload storage.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{Storage, StorageError};
use crate::config::ImgurConfig;

/// Uploads content to Imgur as an anonymous image.
pub struct ImgurStorage {
    client: Client,
    config: ImgurConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl ImgurStorage {
    pub fn new(config: ImgurConfig) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| StorageError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ImgurConfig {
        &self.config
    }
}

/// Extracts the image link from an upload response.
fn parse_upload_response(status: u16, body: &str) -> Result<String, StorageError> {
    let parsed: Option<UploadResponse> = serde_json::from_str(body).ok();

    if !(200..300).contains(&status) {
        let message = parsed
            .as_ref()
            .and_then(|r| r.data.as_ref())
            .and_then(|d| d.error.as_ref())
            .map(error_message)
            .unwrap_or_else(|| truncate(body, 200));
        return Err(StorageError::Rejected { status, message });
    }

    let response = parsed.ok_or_else(|| {
        StorageError::InvalidResponse(format!("not an upload response: {}", truncate(body, 200)))
    })?;

    if !response.success {
        let message = response
            .data
            .as_ref()
            .and_then(|d| d.error.as_ref())
            .map(error_message)
            .unwrap_or_else(|| "upload unsuccessful".to_string());
        return Err(StorageError::Rejected { status, message });
    }

    response
        .data
        .and_then(|d| d.link)
        .filter(|link| !link.is_empty())
        .ok_or_else(|| StorageError::InvalidResponse("missing data.link".to_string()))
}

// Imgur reports errors either as a bare string or as an object with a message.
fn error_message(error: &serde_json::Value) -> String {
    match error {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[async_trait]
impl Storage for ImgurStorage {
    fn name(&self) -> &str {
        "imgur"
    }

    async fn store(&self, content: &[u8]) -> Result<String, StorageError> {
        if content.is_empty() {
            return Err(StorageError::EmptyContent);
        }

        let form = Form::new().part("image", Part::bytes(content.to_vec()));

        let response = self
            .client
            .post(&self.config.upload_url)
            .header(AUTHORIZATION, format!("Client-ID {}", self.config.client_id))
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        let link = parse_upload_response(status, &body)?;

        debug!(bytes = content.len(), link = %link, "Uploaded content to imgur");
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let body = r#"{"data":{"id":"abc","link":"https://i.imgur.com/abc.png"},"success":true,"status":200}"#;
        assert_eq!(
            parse_upload_response(200, body).unwrap(),
            "https://i.imgur.com/abc.png"
        );
    }

    #[test]
    fn test_parse_http_error_with_string_message() {
        let body = r#"{"data":{"error":"Invalid client_id"},"success":false,"status":403}"#;
        match parse_upload_response(403, body) {
            Err(StorageError::Rejected { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "Invalid client_id");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_http_error_with_object_message() {
        let body = r#"{"data":{"error":{"code":1003,"message":"File type invalid"}},"success":false,"status":400}"#;
        match parse_upload_response(400, body) {
            Err(StorageError::Rejected { message, .. }) => assert_eq!(message, "File type invalid"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_http_error_with_non_json_body() {
        let err = parse_upload_response(502, "Bad Gateway").unwrap_err();
        assert!(matches!(err, StorageError::Rejected { status: 502, .. }));
        assert!(err.is_transient());
    }

    #[test]
    fn test_parse_unsuccessful_with_ok_status() {
        let body = r#"{"data":{},"success":false}"#;
        assert!(matches!(
            parse_upload_response(200, body),
            Err(StorageError::Rejected { .. })
        ));
    }

    #[test]
    fn test_parse_missing_link() {
        let body = r#"{"data":{"id":"abc"},"success":true}"#;
        assert!(matches!(
            parse_upload_response(200, body),
            Err(StorageError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_upload_response(200, "<html>"),
            Err(StorageError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[tokio::test]
    async fn test_store_empty_content_rejected() {
        let storage = ImgurStorage::new(ImgurConfig::new("id")).unwrap();
        assert!(matches!(
            storage.store(&[]).await,
            Err(StorageError::EmptyContent)
        ));
    }

    #[test]
    fn test_new_uses_config() {
        let storage =
            ImgurStorage::new(ImgurConfig::new("id").with_upload_url("http://localhost/upload"))
                .unwrap();
        assert_eq!(storage.name(), "imgur");
        assert_eq!(storage.config().upload_url, "http://localhost/upload");
    }
}
