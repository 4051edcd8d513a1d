//! File attachments on logs.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entity;

/// An attachment stored on the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(alias = "fileId")]
    pub attachment_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub file_name: String,
    pub file_mime: String,
    #[serde(default)]
    pub file_size: u64,
    /// Base64 file content; list endpoints may leave it out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,
}

impl Entity for Attachment {
    type Id = u64;
    const NAME: &'static str = "attachment";

    fn id(&self) -> u64 {
        self.attachment_id
    }
}

/// A file selected for upload, content already base64 encoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentCreate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub file_name: String,
    pub file_mime: String,
    pub file_size: u64,
    pub file_data: String,
}

impl AttachmentCreate {
    /// Build an upload from in-memory bytes.
    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8]) -> Self {
        let file_name = file_name.into();
        Self {
            log_id: None,
            title: None,
            file_mime: mime_for(&file_name),
            file_size: bytes.len() as u64,
            file_data: STANDARD.encode(bytes),
            file_name,
        }
    }

    /// Read a file from disk into an upload.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        Ok(Self::from_bytes(file_name, &bytes))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn for_log(mut self, log_id: u64) -> Self {
        self.log_id = Some(log_id);
        self
    }
}

/// MIME type guessed from the file extension.
pub fn mime_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
