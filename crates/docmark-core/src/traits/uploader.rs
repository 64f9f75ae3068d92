//! Uploader trait and related types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::ChunkSettings;
use crate::error::DocmarkResult;

/// Metadata sent with every document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadMetadata {
    pub source_path: PathBuf,
    /// First heading of the document, if it had one.
    pub extracted_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
}

/// What the knowledge base answered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    /// Any other fields of the response.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UploadResponse {
    pub fn with_document_id(document_id: impl Into<String>) -> Self {
        Self {
            document_id: Some(document_id.into()),
            extra: Map::new(),
        }
    }
}

/// Core Uploader trait - pushes Markdown documents to a knowledge base.
pub trait Uploader: Send + Sync {
    /// Upload one document. Chunk settings are forwarded untouched.
    fn push_markdown(
        &self,
        title: &str,
        markdown: &str,
        metadata: &UploadMetadata,
        chunk_settings: Option<ChunkSettings>,
    ) -> DocmarkResult<UploadResponse>;
}
