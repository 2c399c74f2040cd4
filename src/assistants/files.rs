use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::{client::ApiClient, ApiError, ApiResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct File {
    pub id: String,
    pub object: String,
    pub created_at: u32,
    pub bytes: u32,
    pub filename: String,
    pub purpose: FilePurpose,
}

#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, strum_macros::Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FilePurpose {
    Assistants,
    AssistantsOutput,
    Batch,
    BatchOutput,
    FineTune,
    FineTuneResults,
    Vision,
}

impl ApiClient {
    /// Streams a file from disk into the service's file store.
    pub async fn upload_file(&self, path: &Path, purpose: FilePurpose) -> ApiResult<File> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ApiError::new(format!("{} has no usable file name", path.display()), "io")
            })?
            .to_string();

        let file = tokio::fs::File::open(path).await?;
        let file_part = Part::stream(file)
            .file_name(filename)
            .mime_str("application/octet-stream")?;
        let form = Form::new()
            .part("file", file_part)
            .text("purpose", purpose.to_string());

        self.post_multipart("files", form).await
    }

    /// Display-name lookup for a stored file, used when rendering citations.
    pub async fn get_file(&self, file_id: &str) -> ApiResult<File> {
        self.get(format!("files/{file_id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purpose_serializes_as_snake_case() {
        assert_eq!(FilePurpose::Assistants.to_string(), "assistants");
        let json = serde_json::to_value(FilePurpose::AssistantsOutput).unwrap();
        assert_eq!(json, "assistants_output");
    }
}
