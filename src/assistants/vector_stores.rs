use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::assistants::runs::PollConfig;
use crate::client::ApiClient;
use crate::{ApiError, ApiResult};

/// A search-indexed store of uploaded documents, used to ground responses.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VectorStore {
    pub id: String,
    pub object: String,
    pub created_at: u32,
    pub name: String,
    pub status: VectorStoreStatus,
    pub file_counts: FileCounts,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FileCounts {
    pub in_progress: u32,
    pub completed: u32,
    pub failed: u32,
    pub cancelled: u32,
    pub total: u32,
}

#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, strum_macros::Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VectorStoreStatus {
    Expired,
    InProgress,
    Completed,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct CreateVectorStoreRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_ids: Option<Vec<String>>,
}

/// One indexing job covering a set of uploaded files.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VectorStoreFileBatch {
    pub id: String,
    pub object: String,
    pub created_at: u32,
    pub vector_store_id: String,
    pub status: FileBatchStatus,
    pub file_counts: FileCounts,
}

#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, strum_macros::Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FileBatchStatus {
    InProgress,
    Completed,
    Cancelled,
    Failed,
}

impl FileBatchStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FileBatchStatus::InProgress)
    }
}

impl ApiClient {
    pub async fn create_vector_store(
        &self,
        request: CreateVectorStoreRequest,
    ) -> ApiResult<VectorStore> {
        self.post("vector_stores", request).await
    }

    /// Starts indexing the given uploaded files into the store.
    pub async fn create_file_batch(
        &self,
        vector_store_id: &str,
        file_ids: &[String],
    ) -> ApiResult<VectorStoreFileBatch> {
        self.post(
            format!("vector_stores/{vector_store_id}/file_batches"),
            json!({ "file_ids": file_ids }),
        )
        .await
    }

    pub async fn get_file_batch(
        &self,
        vector_store_id: &str,
        batch_id: &str,
    ) -> ApiResult<VectorStoreFileBatch> {
        self.get(format!(
            "vector_stores/{vector_store_id}/file_batches/{batch_id}"
        ))
        .await
    }

    /// Waits until the batch stops indexing, on the same backoff discipline
    /// as run polling. The returned batch may still have ended unsuccessfully;
    /// callers check `status`.
    pub async fn poll_file_batch(
        &self,
        vector_store_id: &str,
        batch_id: &str,
        config: &PollConfig,
    ) -> ApiResult<VectorStoreFileBatch> {
        let started = Instant::now();
        let mut delays = config.delays();
        loop {
            let batch = self.get_file_batch(vector_store_id, batch_id).await?;
            if batch.status.is_terminal() {
                return Ok(batch);
            }
            let delay = delays.step();
            if started.elapsed() + delay >= config.timeout {
                return Err(ApiError::new(
                    format!(
                        "file batch {batch_id} still indexing after {:?}",
                        config.timeout
                    ),
                    "timeout",
                ));
            }
            log::debug!(
                "file batch {batch_id}: {} of {} files indexed, next check in {delay:?}",
                batch.file_counts.completed,
                batch.file_counts.total
            );
            tokio::time::sleep(delay).await;
        }
    }
}
