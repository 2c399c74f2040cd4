use serde::Deserialize;
use serde_json::json;

use crate::{client::ApiClient, ApiResult};

/// A conversation session held by the service. Created once per conversation
/// and replaced when the user starts over.
#[derive(Debug, Deserialize, Clone)]
pub struct Thread {
    pub id: String,
    pub object: String,
    pub created_at: u32,
}

impl ApiClient {
    pub async fn create_thread(&self) -> ApiResult<Thread> {
        self.post("threads", json!({})).await
    }
}
