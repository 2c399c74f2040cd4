use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{client::ApiClient, ApiResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Assistant {
    pub id: String,
    pub object: String,
    pub created_at: u32,
    /// The name of the assistant. The maximum length is 256 characters.
    pub name: Option<String>,
    pub model: String,
    /// The system instructions that the assistant uses. The maximum length is 256,000 characters.
    pub instructions: Option<String>,
    pub tools: Vec<Tool>,
    /// A set of resources that are used by the assistant's tools. The file_search tool requires a list of vector store IDs.
    pub tool_resources: Option<ToolResources>,
    pub metadata: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, serde_double_tag::Deserialize, serde_double_tag::Serialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    CodeInterpreter,
    FileSearch(FileSearch),
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FileSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_num_results: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolResources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_search: Option<FileSearchResources>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FileSearchResources {
    /// There can be a maximum of 1 vector store attached to the assistant.
    pub vector_store_ids: Vec<String>,
}

#[derive(Serialize, Builder, Debug, Clone, Default)]
#[builder(pattern = "owned")]
#[builder(name = "CreateAssistantBuilder")]
#[builder(setter(strip_option, into))]
pub struct CreateAssistantRequest {
    /// ID of the model to use.
    pub model: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub instructions: Option<String>,

    #[builder(default)]
    pub tools: Vec<Tool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub tool_resources: Option<ToolResources>,
}

impl ApiClient {
    pub async fn create_assistant(
        &self,
        request: CreateAssistantRequest,
    ) -> ApiResult<Assistant> {
        self.post("assistants", request).await
    }
}
