use serde::{Deserialize, Serialize};

use crate::{
    client::{ApiClient, List},
    ApiResult,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Message {
    pub id: String,
    pub object: String,
    pub created_at: u32,
    /// The thread ID that this message belongs to.
    pub thread_id: String,
    /// The entity that produced the message. One of user or assistant.
    pub role: Role,
    pub content: Vec<Content>,
    /// The assistant that produced the message.
    pub assistant_id: Option<String>,
    /// The ID of the run associated with the creation of this message. Value is null when messages are created directly through the create message endpoint.
    pub run_id: Option<String>,
}

impl Message {
    /// The first text part of the message, if it has one.
    pub fn text(&self) -> Option<&Text> {
        self.content.iter().find_map(|part| match part {
            Content::Text(text) => Some(text),
            _ => None,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, serde_double_tag::Serialize, serde_double_tag::Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type")]
pub enum Content {
    Text(Text),
    ImageFile(ImageFile),
    Refusal(Refusal),
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Text {
    pub value: String,
    pub annotations: Vec<Annotation>,
}

/// Marks the span of `text` that a cited source supports.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Annotation {
    #[serde(rename = "type")]
    pub kind: String,
    /// The literal span in the message text covered by this annotation.
    pub text: String,
    pub start_index: u32,
    pub end_index: u32,
    /// Present on file_citation annotations only.
    pub file_citation: Option<FileCitation>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FileCitation {
    pub file_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageFile {
    pub file_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Refusal {
    pub refusal: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct CreateMessageRequest {
    pub role: Role,
    pub content: String,
}

impl ApiClient {
    pub async fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> ApiResult<Message> {
        self.post(format!("threads/{thread_id}/messages"), request)
            .await
    }

    /// Lists messages in a thread, newest first, at most `limit` entries.
    pub async fn list_messages(&self, thread_id: &str, limit: u32) -> ApiResult<Vec<Message>> {
        let list: List<Message> = self
            .get(format!(
                "threads/{thread_id}/messages?order=desc&limit={limit}"
            ))
            .await?;
        Ok(list.data)
    }

    /// The most recent message in a thread, if any.
    pub async fn latest_message(&self, thread_id: &str) -> ApiResult<Option<Message>> {
        Ok(self.list_messages(thread_id, 1).await?.into_iter().next())
    }
}
