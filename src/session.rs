//! Conversation state owned by the chat front-end.

use crate::assistants::messages::Role;
use crate::client::ApiClient;
use crate::ApiResult;

/// One displayed turn of the conversation.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

/// A single user's conversation: the backing thread plus the local
/// transcript. One turn is processed at a time; `reset` starts the lifecycle
/// over.
#[derive(Debug, Default)]
pub struct ChatSession {
    thread_id: Option<String>,
    transcript: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The backing thread id, creating the thread on first use.
    pub async fn thread_id(&mut self, client: &ApiClient) -> ApiResult<String> {
        if let Some(id) = &self.thread_id {
            return Ok(id.clone());
        }
        let thread = client.create_thread().await?;
        log::debug!("conversation now backed by thread {}", thread.id);
        self.thread_id = Some(thread.id.clone());
        Ok(thread.id)
    }

    /// Drops the transcript and detaches the thread; the next turn starts a
    /// fresh conversation.
    pub fn reset(&mut self) {
        self.thread_id = None;
        self.transcript.clear();
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.transcript.push(ChatTurn {
            role: Role::User,
            text: text.into(),
        });
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.transcript.push(ChatTurn {
            role: Role::Assistant,
            text: text.into(),
        });
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_records_turns_in_order() {
        let mut session = ChatSession::new();
        session.push_user("what does the report say?");
        session.push_assistant("the report says [0] ...");

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, Role::User);
        assert_eq!(transcript[1].role, Role::Assistant);
    }

    #[test]
    fn reset_clears_the_transcript() {
        let mut session = ChatSession::new();
        session.push_user("hello");
        session.reset();
        assert!(session.transcript().is_empty());
    }
}
