use std::cmp;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::assistants::messages::{CreateMessageRequest, Role, Text};
use crate::client::ApiClient;
use crate::{ApiError, ApiResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Run {
    pub id: String,
    pub object: String,
    pub created_at: u32,
    /// The ID of the assistant used for this run.
    pub assistant_id: String,
    /// The ID of the thread associated with this run.
    pub thread_id: String,
    /// The status of the run.
    pub status: RunStatus,
    /// The last error that occurred during this run.
    pub last_error: Option<LastError>,
}

#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, strum_macros::Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
}

impl RunStatus {
    /// Whether the run has stopped and will not change again on its own.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            RunStatus::Queued | RunStatus::InProgress | RunStatus::Cancelling
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LastError {
    pub code: String,
    pub message: String,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct CreateRunRequest {
    /// ID of the assistant to use.
    pub assistant_id: String,

    /// Overrides the assistant's default instructions for this run only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Polling discipline for awaiting a terminal status: exponential backoff
/// capped at `max_interval`, bounded by `timeout` overall.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(8),
            timeout: Duration::from_secs(300),
        }
    }
}

impl PollConfig {
    pub(crate) fn delays(&self) -> Backoff {
        Backoff {
            next: self.initial_interval,
            max: self.max_interval,
        }
    }
}

pub(crate) struct Backoff {
    next: Duration,
    max: Duration,
}

impl Backoff {
    pub(crate) fn step(&mut self) -> Duration {
        let current = self.next;
        self.next = cmp::min(current.saturating_mul(2), self.max);
        current
    }
}

impl ApiClient {
    pub async fn create_run(
        &self,
        thread_id: &str,
        request: CreateRunRequest,
    ) -> ApiResult<Run> {
        self.post(format!("threads/{thread_id}/runs"), request)
            .await
    }

    pub async fn get_run(&self, thread_id: &str, run_id: &str) -> ApiResult<Run> {
        self.get(format!("threads/{thread_id}/runs/{run_id}")).await
    }

    /// Fetches the run on the backoff schedule until its status is terminal,
    /// failing once `config.timeout` would be exceeded. Dropping the returned
    /// future cancels the wait; the remote run itself keeps going.
    pub async fn poll_run(
        &self,
        thread_id: &str,
        run_id: &str,
        config: &PollConfig,
    ) -> ApiResult<Run> {
        let started = Instant::now();
        let mut delays = config.delays();
        loop {
            let run = self.get_run(thread_id, run_id).await?;
            if run.status.is_terminal() {
                return Ok(run);
            }
            let delay = delays.step();
            if started.elapsed() + delay >= config.timeout {
                return Err(ApiError::new(
                    format!("gave up waiting on run {run_id} after {:?}", config.timeout),
                    "timeout",
                ));
            }
            log::debug!("run {run_id} is {}, next check in {delay:?}", run.status);
            tokio::time::sleep(delay).await;
        }
    }

    /// Appends `input` to the thread as a user message, starts a run, waits
    /// for it to finish, and returns the assistant's reply text with its raw
    /// annotations.
    pub async fn complete_turn(
        &self,
        assistant_id: &str,
        thread_id: &str,
        input: &str,
        poll: &PollConfig,
    ) -> ApiResult<Text> {
        self.create_message(
            thread_id,
            CreateMessageRequest {
                role: Role::User,
                content: input.to_string(),
            },
        )
        .await?;

        let run = self
            .create_run(
                thread_id,
                CreateRunRequest {
                    assistant_id: assistant_id.to_string(),
                    ..Default::default()
                },
            )
            .await?;
        let run = self.poll_run(thread_id, &run.id, poll).await?;

        if run.status != RunStatus::Completed {
            let detail = run
                .last_error
                .map(|error| format!(": {}", error.message))
                .unwrap_or_default();
            return Err(ApiError::new(
                format!("run ended with status {}{detail}", run.status),
                "run_failed",
            ));
        }

        // Stale-message guard: the newest message must be the assistant's
        // reply to this run, not an older turn.
        let reply = self
            .latest_message(thread_id)
            .await?
            .filter(|message| {
                message.role == Role::Assistant
                    && message.run_id.as_deref() == Some(run.id.as_str())
            });
        let Some(reply) = reply else {
            return Err(ApiError::new("assistant did not reply to this turn", "no_reply"));
        };
        match reply.text() {
            Some(text) => Ok(text.clone()),
            None => Err(ApiError::new("assistant reply has no text content", "no_reply")),
        }
    }
}
