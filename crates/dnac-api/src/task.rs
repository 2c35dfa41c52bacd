// Task poller
//
// Mutating calls may enqueue a controller-side job and answer with its id.
// The poller re-reads the job's status endpoint at a fixed interval until a
// completion timestamp appears, then classifies the terminal payload as
// success or failure. The optional budget turns a job that never finishes
// into `Error::TaskTimeout` instead of an endless loop.

use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, trace};
use url::Url;

use crate::client::{DnacClient, resource_url};
use crate::error::Error;

/// Fixed-interval polling cadence with an optional overall budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between two status fetches.
    pub interval: Duration,
    /// Maximum time to wait for a terminal state. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Some(Duration::from_secs(300)),
        }
    }
}

/// Poller state. `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Running,
    Succeeded,
    Failed,
}

/// Which asynchronous-job API a resource path reports through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskNamespace {
    /// `api/v1/...` resources: `{"response": {"taskId": ...}}`, polled at `api/v1/task/{id}`.
    Task,
    /// `dna/intent/...` resources: `{"executionId": ...}`, polled at the
    /// execution-status endpoint.
    Intent,
}

impl TaskNamespace {
    /// Select the namespace from the resource path.
    pub fn for_path(path: &str) -> Self {
        if path.contains("intent") {
            Self::Intent
        } else {
            Self::Task
        }
    }

    /// Extract the job id from a 2xx mutating response, if it enqueued one.
    pub fn task_id(self, body: &Value) -> Option<String> {
        let id = match self {
            Self::Task => body.get("response").and_then(|r| r.get("taskId")),
            Self::Intent => body.get("executionId"),
        };
        id.and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(String::from)
    }

    /// Status endpoint for a job, relative to the controller root.
    pub fn status_path(self, task_id: &str) -> String {
        match self {
            Self::Task => format!("api/v1/task/{task_id}"),
            Self::Intent => {
                format!("api/dnacaap/v1/dnacaap/management/execution-status/{task_id}")
            }
        }
    }

    /// Unwrap the status document from the endpoint's response body.
    fn status_document(self, body: Value) -> Option<Value> {
        match self {
            Self::Task => match body {
                Value::Object(mut map) => map.remove("response").filter(Value::is_object),
                _ => None,
            },
            Self::Intent => body.is_object().then_some(body),
        }
    }

    /// Classify a status document. Every document with a completion
    /// timestamp is exactly one of `Succeeded` or `Failed`.
    pub fn classify(self, status: &Value) -> TaskState {
        let finished = status.get("endTime").is_some_and(|t| !t.is_null());
        if !finished {
            return TaskState::Running;
        }

        let failed = match self {
            Self::Task => status
                .get("isError")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            Self::Intent => status.get("status").and_then(Value::as_str) != Some("SUCCESS"),
        };

        if failed {
            TaskState::Failed
        } else {
            TaskState::Succeeded
        }
    }

    /// Best-effort failure description from a terminal status document.
    pub fn failure_reason(self, status: &Value) -> String {
        let fields: &[&str] = match self {
            Self::Task => &["failureReason", "progress"],
            Self::Intent => &["bapiError", "status"],
        };
        fields
            .iter()
            .find_map(|f| {
                status
                    .get(*f)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or("no failure reason reported")
            .to_owned()
    }
}

impl DnacClient {
    /// Block until the job reaches a terminal state.
    ///
    /// Returns the terminal status document on success; a failed job yields
    /// `Error::TaskFailed` carrying that document.
    pub async fn wait_for_task(
        &self,
        namespace: TaskNamespace,
        task_id: &str,
    ) -> Result<Value, Error> {
        let url = resource_url(
            self.session().base_url(),
            &namespace.status_path(task_id),
            None,
        )?;
        let poll = self.poll_config();
        let started = Instant::now();
        let mut polls: u32 = 0;

        loop {
            polls += 1;
            let status = self.fetch_task_status(namespace, url.clone()).await?;

            match namespace.classify(&status) {
                TaskState::Succeeded => {
                    debug!(task_id, polls, "task completed");
                    return Ok(status);
                }
                TaskState::Failed => {
                    debug!(task_id, polls, "task failed");
                    return Err(Error::TaskFailed {
                        task_id: task_id.to_owned(),
                        reason: namespace.failure_reason(&status),
                        payload: status,
                    });
                }
                TaskState::Running => {
                    let elapsed = started.elapsed();
                    if poll.timeout.is_some_and(|limit| elapsed + poll.interval > limit) {
                        return Err(Error::TaskTimeout {
                            task_id: task_id.to_owned(),
                            waited_secs: elapsed.as_secs(),
                        });
                    }
                    trace!(task_id, polls, "task still running");
                    tokio::time::sleep(poll.interval).await;
                }
            }
        }
    }

    async fn fetch_task_status(&self, namespace: TaskNamespace, url: Url) -> Result<Value, Error> {
        trace!("GET {url}");

        let resp = self.session().http().get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: Value = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("task status: {e}"),
            body: body.clone(),
        })?;

        namespace
            .status_document(parsed)
            .ok_or_else(|| Error::Deserialization {
                message: "task status response has no status document".into(),
                body,
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn namespace_follows_path() {
        assert_eq!(
            TaskNamespace::for_path("dna/intent/api/v1/site"),
            TaskNamespace::Intent
        );
        assert_eq!(
            TaskNamespace::for_path("api/v1/commonsetting/global/-1"),
            TaskNamespace::Task
        );
    }

    #[test]
    fn task_ids_live_in_namespace_specific_fields() {
        let task = json!({"response": {"taskId": "t1", "url": "/api/v1/task/t1"}});
        let intent = json!({"executionId": "e1", "executionStatusUrl": "/x"});

        assert_eq!(TaskNamespace::Task.task_id(&task).as_deref(), Some("t1"));
        assert_eq!(TaskNamespace::Intent.task_id(&intent).as_deref(), Some("e1"));
        assert_eq!(TaskNamespace::Task.task_id(&intent), None);
        assert_eq!(TaskNamespace::Intent.task_id(&task), None);
    }

    #[test]
    fn task_classification() {
        let ns = TaskNamespace::Task;
        assert_eq!(ns.classify(&json!({"taskId": "t1"})), TaskState::Running);
        assert_eq!(
            ns.classify(&json!({"taskId": "t1", "endTime": null})),
            TaskState::Running
        );
        assert_eq!(
            ns.classify(&json!({"endTime": 123, "isError": false})),
            TaskState::Succeeded
        );
        assert_eq!(ns.classify(&json!({"endTime": 123})), TaskState::Succeeded);
        assert_eq!(
            ns.classify(&json!({"endTime": 123, "isError": true})),
            TaskState::Failed
        );
    }

    #[test]
    fn intent_classification_treats_unknown_terminal_status_as_failure() {
        let ns = TaskNamespace::Intent;
        assert_eq!(
            ns.classify(&json!({"status": "IN_PROGRESS"})),
            TaskState::Running
        );
        assert_eq!(
            ns.classify(&json!({"status": "SUCCESS", "endTime": 1})),
            TaskState::Succeeded
        );
        assert_eq!(
            ns.classify(&json!({"status": "FAILURE", "endTime": 1})),
            TaskState::Failed
        );
        assert_eq!(
            ns.classify(&json!({"status": "CANCELLED", "endTime": 1})),
            TaskState::Failed
        );
    }

    #[test]
    fn failure_reason_prefers_explicit_fields() {
        let status = json!({"failureReason": "NCSP10250: duplicate", "progress": "failed"});
        assert_eq!(
            TaskNamespace::Task.failure_reason(&status),
            "NCSP10250: duplicate"
        );
        assert_eq!(
            TaskNamespace::Intent.failure_reason(&json!({})),
            "no failure reason reported"
        );
    }

    #[test]
    fn failure_reason_skips_empty_fields() {
        let status = json!({"failureReason": "", "progress": "Site name exists"});
        assert_eq!(TaskNamespace::Task.failure_reason(&status), "Site name exists");
        let status = json!({"bapiError": "", "status": "FAILURE"});
        assert_eq!(TaskNamespace::Intent.failure_reason(&status), "FAILURE");
    }

    #[test]
    fn status_document_unwraps_task_response() {
        let doc = TaskNamespace::Task.status_document(json!({"response": {"taskId": "t1"}}));
        assert_eq!(doc, Some(json!({"taskId": "t1"})));
        assert_eq!(TaskNamespace::Task.status_document(json!([])), None);
    }
}
