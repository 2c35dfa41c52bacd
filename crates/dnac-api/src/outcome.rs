use serde::Serialize;
use serde_json::Value;

/// Caller-visible record of one operation.
///
/// Built fresh per call. `previous`/`proposed` are only set by the settings
/// reconciler, which records what it read and what it wanted to write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    /// Whether the controller state was (or, in check mode, would be) changed.
    pub changed: bool,
    /// Human-readable summary.
    pub message: String,
    /// Raw controller payload: terminal task status or the synchronous body.
    pub response: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed: Option<Value>,
}

impl Outcome {
    pub fn changed(message: impl Into<String>) -> Self {
        Self::new(true, message)
    }

    pub fn unchanged(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }

    fn new(changed: bool, message: impl Into<String>) -> Self {
        Self {
            changed,
            message: message.into(),
            response: Value::Null,
            previous: None,
            proposed: None,
        }
    }

    pub fn with_response(mut self, response: Value) -> Self {
        self.response = response;
        self
    }

    /// Attach the stored and desired state that led to this outcome.
    pub fn with_diff(mut self, previous: Value, proposed: Value) -> Self {
        self.previous = Some(previous);
        self.proposed = Some(proposed);
        self
    }
}
