use thiserror::Error;

/// Top-level error type for the `dnac-api` crate.
///
/// Every fatal condition of a controller call lands here with the raw
/// controller payload attached, so callers can show the controller's own
/// error text. Nothing in this crate retries; the task poller re-checks a
/// pending task, which is not a retry of a failed call.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The controller could not be reached (DNS, refused connection, TLS handshake).
    #[error("Failed to connect to controller: {0}")]
    Connection(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected, or the login response lacked the expected credential.
    #[error("Authentication failed: {message}")]
    Authentication { message: String, body: String },

    // ── Resource operations ─────────────────────────────────────────
    /// Non-2xx response to a resource operation.
    #[error("Controller API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// Caller payload could not be serialized to JSON.
    #[error("Failed to convert payload to JSON: {0}")]
    Payload(#[source] serde_json::Error),

    /// 2xx response whose body could not be parsed where JSON was required.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Asynchronous tasks ──────────────────────────────────────────
    /// The controller-side task reached a terminal failure state.
    #[error("Task {task_id} failed to complete: {reason}")]
    TaskFailed {
        task_id: String,
        reason: String,
        payload: serde_json::Value,
    },

    /// The task did not reach a terminal state within the poll budget.
    #[error("Task {task_id} did not complete within {waited_secs}s")]
    TaskTimeout { task_id: String, waited_secs: u64 },

    // ── Lookups ─────────────────────────────────────────────────────
    /// No single hierarchy group matches the requested name.
    #[error("Unable to locate group '{name}'")]
    GroupNotFound { name: String },

    /// The geocoding service returned no location for the address.
    #[error("Could not resolve address to latitude/longitude: {address}")]
    Geocode { address: String },
}

impl Error {
    /// Returns `true` if the controller rejected the session token,
    /// meaning a fresh login might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::Api { status: 401, .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Api { status: 404, .. } | Self::GroupNotFound { .. }
        )
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The raw controller payload attached to the error, for diagnostics.
    pub fn raw_payload(&self) -> Option<String> {
        match self {
            Self::Authentication { body, .. }
            | Self::Api { body, .. }
            | Self::Deserialization { body, .. } => Some(body.clone()),
            Self::TaskFailed { payload, .. } => Some(payload.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_404_is_not_found() {
        let err = Error::Api {
            status: 404,
            body: "missing".into(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.raw_payload().as_deref(), Some("missing"));
    }

    #[test]
    fn unauthorized_api_error_counts_as_expired_session() {
        let err = Error::Api {
            status: 401,
            body: String::new(),
        };
        assert!(err.is_auth_expired());
        assert!(!err.is_not_found());
    }

    #[test]
    fn lookup_errors_carry_no_status() {
        let err = Error::GroupNotFound {
            name: "Campus".into(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), None);
        assert_eq!(err.raw_payload(), None);
    }
}
