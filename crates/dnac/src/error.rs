//! CLI error types with miette diagnostics.
//!
//! Maps `dnac_api::Error` and `dnac_config::ConfigError` into user-facing
//! errors with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const TASK_FAILED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(dnac::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             Try --no-proxy if an HTTP proxy is configured, or --no-ssl for plain HTTP."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {reason}")]
    #[diagnostic(
        code(dnac::tls_error),
        help(
            "Controllers usually ship with self-signed certificates.\n\
             Use --insecure (-k) to accept them, or configure ca_cert in your profile."
        )
    )]
    TlsError { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(dnac::auth_failed),
        help(
            "Verify the username and password, and the login flow (--auth-flow).\n\
             Store a password with: dnac config set-password"
        )
    )]
    AuthFailed { message: String, body: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(dnac::no_credentials),
        help(
            "Configure credentials with: dnac config init\n\
             Or pass --username/--password (DNAC_USERNAME / DNAC_PASSWORD)."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(dnac::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Controller API error (HTTP {status})")]
    #[diagnostic(code(dnac::api_error), help("Controller response: {body}"))]
    ApiError { status: u16, body: String },

    #[error("Unexpected controller response: {message}")]
    #[diagnostic(code(dnac::bad_response), help("Controller response: {body}"))]
    BadResponse { message: String, body: String },

    // ── Tasks ────────────────────────────────────────────────────────
    #[error("Task {task_id} failed: {reason}")]
    #[diagnostic(code(dnac::task_failed))]
    TaskFailed { task_id: String, reason: String },

    #[error("Task {task_id} still running after {seconds}s")]
    #[diagnostic(
        code(dnac::task_timeout),
        help(
            "The task may still finish on the controller.\n\
             Check with: dnac get api/v1/task/{task_id}\n\
             Raise the wait budget with defaults.task_timeout_secs in the config."
        )
    )]
    TaskTimeout { task_id: String, seconds: u64 },

    #[error("Request timed out")]
    #[diagnostic(
        code(dnac::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(dnac::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(dnac::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: dnac config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No controller configured")]
    #[diagnostic(
        code(dnac::no_config),
        help(
            "Create a profile with: dnac config init (expected at {path})\n\
             Or pass --host with --username/--password."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(dnac::config))]
    Config(Box<dnac_config::ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(dnac::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(dnac::json), help("Check the JSON text or file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::TaskTimeout { .. } | Self::Timeout => exit_code::TIMEOUT,
            Self::TaskFailed { .. } => exit_code::TASK_FAILED,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::NoConfig { .. }
            | Self::Json(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── dnac_api::Error → CliError mapping ───────────────────────────────

impl From<dnac_api::Error> for CliError {
    fn from(err: dnac_api::Error) -> Self {
        use dnac_api::Error as E;

        match err {
            E::Connection(e) if e.is_timeout() => CliError::Timeout,
            E::Connection(e) => CliError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string),
                source: Box::new(e),
            },
            E::Tls(reason) => CliError::TlsError { reason },
            E::InvalidUrl(e) => CliError::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },
            E::Authentication { message, body } => CliError::AuthFailed { message, body },
            E::Api { status: 401, body } => CliError::AuthFailed {
                message: "session token rejected".into(),
                body,
            },
            E::Api { status, body } => CliError::ApiError { status, body },
            E::Payload(e) => CliError::Json(e),
            E::Deserialization { message, body } => CliError::BadResponse { message, body },
            E::TaskFailed {
                task_id, reason, ..
            } => CliError::TaskFailed { task_id, reason },
            E::TaskTimeout {
                task_id,
                waited_secs,
            } => CliError::TaskTimeout {
                task_id,
                seconds: waited_secs,
            },
            E::GroupNotFound { name } => CliError::NotFound {
                resource_type: "group".into(),
                identifier: name,
            },
            E::Geocode { address } => CliError::NotFound {
                resource_type: "address".into(),
                identifier: address,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<dnac_config::ConfigError> for CliError {
    fn from(err: dnac_config::ConfigError) -> Self {
        use dnac_config::ConfigError as C;

        match err {
            C::NoCredentials { profile } => CliError::NoCredentials { profile },
            C::Validation { field, reason } => CliError::Validation { field, reason },
            C::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            C::Io(e) => CliError::Io(e),
            other => CliError::Config(Box::new(other)),
        }
    }
}
