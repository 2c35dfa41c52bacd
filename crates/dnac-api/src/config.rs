// ── Runtime connection configuration ──
//
// Describes how to reach and authenticate against one controller. Carries
// credential data and connection tuning but never touches disk; the CLI
// (via dnac-config) constructs a `ControllerConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::auth::AuthFlow;
use crate::error::Error;
use crate::task::PollConfig;
use crate::transport::{TlsMode, TransportConfig};

/// Configuration for connecting to a single controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller hostname or IP address.
    pub host: String,
    pub port: u16,
    /// `https` when set, plain `http` otherwise.
    pub use_ssl: bool,
    pub use_proxy: bool,
    pub tls: TlsMode,
    /// Per-request timeout.
    pub timeout: Duration,
    pub auth_flow: AuthFlow,
    pub username: String,
    pub password: SecretString,
    /// Task polling cadence and budget.
    pub poll: PollConfig,
    /// Report what would change without sending mutating requests.
    pub check_mode: bool,
}

impl ControllerConfig {
    /// A config with controller defaults: port 443, SSL, proxy honoured,
    /// self-signed certificates accepted, 30s timeout, token login.
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            port: 443,
            use_ssl: true,
            use_proxy: true,
            tls: TlsMode::default(),
            timeout: Duration::from_secs(30),
            auth_flow: AuthFlow::default(),
            username: username.into(),
            password,
            poll: PollConfig::default(),
            check_mode: false,
        }
    }

    /// The controller root URL, e.g. `https://10.0.0.5:443/`.
    pub fn base_url(&self) -> Result<Url, Error> {
        let scheme = if self.use_ssl { "https" } else { "http" };
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        Ok(Url::parse(&format!("{scheme}://{host}:{}/", self.port))?)
    }

    /// Transport settings shared by the login request and the session.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
            use_proxy: self.use_proxy,
        }
    }
}
