//! Shared configuration for the dnac CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `dnac_api::ControllerConfig`. The CLI layers its
//! flag overrides on top of what this crate produces.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dnac_api::{AuthFlow, ControllerConfig, PollConfig, TlsMode};

/// Keyring service name under which profile passwords are stored.
pub const KEYRING_SERVICE: &str = "dnac";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub validate_certs: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Task wait budget; `0` waits indefinitely.
    #[serde(default = "default_task_timeout")]
    pub task_timeout_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            validate_certs: false,
            timeout: default_timeout(),
            poll_interval_secs: default_poll_interval(),
            task_timeout_secs: default_task_timeout(),
        }
    }
}

fn default_output() -> String {
    "json".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    2
}
fn default_task_timeout() -> u64 {
    300
}

/// A named controller profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Controller hostname or IP address.
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_true")]
    pub use_ssl: bool,

    #[serde(default = "default_true")]
    pub use_proxy: bool,

    /// Override the global certificate validation setting.
    pub validate_certs: Option<bool>,

    /// Path to a custom CA certificate (implies validation).
    pub ca_cert: Option<PathBuf>,

    /// Login flow: "token" or "cookie".
    #[serde(default = "default_auth_flow")]
    pub auth_flow: String,

    pub username: Option<String>,

    /// Password (plaintext, prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Profile {
    /// A profile pointing at `host` with every other field defaulted.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            use_ssl: true,
            use_proxy: true,
            validate_certs: None,
            ca_cert: None,
            auth_flow: default_auth_flow(),
            username: None,
            password: None,
            password_env: None,
            timeout: None,
        }
    }
}

fn default_port() -> u16 {
    443
}
fn default_true() -> bool {
    true
}
fn default_auth_flow() -> String {
    "token".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "dnac", "dnac").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("dnac");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit file path, overlaid with `DNAC_*` env vars.
///
/// Nested keys use a double underscore: `DNAC_DEFAULTS__TIMEOUT=60`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = base_figment(Toml::file(path)).merge(Env::prefixed("DNAC_").split("__"));
    Ok(figment.extract()?)
}

fn base_figment(file: figment::providers::Data<Toml>) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(file)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the username: profile value, then `DNAC_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var("DNAC_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the password from the credential chain (no CLI flag step).
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(pw) = std::env::var("DNAC_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

/// Parse a profile's `auth_flow` string.
pub fn parse_auth_flow(raw: &str) -> Result<AuthFlow, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "auth_flow".into(),
        reason: format!("expected 'token' or 'cookie', got '{raw}'"),
    })
}

/// Task polling settings from the global defaults.
pub fn poll_config(defaults: &Defaults) -> PollConfig {
    PollConfig {
        interval: Duration::from_secs(defaults.poll_interval_secs.max(1)),
        timeout: (defaults.task_timeout_secs > 0)
            .then(|| Duration::from_secs(defaults.task_timeout_secs)),
    }
}

/// TLS mode for a profile: custom CA wins, then the validation flag.
pub fn tls_mode(profile: &Profile, defaults: &Defaults) -> TlsMode {
    if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else if profile.validate_certs.unwrap_or(defaults.validate_certs) {
        TlsMode::System
    } else {
        TlsMode::DangerAcceptInvalid
    }
}

/// Build a `ControllerConfig` from a profile and already-resolved credentials.
///
/// Callers resolve credentials first (see [`resolve_username`] and
/// [`resolve_password`]) so that flag-supplied values can take priority.
pub fn controller_config(
    profile: &Profile,
    defaults: &Defaults,
    username: String,
    password: SecretString,
) -> Result<ControllerConfig, ConfigError> {
    let host = profile.host.trim();
    if host.is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }

    let mut config = ControllerConfig::new(host, username, password);
    config.port = profile.port;
    config.use_ssl = profile.use_ssl;
    config.use_proxy = profile.use_proxy;
    config.tls = tls_mode(profile, defaults);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.auth_flow = parse_auth_flow(&profile.auth_flow)?;
    config.poll = poll_config(defaults);
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "lab"

[defaults]
output = "yaml"
poll_interval_secs = 5
task_timeout_secs = 0

[profiles.lab]
host = "10.10.20.85"
username = "devnetuser"
password = "plain"
auth_flow = "cookie"
use_proxy = false

[profiles.prod]
host = "dnac.corp.example"
port = 8443
validate_certs = true
"#;

    fn parse(toml: &str) -> Config {
        base_figment(Toml::string(toml)).extract().unwrap()
    }

    #[test]
    fn profile_fields_default_when_omitted() {
        let cfg = parse(SAMPLE);
        let prod = &cfg.profiles["prod"];
        assert_eq!(prod.port, 8443);
        assert!(prod.use_ssl);
        assert!(prod.use_proxy);
        assert_eq!(prod.auth_flow, "token");
        assert_eq!(cfg.defaults.timeout, 30);
        assert_eq!(cfg.defaults.output, "yaml");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = base_figment(Toml::file(dir.path().join("absent.toml")))
            .extract::<Config>()
            .unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.defaults.task_timeout_secs, 300);
    }

    #[test]
    fn save_then_parse_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert("edge".into(), Profile::new("192.0.2.7"));
        save_config_to(&cfg, &path).unwrap();

        let reloaded = parse(&std::fs::read_to_string(&path).unwrap());
        assert_eq!(reloaded.profiles["edge"].host, "192.0.2.7");
    }

    #[test]
    fn zero_task_timeout_waits_indefinitely() {
        let cfg = parse(SAMPLE);
        let poll = poll_config(&cfg.defaults);
        assert_eq!(poll.interval, Duration::from_secs(5));
        assert_eq!(poll.timeout, None);
    }

    #[test]
    fn tls_mode_follows_profile_then_defaults() {
        let cfg = parse(SAMPLE);
        assert_eq!(
            tls_mode(&cfg.profiles["lab"], &cfg.defaults),
            TlsMode::DangerAcceptInvalid
        );
        assert_eq!(tls_mode(&cfg.profiles["prod"], &cfg.defaults), TlsMode::System);

        let mut pinned = Profile::new("h");
        pinned.ca_cert = Some(PathBuf::from("/etc/dnac/ca.pem"));
        assert!(matches!(tls_mode(&pinned, &cfg.defaults), TlsMode::CustomCa(_)));
    }

    #[test]
    fn auth_flow_parsing() {
        assert_eq!(parse_auth_flow("cookie").unwrap(), AuthFlow::Cookie);
        assert_eq!(parse_auth_flow("token").unwrap(), AuthFlow::Token);
        assert!(matches!(
            parse_auth_flow("saml"),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn controller_config_carries_profile_settings() {
        let cfg = parse(SAMPLE);
        let lab = controller_config(
            &cfg.profiles["lab"],
            &cfg.defaults,
            "devnetuser".into(),
            SecretString::from("pw".to_string()),
        )
        .unwrap();
        assert_eq!(lab.host, "10.10.20.85");
        assert_eq!(lab.auth_flow, AuthFlow::Cookie);
        assert!(!lab.use_proxy);
        assert_eq!(lab.timeout, Duration::from_secs(30));
        assert_eq!(lab.poll.timeout, None);
    }

    #[test]
    fn empty_host_is_rejected() {
        let err = controller_config(
            &Profile::new("  "),
            &Defaults::default(),
            "u".into(),
            SecretString::from("p".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "host"));
    }

    #[test]
    fn plaintext_password_is_last_resort() {
        let mut profile = Profile::new("h");
        profile.password = Some("from-file".into());
        profile.password_env = Some("DNAC_TEST_UNSET_PASSWORD_VAR".into());
        // Only meaningful when neither DNAC_PASSWORD nor a keyring entry exists.
        if std::env::var("DNAC_PASSWORD").is_err() {
            let resolved = resolve_password(&profile, "dnac-config-test-profile").unwrap();
            assert_eq!(resolved.expose_secret(), "from-file");
        }
    }
}
