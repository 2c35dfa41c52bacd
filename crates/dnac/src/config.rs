//! CLI configuration: a thin wrapper around `dnac_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--host, --password, etc.).

use std::time::Duration;

use secrecy::SecretString;

use dnac_api::{AuthFlow, ControllerConfig, TlsMode};

use crate::cli::{AuthFlowArg, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use dnac_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Output format: flag, then the config default, then JSON.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.unwrap_or(match config.defaults.output.as_str() {
        "json-compact" => OutputFormat::JsonCompact,
        "yaml" => OutputFormat::Yaml,
        "table" => OutputFormat::Table,
        _ => OutputFormat::Json,
    })
}

/// Build a `ControllerConfig` from the config file, profile, and CLI overrides.
pub fn build_controller_config(global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, global, &cfg.defaults);
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    // No profile: build from CLI flags / env vars alone
    let host = global.host.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let (Some(username), Some(password)) = (&global.username, &global.password) else {
        return Err(CliError::NoCredentials {
            profile: profile_name,
        });
    };

    let profile = Profile::new(host);
    let mut config = dnac_config::controller_config(
        &profile,
        &cfg.defaults,
        username.clone(),
        SecretString::from(password.clone()),
    )?;
    apply_overrides(&mut config, global);
    Ok(config)
}

/// Translate a `Profile` + global flags into a `ControllerConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    defaults: &Defaults,
) -> Result<ControllerConfig, CliError> {
    // 1. Credentials (flag > env > keyring > plaintext)
    let username = match global.username {
        Some(ref user) => user.clone(),
        None => dnac_config::resolve_username(profile, profile_name)?,
    };
    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => dnac_config::resolve_password(profile, profile_name)?,
    };

    // 2. Host (flag > profile)
    let mut profile = profile.clone();
    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }

    // 3. Remaining connection settings
    let mut config = dnac_config::controller_config(&profile, defaults, username, password)?;
    apply_overrides(&mut config, global);
    Ok(config)
}

/// Apply connection flag overrides on top of a resolved config.
fn apply_overrides(config: &mut ControllerConfig, global: &GlobalOpts) {
    if let Some(port) = global.port {
        config.port = port;
    }
    if global.no_ssl {
        config.use_ssl = false;
    }
    if global.no_proxy {
        config.use_proxy = false;
    }
    if global.insecure {
        config.tls = TlsMode::DangerAcceptInvalid;
    } else if global.validate_certs && config.tls == TlsMode::DangerAcceptInvalid {
        config.tls = TlsMode::System;
    }
    if let Some(flow) = global.auth_flow {
        config.auth_flow = match flow {
            AuthFlowArg::Token => AuthFlow::Token,
            AuthFlowArg::Cookie => AuthFlow::Cookie,
        };
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    config.check_mode = global.check;
}

pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}
