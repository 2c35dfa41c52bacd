//! Clap derive structures for the `dnac` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// dnac -- drive a Cisco DNA Center controller from the command line
#[derive(Debug, Parser)]
#[command(
    name = "dnac",
    version,
    about = "Manage Cisco DNA Center from the command line",
    long_about = "A CLI for the Cisco DNA Center REST API.\n\n\
        Generic verbs (get, create, update, delete) work against any resource\n\
        path and wait for the controller's asynchronous tasks to finish.\n\
        The setting command reconciles group-scoped common settings idempotently.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "DNAC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller hostname or IP (overrides profile)
    #[arg(long, short = 'H', env = "DNAC_HOST", global = true)]
    pub host: Option<String>,

    /// Controller port
    #[arg(long, env = "DNAC_PORT", global = true)]
    pub port: Option<u16>,

    /// Login username
    #[arg(long, short = 'u', env = "DNAC_USERNAME", global = true)]
    pub username: Option<String>,

    /// Login password
    #[arg(long, env = "DNAC_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Login flow (token for current releases, cookie for older ones)
    #[arg(long, value_enum, global = true)]
    pub auth_flow: Option<AuthFlowArg>,

    /// Output format
    #[arg(long, short = 'o', env = "DNAC_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true, conflicts_with = "validate_certs")]
    pub insecure: bool,

    /// Validate TLS certificates against the system store
    #[arg(long, global = true)]
    pub validate_certs: bool,

    /// Use plain HTTP instead of HTTPS
    #[arg(long, global = true)]
    pub no_ssl: bool,

    /// Ignore HTTP(S)_PROXY environment variables
    #[arg(long, global = true)]
    pub no_proxy: bool,

    /// Request timeout in seconds
    #[arg(long, env = "DNAC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Report what would change without sending mutating requests
    #[arg(long, global = true)]
    pub check: bool,
}

// ── Shared Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON (default)
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Key/value table
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthFlowArg {
    /// POST /dna/system/api/v1/auth/token, X-Auth-Token header
    Token,
    /// GET /api/system/v1/auth/login, session cookie
    Cookie,
}

/// Group-scoped common settings the `setting` command can reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingKindArg {
    Dns,
    Dhcp,
    Ntp,
    Syslog,
    SnmpTrap,
    Banner,
    Timezone,
    Netflow,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Controller(ControllerCommand),

    /// Resolve a street address to country and coordinates
    Geocode(GeocodeArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Commands that run against a logged-in controller session.
#[derive(Debug, Subcommand)]
pub enum ControllerCommand {
    /// Fetch a resource path and print the controller's JSON
    Get {
        /// Resource path relative to the controller root (e.g. api/v1/network-device)
        path: String,
    },

    /// POST a JSON payload and wait for the resulting task
    Create(WriteArgs),

    /// PUT a JSON payload and wait for the resulting task
    Update(WriteArgs),

    /// DELETE a resource by id and wait for the resulting task
    #[command(alias = "rm")]
    Delete {
        /// Collection path (the id is appended)
        path: String,

        /// Resource id
        id: String,
    },

    /// Reconcile a group-scoped common setting
    #[command(alias = "set")]
    Setting(SettingArgs),

    /// Resolve a hierarchy group name to its id
    Group {
        /// Group name ("Global" resolves to -1)
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WriteArgs {
    /// Resource path relative to the controller root
    pub path: String,

    /// JSON payload, or @FILE to read it from a file (@- for stdin)
    #[arg(long, short = 'd', value_name = "JSON|@FILE")]
    pub data: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SETTINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SettingArgs {
    /// Which common setting to reconcile
    #[arg(value_enum)]
    pub kind: SettingKindArg,

    /// Desired value as JSON, or @FILE
    #[arg(
        long,
        value_name = "JSON|@FILE",
        required_unless_present = "absent"
    )]
    pub value: Option<String>,

    /// Hierarchy group the setting applies to
    #[arg(long, short = 'g', default_value = "Global")]
    pub group: String,

    /// Clear the setting instead of enforcing a value
    #[arg(long)]
    pub absent: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GEOCODE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GeocodeArgs {
    /// Street address to resolve
    pub address: String,

    /// Nominatim-compatible search service (defaults to OpenStreetMap)
    #[arg(long, env = "DNAC_GEOCODER_URL")]
    pub geocoder_url: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["dnac"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn controller_verbs_route_to_controller_commands() {
        assert!(matches!(
            parse(&["group", "Global"]),
            Command::Controller(ControllerCommand::Group { .. })
        ));
        assert!(matches!(
            parse(&["rm", "api/v1/site", "s1"]),
            Command::Controller(ControllerCommand::Delete { .. })
        ));
        assert!(matches!(
            parse(&["set", "ntp", "--absent"]),
            Command::Controller(ControllerCommand::Setting(_))
        ));
    }

    #[test]
    fn local_commands_stay_outside_controller_commands() {
        assert!(matches!(parse(&["geocode", "Berlin"]), Command::Geocode(_)));
        assert!(matches!(parse(&["config", "show"]), Command::Config(_)));
        assert!(matches!(parse(&["completions", "bash"]), Command::Completions(_)));
    }
}
