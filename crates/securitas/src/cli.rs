//! Clap derive structures for the `securitas` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use securitas_api::{ApiFlavor, ArmMode};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// securitas -- control Securitas Direct alarm panels from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "securitas",
    version,
    about = "Check and control Securitas Direct alarm panels from the command line",
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
pub struct GlobalOpts {
    /// API base URL
    #[arg(
        long,
        short = 'e',
        env = "SECURITAS_ENDPOINT",
        default_value = securitas_api::DEFAULT_BASE_URL,
        global = true
    )]
    pub endpoint: String,

    /// Country tag sent with logins (e.g. GB, ES, IT)
    #[arg(long, env = "SECURITAS_COUNTRY", default_value = "GB", global = true)]
    pub country: String,

    /// Request shape understood by the endpoint
    #[arg(long, env = "SECURITAS_FLAVOR", default_value = "graphql", global = true)]
    pub flavor: FlavorArg,

    /// Account username (overrides the config file)
    #[arg(long, short = 'u', env = "SECURITAS_USERNAME", global = true)]
    pub username: Option<String>,

    /// Account password (overrides the config file)
    #[arg(long, env = "SECURITAS_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SECURITAS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SECURITAS_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FlavorArg {
    /// Single GraphQL endpoint
    Graphql,
    /// Verb + path per operation
    Rest,
}

impl From<FlavorArg> for ApiFlavor {
    fn from(arg: FlavorArg) -> Self {
        match arg {
            FlavorArg::Graphql => Self::GraphQl,
            FlavorArg::Rest => Self::Rest,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ArmModeArg {
    /// Arm every zone
    #[default]
    Full,
    /// Night mode
    Night,
    /// Perimeter / day mode
    Partial,
}

impl From<ArmModeArg> for ArmMode {
    fn from(arg: ArmModeArg) -> Self {
        match arg {
            ArmModeArg::Full => Self::Full,
            ArmModeArg::Night => Self::Night,
            ArmModeArg::Partial => Self::Partial,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the credentials
    Login,

    /// Forget the session and clear stored credentials
    Logout,

    /// List installations on the account
    #[command(alias = "inst", alias = "ls")]
    Installations,

    /// Show the alarm status of an installation
    #[command(alias = "st")]
    Status(TargetArgs),

    /// Arm an installation
    Arm(ArmArgs),

    /// Disarm an installation
    Disarm(TargetArgs),

    /// Inspect or reset the config file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Installation number (defaults to the stored selection)
    pub installation: Option<String>,
}

#[derive(Debug, Args)]
pub struct ArmArgs {
    /// Installation number (defaults to the stored selection)
    pub installation: Option<String>,

    /// Arm mode
    #[arg(long, short = 'm', default_value = "full")]
    pub mode: ArmModeArg,

    /// Current panel status code forwarded with the request
    #[arg(long, default_value = "")]
    pub current_status: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the stored configuration (password hidden)
    Show,
    /// Reset the config file to an empty object
    Clear,
    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
