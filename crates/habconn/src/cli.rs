//! Clap derive structures for the `habconn` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use habconn_core::{ConnectionRequest, NetworkType};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// habconn -- pick the right way to reach your openHAB server
#[derive(Debug, Parser)]
#[command(
    name = "habconn",
    version,
    about = "Resolve and test connections to an openHAB server",
    long_about = "Decides between the local and the remote server address based on the\n\
        network you are on, then probes or queries the server through it.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "HABCONN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Current network: none, wifi, ethernet, vpn, mobile, bluetooth, unknown
    #[arg(long, short = 'n', env = "HABCONN_NETWORK", global = true)]
    pub network: Option<NetworkType>,

    /// Local server URL (overrides config)
    #[arg(long, global = true)]
    pub local: Option<String>,

    /// Remote server URL (overrides config)
    #[arg(long, global = true)]
    pub remote: Option<String>,

    /// Use the public demo server
    #[arg(long, global = true)]
    pub demo: bool,

    /// Output format
    #[arg(long, short = 'o', default_value = "plain", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "HABCONN_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "HABCONN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Plain,
    /// Pretty-printed JSON
    Json,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show which connection would be used
    #[command(alias = "r")]
    Resolve(ResolveArgs),

    /// Check whether the configured servers accept TCP connections
    Probe,

    /// Fetch a path through the resolved connection
    Get(GetArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Connection to resolve: any, local, remote, cloud
    #[arg(default_value = "any")]
    pub kind: ConnectionRequest,

    /// Only prefer the local server if it accepts a TCP connection
    #[arg(long)]
    pub reachable: bool,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Path relative to the server base URL (e.g., "rest/items")
    pub path: String,

    /// Connection to use: any, local, remote, cloud
    #[arg(long, default_value = "any")]
    pub kind: ConnectionRequest,

    /// Probe the local server before using it
    #[arg(long)]
    pub reachable: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Display the loaded configuration (passwords redacted)
    Show,

    /// Write a config file with the given server URLs
    Init {
        /// Local server URL
        #[arg(long)]
        local_url: Option<String>,

        /// Remote server URL
        #[arg(long)]
        remote_url: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Config key (e.g., "remote.url", "transport.timeout")
        key: String,

        /// Value to set
        value: String,
    },

    /// Store an endpoint password in the system keyring (read from stdin)
    SetPassword {
        /// Endpoint: local or remote
        endpoint: EndpointArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EndpointArg {
    Local,
    Remote,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
