//! CLI struct definitions for the MicroK8s wrappers.
//!
//! All clap-derived types live here. Dispatch logic lives in `lib.rs`.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "microk8s",
    version = env!("CARGO_PKG_VERSION"),
    about = "Enable, disable and inspect MicroK8s addons"
)]
pub struct Cli {
    /// Wrapper config file (defaults to $SNAP_DATA/args/wrappers.toml).
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    /// Increase log verbosity (-v, -vv, -vvv). RUST_LOG takes precedence.
    #[clap(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Disable diagnostic logging.
    #[clap(short, long, global = true)]
    pub quiet: bool,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Enable one or more addons
    Enable(XableCli),
    /// Disable one or more addons
    Disable(XableCli),
    /// Report cluster readiness and addon state
    Status(StatusCli),
    /// List the addons available for this architecture
    Addons(AddonsCli),
}

#[derive(clap::Args, Debug)]
pub struct XableCli {
    /// Architecture tag used to read the addon catalog (defaults to the host).
    #[clap(long)]
    pub arch: Option<String>,
    /// Skip the permission, running and cluster-lock checks.
    #[clap(long)]
    pub skip_preflight: bool,
    /// `addon[:value]...` or `addon [--flag ...]`. Everything after the first
    /// addon is passed through untouched, so options go before it.
    #[clap(
        required = true,
        value_name = "ADDON",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub addons: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct StatusCli {
    /// Block until the cluster reports ready.
    #[clap(long)]
    pub wait_ready: bool,
    /// Seconds to wait with --wait-ready; 0 waits forever.
    #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
    pub timeout: i64,
    /// Architecture tag used to read the addon catalog (defaults to the host).
    #[clap(long)]
    pub arch: Option<String>,
    /// Output format: 'text' or 'json'.
    #[clap(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}

#[derive(clap::Args, Debug)]
pub struct AddonsCli {
    /// Architecture tag (defaults to the host).
    #[clap(long)]
    pub arch: Option<String>,
    /// Output format: 'text' or 'json'.
    #[clap(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}
