//! MicroK8s wrappers: addon enable/disable and cluster readiness.
//!
//! # Commands
//!
//! ```bash
//! # Several addons at once, optional colon values, run in the order given
//! microk8s enable dns:1.1.1.1 storage
//!
//! # One addon with unix-style flags forwarded to its script
//! microk8s enable ingress --default-ssl-certificate=ns/cert
//!
//! # Wait up to 60 seconds for the cluster, then show addon state
//! microk8s status --wait-ready --timeout 60
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: collaborators shared by every command (errors, process
//!   execution, snap layout, config, output rendering)
//! - [`plugins`]: addon resolution, idempotency, dispatch, readiness polling,
//!   catalog and cluster inspection

pub mod cli;
pub mod core;
pub mod plugins;

use cli::{AddonsCli, Cli, Command, StatusCli, XableCli};
use core::config::Config;
use core::error::WrapperError;
use core::exec::{ExecEnv, SystemRunner};
use core::snap::{self, SnapEnv};
use plugins::actions::{Action, ActionRegistry};
use plugins::catalog::{Addon, AddonCatalog};
use plugins::cluster::{self, Kubectl};
use plugins::readiness::ReadinessPoller;
use plugins::status::{StatusReport, render_catalog};
use plugins::xable::xable;
use std::collections::BTreeSet;
use std::io;
use tracing::warn;

/// Runs `cli` and returns the process exit code.
pub fn run(cli: Cli) -> Result<i32, WrapperError> {
    let snap = SnapEnv::from_env();
    let config = Config::load(cli.config.as_deref(), &snap)?;
    let runner = SystemRunner::new(ExecEnv::from_current().with_search_dir(snap.snap.clone()));

    match cli.command {
        Command::Enable(args) => run_xable(Action::Enable, args, &snap, &config, &runner),
        Command::Disable(args) => run_xable(Action::Disable, args, &snap, &config, &runner),
        Command::Status(args) => run_status(args, &snap, &config, &runner),
        Command::Addons(args) => run_addons(args, &snap, &config),
    }
}

fn resolve_arch(flag: Option<&str>, config: &Config) -> Result<String, WrapperError> {
    match flag.or(config.arch.as_deref()) {
        Some(arch) => Ok(arch.to_string()),
        None => snap::current_arch().map(str::to_string),
    }
}

fn load_available(
    arch_flag: Option<&str>,
    snap: &SnapEnv,
    config: &Config,
) -> Result<Vec<Addon>, WrapperError> {
    let arch = resolve_arch(arch_flag, config)?;
    let catalog = AddonCatalog::load(&config.catalog_path(snap))?;
    Ok(catalog.available(&arch))
}

fn run_xable(
    action: Action,
    args: XableCli,
    snap: &SnapEnv,
    config: &Config,
    runner: &SystemRunner,
) -> Result<i32, WrapperError> {
    if !args.skip_preflight {
        cluster::preflight(snap)?;
    }
    let registry = ActionRegistry::scan(&config.actions_dir(snap))?;

    // Catalog problems only cost the idempotency check; the scripts still run.
    let available = load_available(args.arch.as_deref(), snap, config).unwrap_or_else(|e| {
        warn!(error = %e, "addon catalog unavailable, skipping state inspection");
        Vec::new()
    });
    let already = if available.is_empty() {
        BTreeSet::new()
    } else {
        let kubectl = Kubectl::new(runner, config.kubectl(), snap);
        cluster::already_xabled(action, &kubectl, &available)
    };

    let mut stdout = io::stdout().lock();
    let outcome = xable(action, &args.addons, &registry, &already, runner, &mut stdout)?;
    Ok(outcome.exit_code())
}

fn run_status(
    args: StatusCli,
    snap: &SnapEnv,
    config: &Config,
    runner: &SystemRunner,
) -> Result<i32, WrapperError> {
    let kubectl = Kubectl::new(runner, config.kubectl(), snap);
    let poller = ReadinessPoller::new(&kubectl, &config.readiness);
    let running = if args.wait_ready {
        poller.wait_for_ready(args.timeout)
    } else {
        poller.is_ready()
    };

    let report = if running {
        let available = load_available(args.arch.as_deref(), snap, config)?;
        let enabled = cluster::enabled_addons(&kubectl, &available)?;
        StatusReport::new(true, &available, &enabled)
    } else {
        StatusReport::new(false, &[], &BTreeSet::new())
    };

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(if running { 0 } else { 1 })
}

fn run_addons(args: AddonsCli, snap: &SnapEnv, config: &Config) -> Result<i32, WrapperError> {
    let available = load_available(args.arch.as_deref(), snap, config)?;
    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&available)?);
    } else {
        print!("{}", render_catalog(&available));
    }
    Ok(0)
}
