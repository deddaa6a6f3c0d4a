//! Cluster-facing collaborators: kubectl queries, preflight checks and
//! enabled-state inspection.

use crate::core::error::WrapperError;
use crate::core::exec::{ExecError, ProcessRunner};
use crate::core::snap::SnapEnv;
use crate::plugins::actions::Action;
use crate::plugins::catalog::Addon;
use crate::plugins::readiness::ReadinessProbe;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace<'a> {
    All,
    Named(&'a str),
}

pub struct Kubectl<'a> {
    runner: &'a dyn ProcessRunner,
    program: PathBuf,
    kubeconfig_arg: String,
}

impl<'a> Kubectl<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, program: PathBuf, snap: &SnapEnv) -> Self {
        Self {
            runner,
            program,
            kubeconfig_arg: snap.kubeconfig_arg(),
        }
    }

    pub fn get(&self, resource: &str, namespace: Namespace<'_>) -> Result<String, ExecError> {
        let mut args = vec![
            self.kubeconfig_arg.clone(),
            "get".to_string(),
            resource.to_string(),
        ];
        match namespace {
            Namespace::All => args.push("--all-namespaces".to_string()),
            Namespace::Named(ns) => {
                args.push("-n".to_string());
                args.push(ns.to_string());
            }
        }
        self.runner.capture(&self.program, &args)
    }

    pub fn clusterroles(&self) -> Result<String, ExecError> {
        let args = [
            self.kubeconfig_arg.clone(),
            "get".to_string(),
            "clusterroles".to_string(),
            "--show-kind".to_string(),
            "--no-headers".to_string(),
        ];
        self.runner.capture(&self.program, &args)
    }
}

impl ReadinessProbe for Kubectl<'_> {
    fn services(&self) -> Result<String, ExecError> {
        self.get("all", Namespace::All)
    }

    fn nodes(&self) -> Result<String, ExecError> {
        self.get("nodes", Namespace::All)
    }
}

/// Names of `addons` whose `check_status` appears in the cluster listing.
pub fn enabled_addons(kubectl: &Kubectl<'_>, addons: &[Addon]) -> Result<BTreeSet<String>, ExecError> {
    let listing = kubectl.get("all", Namespace::All)?;
    Ok(enabled_in_listing(&listing, addons))
}

pub fn enabled_in_listing(listing: &str, addons: &[Addon]) -> BTreeSet<String> {
    addons
        .iter()
        .filter(|a| {
            a.check_status
                .as_deref()
                .is_some_and(|marker| !marker.is_empty() && listing.contains(marker))
        })
        .map(|a| a.name.clone())
        .collect()
}

/// Addons already in the state `action` would put them in. For `enable` that
/// is the enabled set; for `disable` every known addon that is not enabled.
pub fn target_state_set(
    action: Action,
    addons: &[Addon],
    enabled: &BTreeSet<String>,
) -> BTreeSet<String> {
    match action {
        Action::Enable => enabled.clone(),
        Action::Disable => addons
            .iter()
            .map(|a| a.name.clone())
            .filter(|n| !enabled.contains(n))
            .collect(),
    }
}

/// Like [`target_state_set`] but queries the cluster. An unreachable cluster
/// yields an empty set, so every requested script runs.
pub fn already_xabled(action: Action, kubectl: &Kubectl<'_>, addons: &[Addon]) -> BTreeSet<String> {
    match enabled_addons(kubectl, addons) {
        Ok(enabled) => {
            debug!(?enabled, "inspected enabled addons");
            target_state_set(action, addons, &enabled)
        }
        Err(e) => {
            warn!(error = %e, "could not inspect addon state, assuming none are {}", action.past_tense());
            BTreeSet::new()
        }
    }
}

/// The kubeconfig must be readable by the calling user.
pub fn ensure_permission(snap: &SnapEnv) -> Result<(), WrapperError> {
    if File::open(snap.client_config()).is_ok() {
        return Ok(());
    }
    let user = std::env::var("USER").unwrap_or_else(|_| "$USER".to_string());
    Err(WrapperError::PermissionDenied { user })
}

pub fn ensure_started(snap: &SnapEnv) -> Result<(), WrapperError> {
    if snap.stopped_lock().exists() {
        return Err(WrapperError::NotRunning);
    }
    Ok(())
}

pub fn ensure_not_clustered(snap: &SnapEnv) -> Result<(), WrapperError> {
    if snap.clustered_lock().exists() {
        return Err(WrapperError::ClusterLocked);
    }
    Ok(())
}

/// Checks run before any addon script.
pub fn preflight(snap: &SnapEnv) -> Result<(), WrapperError> {
    ensure_permission(snap)?;
    ensure_started(snap)?;
    ensure_not_clustered(snap)
}
