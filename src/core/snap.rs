//! Snap layout for the MicroK8s wrappers.
//!
//! MicroK8s ships as a snap with two roots:
//! - `$SNAP`: the read-only install tree (actions, addon catalog, helper binaries)
//! - `$SNAP_DATA`: writable state (credentials, lock files, wrapper config)
//!
//! Every path the wrappers touch is derived from a [`SnapEnv`] so that tests and
//! alternate installs can point the whole tool at a different tree.

use crate::core::error::WrapperError;
use std::path::PathBuf;

pub const DEFAULT_SNAP: &str = "/snap/microk8s/current";
pub const DEFAULT_SNAP_DATA: &str = "/var/snap/microk8s/current";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapEnv {
    /// Install tree (`$SNAP`)
    pub snap: PathBuf,
    /// Writable state (`$SNAP_DATA`)
    pub snap_data: PathBuf,
}

impl SnapEnv {
    pub fn new(snap: impl Into<PathBuf>, snap_data: impl Into<PathBuf>) -> Self {
        Self {
            snap: snap.into(),
            snap_data: snap_data.into(),
        }
    }

    /// Reads `$SNAP` and `$SNAP_DATA`, falling back to the stock install paths.
    pub fn from_env() -> Self {
        let snap = std::env::var_os("SNAP")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAP));
        let snap_data = std::env::var_os("SNAP_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAP_DATA));
        Self { snap, snap_data }
    }

    pub fn client_config(&self) -> PathBuf {
        self.snap_data.join("credentials").join("client.config")
    }

    /// `--kubeconfig=<client.config>` as passed to every kubectl call.
    pub fn kubeconfig_arg(&self) -> String {
        format!("--kubeconfig={}", self.client_config().display())
    }

    pub fn stopped_lock(&self) -> PathBuf {
        self.snap_data.join("var/lock/stopped.lock")
    }

    pub fn clustered_lock(&self) -> PathBuf {
        self.snap_data.join("var/lock/clustered.lock")
    }

    pub fn actions_dir(&self) -> PathBuf {
        self.snap.join("microk8s-resources").join("actions")
    }

    pub fn addon_catalog(&self) -> PathBuf {
        self.snap.join("addon-lists.yaml")
    }

    pub fn default_config(&self) -> PathBuf {
        self.snap_data.join("args").join("wrappers.toml")
    }
}

/// Maps a machine name to the architecture tag used by the addon catalog.
pub fn arch_tag(machine: &str) -> Result<&'static str, WrapperError> {
    match machine {
        "aarch64" => Ok("arm64"),
        "x86_64" => Ok("amd64"),
        other => Err(WrapperError::UnsupportedArch(other.to_string())),
    }
}

/// Architecture tag of the running binary.
pub fn current_arch() -> Result<&'static str, WrapperError> {
    arch_tag(std::env::consts::ARCH)
}
