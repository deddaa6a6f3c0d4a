//! Wrapper configuration (`$SNAP_DATA/args/wrappers.toml`).
//!
//! All keys are optional. A missing file is not an error: every field falls
//! back to the stock snap layout.

use crate::core::error::WrapperError;
use crate::core::snap::SnapEnv;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_RETRY_DELAY_MS: u64 = 2000;
pub const DEFAULT_NODE_READY_TOKEN: &str = "Ready";
pub const DEFAULT_CORE_SERVICE: &str = "service/kubernetes";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Architecture tag override (`amd64`, `arm64`).
    pub arch: Option<String>,
    pub paths: PathsConfig,
    pub readiness: ReadinessConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub actions_dir: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub kubectl: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadinessConfig {
    /// Pause after a probe error before sampling again.
    pub retry_delay_ms: u64,
    /// Substring of `kubectl get nodes` output that marks a ready node.
    pub node_ready_token: String,
    /// Substring of `kubectl get all` output that marks the API service.
    pub core_service: String,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            node_ready_token: DEFAULT_NODE_READY_TOKEN.to_string(),
            core_service: DEFAULT_CORE_SERVICE.to_string(),
        }
    }
}

impl ReadinessConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Config {
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, WrapperError> {
        toml::from_str(content).map_err(|source| WrapperError::ConfigError {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given, otherwise the snap default location.
    /// An explicitly named file must exist; the default one may be absent.
    pub fn load(explicit: Option<&Path>, snap: &SnapEnv) -> Result<Self, WrapperError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let default = snap.default_config();
                if !default.exists() {
                    return Ok(Config::default());
                }
                default
            }
        };
        let content = fs::read_to_string(&path).map_err(WrapperError::IoError)?;
        Self::from_toml_str(&content, &path)
    }

    pub fn actions_dir(&self, snap: &SnapEnv) -> PathBuf {
        self.paths
            .actions_dir
            .clone()
            .unwrap_or_else(|| snap.actions_dir())
    }

    pub fn catalog_path(&self, snap: &SnapEnv) -> PathBuf {
        self.paths
            .catalog
            .clone()
            .unwrap_or_else(|| snap.addon_catalog())
    }

    pub fn kubectl(&self) -> PathBuf {
        self.paths
            .kubectl
            .clone()
            .unwrap_or_else(|| PathBuf::from("kubectl"))
    }
}
