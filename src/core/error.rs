use crate::core::exec::ExecError;
use crate::plugins::actions::Action;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WrapperError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error(transparent)]
    ExecError(#[from] ExecError),
    #[error("Invalid addon catalog {path}: {source}")]
    CatalogError {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Invalid config {path}: {source}")]
    ConfigError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid glob pattern: {0}")]
    PatternError(#[from] glob::PatternError),
    #[error("Addon `{addon}` not found.")]
    NotFound {
        addon: String,
        available: Vec<String>,
    },
    #[error("Can't pass string arguments and flag arguments simultaneously!")]
    AmbiguousArgs { action: Action },
    #[error("No addon given to {0}")]
    NoAddons(Action),
    #[error("Insufficient permissions to access MicroK8s.")]
    PermissionDenied { user: String },
    #[error("microk8s is not running, try microk8s start")]
    NotRunning,
    #[error("This MicroK8s deployment is acting as a node in a cluster.")]
    ClusterLocked,
    #[error("Unsupported architecture: {0}")]
    UnsupportedArch(String),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
