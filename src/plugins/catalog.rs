//! Addon catalog (`$SNAP/addon-lists.yaml`).
//!
//! The catalog lists every addon shipped with the snap together with the
//! architectures it supports and the resource string that marks it enabled.

use crate::core::error::WrapperError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Substring of `kubectl get all` output present while the addon is enabled.
    #[serde(default)]
    pub check_status: Option<String>,
    #[serde(default)]
    pub supported_architectures: BTreeSet<String>,
}

impl Addon {
    pub fn supports(&self, arch: &str) -> bool {
        self.supported_architectures.contains(arch)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "microk8s-addons")]
    microk8s_addons: CatalogSection,
}

#[derive(Debug, Deserialize)]
struct CatalogSection {
    #[serde(default)]
    addons: Vec<Addon>,
}

#[derive(Debug, Clone, Default)]
pub struct AddonCatalog {
    addons: Vec<Addon>,
}

impl AddonCatalog {
    pub fn from_yaml_str(content: &str, origin: &Path) -> Result<Self, WrapperError> {
        let file: CatalogFile =
            serde_yaml::from_str(content).map_err(|source| WrapperError::CatalogError {
                path: origin.to_path_buf(),
                source,
            })?;
        Ok(Self {
            addons: file.microk8s_addons.addons,
        })
    }

    pub fn load(path: &Path) -> Result<Self, WrapperError> {
        let content = fs::read_to_string(path).map_err(WrapperError::IoError)?;
        Self::from_yaml_str(&content, path)
    }

    /// Addons supporting `arch`, sorted by name.
    pub fn available(&self, arch: &str) -> Vec<Addon> {
        let mut available: Vec<Addon> = self
            .addons
            .iter()
            .filter(|a| a.supports(arch))
            .cloned()
            .collect();
        available.sort_by(|a, b| a.name.cmp(&b.name));
        available
    }

    pub fn all(&self) -> &[Addon] {
        &self.addons
    }
}

/// Every record in `addons` named `name`.
pub fn by_name<'a>(addons: &'a [Addon], name: &str) -> Vec<&'a Addon> {
    addons.iter().filter(|a| a.name == name).collect()
}
