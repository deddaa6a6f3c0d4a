//! Action scripts: the `(action, addon) → script` registry.
//!
//! The actions directory holds one shell script per addon and action, named
//! `<action>.<addon>.sh`. The registry is built once from a directory listing
//! and is the single source for both the set of addons that exist for an
//! action and the script a dispatch runs.

use crate::core::error::WrapperError;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Enable,
    Disable,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Enable, Action::Disable];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Enable => "enable",
            Action::Disable => "disable",
        }
    }

    /// Capitalized verb for sentence starts ("Enable an addon ...").
    pub fn title(self) -> &'static str {
        match self {
            Action::Enable => "Enable",
            Action::Disable => "Disable",
        }
    }

    /// Target state ("enabled" / "disabled").
    pub fn past_tense(self) -> &'static str {
        match self {
            Action::Enable => "enabled",
            Action::Disable => "disabled",
        }
    }

    pub fn script_name(self, addon: &str) -> String {
        format!("{}.{}.sh", self.as_str(), addon)
    }

    /// Addon name encoded in a script file name, if the name follows the
    /// `<action>.<addon>.sh` convention.
    pub fn addon_from_script<'a>(self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_prefix(self.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .and_then(|rest| rest.strip_suffix(".sh"))
            .filter(|name| !name.is_empty())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    scripts: BTreeMap<Action, BTreeMap<String, PathBuf>>,
}

impl ActionRegistry {
    /// Lists `enable.*.sh` and `disable.*.sh` under `dir`.
    /// A missing directory yields an empty registry.
    pub fn scan(dir: &Path) -> Result<Self, WrapperError> {
        let mut registry = ActionRegistry::default();
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "actions directory not found");
            return Ok(registry);
        }

        let escaped = glob::Pattern::escape(&dir.to_string_lossy());
        for action in Action::ALL {
            let pattern = format!("{}/{}.*.sh", escaped, action.as_str());
            for entry in glob::glob(&pattern)? {
                let path = match entry {
                    Ok(p) => p,
                    Err(e) => {
                        warn!(error = %e, "skipping unreadable action script");
                        continue;
                    }
                };
                let Some(file_name) = path.file_name().and_then(|f| f.to_str()) else {
                    continue;
                };
                if let Some(addon) = action.addon_from_script(file_name) {
                    registry.insert(action, addon.to_string(), path.clone());
                }
            }
        }
        debug!(
            dir = %dir.display(),
            enable = registry.existing(Action::Enable).len(),
            disable = registry.existing(Action::Disable).len(),
            "scanned action scripts"
        );
        Ok(registry)
    }

    /// Registry with an explicit set of scripts under `dir`, named by
    /// convention. No filesystem access.
    pub fn with_scripts<'a>(
        dir: &Path,
        entries: impl IntoIterator<Item = (Action, &'a str)>,
    ) -> Self {
        let mut registry = ActionRegistry::default();
        for (action, addon) in entries {
            let path = dir.join(action.script_name(addon));
            registry.insert(action, addon.to_string(), path);
        }
        registry
    }

    fn insert(&mut self, action: Action, addon: String, path: PathBuf) {
        self.scripts.entry(action).or_default().insert(addon, path);
    }

    /// Names with a script for `action`, sorted.
    pub fn existing(&self, action: Action) -> BTreeSet<String> {
        self.scripts
            .get(&action)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn script(&self, action: Action, addon: &str) -> Option<&Path> {
        self.scripts
            .get(&action)
            .and_then(|m| m.get(addon))
            .map(PathBuf::as_path)
    }
}
