//! `microk8s status` and `microk8s addons` reports.

use crate::plugins::catalog::Addon;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write;

pub const NOT_RUNNING: &str =
    "microk8s is not running. Use microk8s inspect for a deeper inspection.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddonState {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddonStatus {
    pub name: String,
    pub description: String,
    pub version: Option<String>,
    pub status: AddonState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub running: bool,
    pub addons: Vec<AddonStatus>,
}

impl StatusReport {
    /// `available` is expected sorted by name (catalog order).
    pub fn new(running: bool, available: &[Addon], enabled: &BTreeSet<String>) -> Self {
        let addons = if running {
            available
                .iter()
                .map(|a| AddonStatus {
                    name: a.name.clone(),
                    description: a.description.clone(),
                    version: a.version.clone(),
                    status: if enabled.contains(&a.name) {
                        AddonState::Enabled
                    } else {
                        AddonState::Disabled
                    },
                })
                .collect()
        } else {
            Vec::new()
        };
        Self { running, addons }
    }

    pub fn with_state(&self, state: AddonState) -> impl Iterator<Item = &AddonStatus> {
        self.addons.iter().filter(move |a| a.status == state)
    }

    pub fn render_text(&self) -> String {
        if !self.running {
            return format!("{}\n", NOT_RUNNING);
        }
        let mut text = String::from("microk8s is running\naddons:\n");
        for (label, state) in [
            ("enabled", AddonState::Enabled),
            ("disabled", AddonState::Disabled),
        ] {
            let _ = writeln!(text, "  {}:", label);
            for addon in self.with_state(state) {
                let _ = writeln!(text, "    {:<20} # {}", addon.name, addon.description);
            }
        }
        text
    }
}

/// One line per addon: name, version and description.
pub fn render_catalog(addons: &[Addon]) -> String {
    let mut text = String::new();
    for addon in addons {
        let _ = writeln!(
            text,
            "{:<20} {:<10} {}",
            addon.name,
            addon.version.as_deref().unwrap_or("-"),
            addon.description
        );
    }
    text
}
