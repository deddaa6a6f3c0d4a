//! Idempotency gate: skip addons already in the requested state.

use std::collections::BTreeSet;

/// Addons whose scripts must run on every request. Their enable/disable
/// scripts are not idempotent.
pub const ALWAYS_RERUN: &[&str] = &["kubeflow"];

pub fn should_skip(addon: &str, already: &BTreeSet<String>) -> bool {
    already.contains(addon) && !ALWAYS_RERUN.contains(&addon)
}
