//! Runs one action script per addon.

use crate::core::error::WrapperError;
use crate::core::exec::{ExitOutcome, ProcessRunner};
use crate::plugins::actions::{Action, ActionRegistry};
use tracing::info;

pub struct ActionDispatcher<'a> {
    registry: &'a ActionRegistry,
    runner: &'a dyn ProcessRunner,
}

impl<'a> ActionDispatcher<'a> {
    pub fn new(registry: &'a ActionRegistry, runner: &'a dyn ProcessRunner) -> Self {
        Self { registry, runner }
    }

    /// Runs `<action>.<addon>.sh` with `args` as positional parameters and
    /// blocks until it exits. The script's status is returned as-is.
    pub fn dispatch(
        &self,
        action: Action,
        addon: &str,
        args: &[String],
    ) -> Result<ExitOutcome, WrapperError> {
        let script = self
            .registry
            .script(action, addon)
            .ok_or_else(|| WrapperError::NotFound {
                addon: addon.to_string(),
                available: self.registry.existing(action).into_iter().collect(),
            })?;
        info!(%action, addon, ?args, script = %script.display(), "dispatching action script");
        let outcome = self.runner.status(script, args)?;
        if !outcome.success() {
            info!(%action, addon, code = ?outcome.code, "action script failed");
        }
        Ok(outcome)
    }
}
