//! Enable / disable orchestration.
//!
//! The flow is identical for both actions apart from the script names:
//! resolve the tokens against the registry, drop addons that are already in
//! the target state, then run the remaining scripts one at a time in the order
//! they were typed. Later addons may depend on state set up by earlier ones,
//! so dispatch is strictly sequential.

use crate::core::error::WrapperError;
use crate::core::exec::{ExitOutcome, ProcessRunner};
use crate::plugins::actions::{Action, ActionRegistry};
use crate::plugins::dispatch::ActionDispatcher;
use crate::plugins::gate::should_skip;
use crate::plugins::resolver::{ResolvedPlan, resolve};
use std::collections::BTreeSet;
use std::io::Write;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub addon: String,
    pub args: Vec<String>,
    pub outcome: ExitOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XableOutcome {
    pub dispatched: Vec<Dispatched>,
    pub skipped: Vec<String>,
}

impl XableOutcome {
    /// 0 when every script succeeded (or nothing ran), otherwise the code of
    /// the first failing script.
    pub fn exit_code(&self) -> i32 {
        self.dispatched
            .iter()
            .find(|d| !d.outcome.success())
            .map(|d| d.outcome.exit_code())
            .unwrap_or(0)
    }
}

pub fn skip_message(action: Action, addon: &str) -> String {
    format!("Addon {} is already {}.", addon, action.past_tense())
}

pub fn xable(
    action: Action,
    tokens: &[String],
    registry: &ActionRegistry,
    already: &BTreeSet<String>,
    runner: &dyn ProcessRunner,
    out: &mut dyn Write,
) -> Result<XableOutcome, WrapperError> {
    let existing = registry.existing(action);
    let plan = resolve(action, tokens, &existing)?;
    let dispatcher = ActionDispatcher::new(registry, runner);
    let mut result = XableOutcome::default();

    match plan {
        ResolvedPlan::Single(request) => {
            if should_skip(&request.name, already) {
                writeln!(out, "{}", skip_message(action, &request.name))?;
                result.skipped.push(request.name);
                return Ok(result);
            }
            let outcome = dispatcher.dispatch(action, &request.name, &request.args)?;
            result.dispatched.push(Dispatched {
                addon: request.name,
                args: request.args,
                outcome,
            });
        }
        ResolvedPlan::Multi(requests) => {
            info!(%action, count = requests.len(), "processing addon batch");
            for request in requests {
                if should_skip(&request.name, already) {
                    writeln!(out, "{}", skip_message(action, &request.name))?;
                    result.skipped.push(request.name);
                    continue;
                }
                let outcome = dispatcher.dispatch(action, &request.name, &request.args)?;
                result.dispatched.push(Dispatched {
                    addon: request.name,
                    args: request.args,
                    outcome,
                });
            }
        }
    }

    Ok(result)
}
