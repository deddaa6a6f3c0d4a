//! Invocation resolution for `enable` / `disable`.
//!
//! Two addressing modes exist:
//! - multi-addon: `microk8s enable dns storage:value` (every token names a
//!   known addon and there is more than one token)
//! - single-addon: `microk8s enable dns --flag ...` (first token is the addon,
//!   everything after it is forwarded verbatim)
//!
//! A colon value and flag arguments cannot be combined for one addon.

use crate::core::error::WrapperError;
use crate::plugins::actions::Action;
use std::collections::BTreeSet;

/// One `name[:value...]` token split at every `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonToken {
    pub name: String,
    pub values: Vec<String>,
}

impl AddonToken {
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split(':');
        let name = parts.next().unwrap_or_default().to_string();
        Self {
            name,
            values: parts.map(str::to_string).collect(),
        }
    }

    pub fn has_value(&self) -> bool {
        !self.values.is_empty()
    }
}

/// An addon plus the positional arguments its script receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonRequest {
    pub name: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPlan {
    /// One request per token, in token order.
    Multi(Vec<AddonRequest>),
    Single(AddonRequest),
}

impl ResolvedPlan {
    pub fn requests(&self) -> &[AddonRequest] {
        match self {
            ResolvedPlan::Multi(requests) => requests,
            ResolvedPlan::Single(request) => std::slice::from_ref(request),
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, ResolvedPlan::Multi(_))
    }
}

/// True when `tokens` select multi-addon mode.
pub fn is_multi_addon(tokens: &[String], existing: &BTreeSet<String>) -> bool {
    tokens.len() > 1
        && tokens
            .iter()
            .all(|t| existing.contains(&AddonToken::parse(t).name))
}

pub fn resolve(
    action: Action,
    tokens: &[String],
    existing: &BTreeSet<String>,
) -> Result<ResolvedPlan, WrapperError> {
    let Some(first) = tokens.first() else {
        return Err(WrapperError::NoAddons(action));
    };

    if is_multi_addon(tokens, existing) {
        // Membership is guaranteed by the mode test; no per-token check here.
        let requests = tokens
            .iter()
            .map(|t| {
                let token = AddonToken::parse(t);
                AddonRequest {
                    name: token.name,
                    args: token.values,
                }
            })
            .collect();
        return Ok(ResolvedPlan::Multi(requests));
    }

    let token = AddonToken::parse(first);
    let trailing = &tokens[1..];

    if !existing.contains(&token.name) {
        return Err(WrapperError::NotFound {
            addon: token.name,
            available: existing.iter().cloned().collect(),
        });
    }

    if token.has_value() && !trailing.is_empty() {
        return Err(WrapperError::AmbiguousArgs { action });
    }

    let args = if token.has_value() {
        token.values
    } else {
        trailing.to_vec()
    };
    Ok(ResolvedPlan::Single(AddonRequest {
        name: token.name,
        args,
    }))
}
