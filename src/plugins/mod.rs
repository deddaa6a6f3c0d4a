//! Addon handling: resolution, idempotency, dispatch, readiness and catalog.

pub mod actions;
pub mod catalog;
pub mod cluster;
pub mod dispatch;
pub mod gate;
pub mod readiness;
pub mod resolver;
pub mod status;
pub mod xable;
