//! Cluster readiness polling.
//!
//! The cluster counts as ready once a node reports `Ready` and the API
//! service (`service/kubernetes`) shows up in the all-namespaces listing.
//! Probe failures (API server not answering yet) are expected during startup:
//! they are logged, followed by a short pause, and never surface to the caller.

use crate::core::config::ReadinessConfig;
use crate::core::exec::ExecError;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub trait ReadinessProbe {
    /// Listing of all resources across namespaces.
    fn services(&self) -> Result<String, ExecError>;
    /// Listing of cluster nodes.
    fn nodes(&self) -> Result<String, ExecError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    Done(bool),
}

pub struct ReadinessPoller<'a> {
    probe: &'a dyn ReadinessProbe,
    node_ready_token: String,
    core_service: String,
    retry_delay: Duration,
}

impl<'a> ReadinessPoller<'a> {
    pub fn new(probe: &'a dyn ReadinessProbe, config: &ReadinessConfig) -> Self {
        Self {
            probe,
            node_ready_token: config.node_ready_token.clone(),
            core_service: config.core_service.clone(),
            retry_delay: config.retry_delay(),
        }
    }

    /// One reading of both signals.
    pub fn sample(&self) -> Result<bool, ExecError> {
        let services = self.probe.services()?;
        let nodes = self.probe.nodes()?;
        let ready = nodes.contains(&self.node_ready_token) && services.contains(&self.core_service);
        debug!(ready, "readiness sample");
        Ok(ready)
    }

    /// Single sample with probe errors read as "not ready".
    pub fn is_ready(&self) -> bool {
        self.sample().unwrap_or(false)
    }

    /// Polls until ready or until `timeout_seconds` have elapsed.
    /// A timeout of zero or less polls until ready.
    pub fn wait_for_ready(&self, timeout_seconds: i64) -> bool {
        let deadline = u64::try_from(timeout_seconds)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let start = Instant::now();
        let mut state = PollState::Polling;
        loop {
            match state {
                PollState::Done(ready) => return ready,
                PollState::Polling => state = self.step(start, deadline),
            }
        }
    }

    fn step(&self, start: Instant, deadline: Option<Duration>) -> PollState {
        if let Some(limit) = deadline {
            if start.elapsed() > limit {
                debug!(?limit, "readiness wait timed out");
                return PollState::Done(false);
            }
        }
        match self.sample() {
            Ok(true) => PollState::Done(true),
            Ok(false) => PollState::Polling,
            Err(e) => {
                warn!(error = %e, "readiness probe failed, retrying");
                thread::sleep(self.retry_delay);
                PollState::Polling
            }
        }
    }
}
