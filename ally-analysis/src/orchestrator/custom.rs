//! Bridge for externally contributed test phases.
//!
//! Hosts clone a contributor handle and push their own issues; the
//! orchestrator waits for the expected number of reports with a hard
//! timeout, after which aggregation proceeds without the missing ones.

use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::store::issue::Issue;

/// Handle given to host integrations.
#[derive(Clone)]
pub struct CustomTestContributor {
    sender: Sender<Vec<Issue>>,
}

impl CustomTestContributor {
    /// Report one custom test phase's issues. An empty vec is a valid
    /// "nothing found" acknowledgement.
    pub fn report(&self, issues: Vec<Issue>) {
        // The bridge outlives every scan; a send failure means shutdown.
        let _ = self.sender.send(issues);
    }
}

/// What `collect` gathered before the deadline.
#[derive(Debug)]
pub struct CustomTestReport {
    pub issues: Vec<Issue>,
    /// Contributions still outstanding when the deadline hit.
    pub missing: usize,
    pub waited_ms: u64,
}

pub struct CustomTestBridge {
    sender: Sender<Vec<Issue>>,
    receiver: Receiver<Vec<Issue>>,
    expected: usize,
}

impl CustomTestBridge {
    pub fn new(expected: usize) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            expected,
        }
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn contributor(&self) -> CustomTestContributor {
        CustomTestContributor {
            sender: self.sender.clone(),
        }
    }

    /// Wait for the expected number of reports, up to `timeout_ms` overall.
    pub fn collect(&self, timeout_ms: u64) -> CustomTestReport {
        let started = Instant::now();
        let deadline = started + Duration::from_millis(timeout_ms);
        let mut issues = Vec::new();
        let mut received = 0;

        while received < self.expected {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(batch) => {
                    issues.extend(batch);
                    received += 1;
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        CustomTestReport {
            issues,
            missing: self.expected - received,
            waited_ms: started.elapsed().as_millis() as u64,
        }
    }
}
