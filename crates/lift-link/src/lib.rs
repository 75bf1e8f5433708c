// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Connection manager for the lift dashboard.
//!
//! A [`Link`] owns exactly one transport session in one of two mutually
//! exclusive modes: a push stream of line-delimited JSON messages, or a
//! fixed-cadence HTTP poll against two endpoints. Either way it publishes
//! the same outputs: a [`SceneEnvelope`] watch channel, a connectivity
//! watch channel, a metrics watch channel, and a bounded operational log.
//! Subscribers get read-only clones; all mutation happens inside the
//! session tasks.
//!
//! Switching modes means closing one link and opening another.
//! [`Link::close`] (and `Drop`) aborts the session tasks, which cancels
//! the mode's timers and drops its socket before a new link can exist, so
//! no stale event from a dead mode can reach the shared state.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use lift_scene::{wire, Metrics, Scene, SceneEnvelope};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

pub mod log;
pub mod poll;
pub mod push;

pub use log::{Event, EventKind, EventLog};
pub use poll::{CycleOutcome, HttpFetcher, RunTracker, StateFetcher};

/// Transport mode for a link session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Persistent stream; the backend sends unsolicited updates.
    Push,
    /// Fixed-interval fetches against the backend's HTTP API.
    Poll,
}

/// UI-visible connectivity state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkStatus {
    /// A transport session is currently established.
    pub connected: bool,
    /// A self-heal attempt is in progress.
    pub reconnecting: bool,
}

/// Errors surfaced by link operations.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Confirmation control only exists on the push transport.
    #[error("confirmation is only valid in push mode")]
    WrongMode,
    /// The link is not currently connected.
    #[error("not connected")]
    NotConnected,
    /// The outbound queue is full; the signal was dropped.
    #[error("outbound queue full")]
    Busy,
}

/// Configuration for one link session.
#[derive(Clone, Debug)]
pub struct LinkConfig {
    /// Which transport to run.
    pub mode: Mode,
    /// Push endpoint, host:port.
    pub push_addr: String,
    /// Poll endpoint base URL.
    pub poll_base: String,
    /// Cadence of liveness checks / reconnect attempts in push mode.
    pub reconnect_interval: Duration,
    /// Cadence of poll cycles.
    pub poll_interval: Duration,
    /// Capacity of the operational event log.
    pub log_capacity: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Push,
            push_addr: "127.0.0.1:8001".to_owned(),
            poll_base: "http://127.0.0.1:8000".to_owned(),
            reconnect_interval: Duration::from_secs(1),
            poll_interval: Duration::from_millis(50),
            log_capacity: EventLog::DEFAULT_CAPACITY,
        }
    }
}

/// State shared between the session tasks and the handle. Tasks are the
/// only writers; the handle and subscribers only read.
pub(crate) struct Shared {
    envelope: watch::Sender<SceneEnvelope>,
    status: watch::Sender<LinkStatus>,
    metrics: watch::Sender<Option<Metrics>>,
    log: Mutex<EventLog>,
}

impl Shared {
    pub(crate) fn new(log_capacity: usize) -> Self {
        Self {
            envelope: watch::Sender::new(SceneEnvelope::default()),
            status: watch::Sender::new(LinkStatus::default()),
            metrics: watch::Sender::new(None),
            log: Mutex::new(EventLog::new(log_capacity)),
        }
    }

    pub(crate) fn set_status(&self, connected: bool, reconnecting: bool) {
        self.status.send_replace(LinkStatus {
            connected,
            reconnecting,
        });
    }

    pub(crate) fn record<S: Into<String>>(&self, kind: EventKind, message: S) {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        log.push(kind, message);
    }

    /// Absorb a normalized scene, optionally freezing the run afterward.
    pub(crate) fn absorb_scene(&self, scene: Scene, finished: bool) {
        self.envelope.send_modify(|env| {
            env.absorb(scene);
            if finished {
                env.finish();
            }
        });
    }

    pub(crate) fn finish(&self) {
        self.envelope.send_modify(SceneEnvelope::finish);
    }

    pub(crate) fn publish_metrics(&self, metrics: Metrics) {
        self.metrics.send_replace(Some(metrics));
    }
}

/// Handle to one active transport session.
pub struct Link {
    mode: Mode,
    shared: Arc<Shared>,
    tasks: Vec<JoinHandle<()>>,
    confirm_tx: Option<mpsc::Sender<String>>,
}

impl Link {
    /// Open a session per `config` and spawn its tasks on the current
    /// tokio runtime.
    pub fn open(config: LinkConfig) -> Self {
        let shared = Arc::new(Shared::new(config.log_capacity));
        let mut tasks = Vec::new();
        let mut confirm_tx = None;
        match config.mode {
            Mode::Push => {
                let (tx, rx) = mpsc::channel(8);
                confirm_tx = Some(tx);
                tasks.push(tokio::spawn(push::run_push(
                    Arc::clone(&shared),
                    config.push_addr,
                    config.reconnect_interval,
                    rx,
                )));
            }
            Mode::Poll => {
                let fetcher = HttpFetcher::new(config.poll_base);
                tasks.push(tokio::spawn(poll::run_poll(
                    Arc::clone(&shared),
                    fetcher,
                    config.poll_interval,
                )));
            }
        }
        Self {
            mode: config.mode,
            shared,
            tasks,
            confirm_tx,
        }
    }

    /// Transport mode this session runs.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Subscribe to envelope updates. The receiver always observes the
    /// latest envelope; updates are applied in arrival order.
    pub fn envelopes(&self) -> watch::Receiver<SceneEnvelope> {
        self.shared.envelope.subscribe()
    }

    /// Subscribe to connectivity changes.
    pub fn status(&self) -> watch::Receiver<LinkStatus> {
        self.shared.status.subscribe()
    }

    /// Subscribe to metric updates.
    pub fn metrics(&self) -> watch::Receiver<Option<Metrics>> {
        self.shared.metrics.subscribe()
    }

    /// Copy of the operational event log, oldest first.
    pub fn recent_events(&self) -> Vec<Event> {
        self.shared
            .log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    /// Signal the backend to proceed past its checkpoint. Fire and
    /// forget; valid only in push mode while connected.
    pub fn confirm(&self) -> Result<(), LinkError> {
        let Some(tx) = &self.confirm_tx else {
            return Err(LinkError::WrongMode);
        };
        if !self.shared.status.borrow().connected {
            return Err(LinkError::NotConnected);
        }
        tx.try_send(wire::confirmation())
            .map_err(|_| LinkError::Busy)
    }

    /// Tear the session down: abort its tasks, cancelling timers and
    /// dropping the transport.
    pub fn close(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn confirm_is_rejected_in_poll_mode() {
        let link = Link::open(LinkConfig {
            mode: Mode::Poll,
            // nothing listens here; the poller just fails and retries
            poll_base: "http://127.0.0.1:9".to_owned(),
            ..LinkConfig::default()
        });
        assert!(matches!(link.confirm(), Err(LinkError::WrongMode)));
        link.close();
    }

    #[tokio::test]
    async fn confirm_requires_a_connection() {
        let link = Link::open(LinkConfig {
            mode: Mode::Push,
            push_addr: "127.0.0.1:9".to_owned(),
            reconnect_interval: Duration::from_secs(60),
            ..LinkConfig::default()
        });
        assert!(matches!(link.confirm(), Err(LinkError::NotConnected)));
        link.close();
    }
}
