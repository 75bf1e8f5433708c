// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Poll-mode session: fixed-cadence fetches against the backend's HTTP
//! API, merged into normalized envelopes.
//!
//! Every cycle issues the state and traffic fetches concurrently; each
//! side tolerates the other's failure, but a cycle only publishes when
//! both resolved, so a surviving half is never merged with stale data.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::future::BoxFuture;
use lift_scene::poll::{PollState, PollTraffic};
use lift_scene::{normalize, Tick};
use tokio::time::{self, MissedTickBehavior};
use tracing::warn;

use crate::log::EventKind;
use crate::Shared;

/// Port over the poll transport's two endpoints, so the cycle logic can
/// be exercised against a stub backend.
pub trait StateFetcher: Send + Sync + 'static {
    /// Fetch the full state snapshot.
    fn fetch_state(&self) -> BoxFuture<'_, Result<PollState>>;
    /// Fetch run metadata.
    fn fetch_traffic(&self) -> BoxFuture<'_, Result<PollTraffic>>;
}

/// reqwest-backed fetcher against the backend's HTTP API.
pub struct HttpFetcher {
    client: reqwest::Client,
    base: String,
}

impl HttpFetcher {
    /// Create a fetcher for `base`, for example `http://127.0.0.1:8000`.
    pub fn new<S: Into<String>>(base: S) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.base);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()?;
        response
            .json()
            .await
            .with_context(|| format!("decoding response from {url}"))
    }
}

impl StateFetcher for HttpFetcher {
    fn fetch_state(&self) -> BoxFuture<'_, Result<PollState>> {
        Box::pin(self.get_json("/api/state"))
    }

    fn fetch_traffic(&self) -> BoxFuture<'_, Result<PollTraffic>> {
        Box::pin(self.get_json("/api/traffic"))
    }
}

/// What one poll observation implies for the envelope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Metrics should be captured from this cycle's snapshot.
    pub capture_metrics: bool,
    /// The run is complete; freeze the display.
    pub finished: bool,
}

/// Tracks metrics capture and terminal-tick progress across poll cycles.
///
/// A run's terminal point is `max_tick - 1`. The first observation there
/// captures metrics; a second observation without forward progress marks
/// the run finished. A tick falling back below the terminal point means a
/// new run started, which re-arms both.
#[derive(Debug, Default)]
pub struct RunTracker {
    metrics_captured: bool,
    terminal_seen: bool,
}

impl RunTracker {
    /// Fold one observed `(tick, max_tick)` pair into the tracker.
    pub fn observe(&mut self, tick: Tick, max_tick: Tick) -> CycleOutcome {
        let terminal = max_tick > 0 && tick >= max_tick - 1;
        if !terminal {
            self.metrics_captured = false;
            self.terminal_seen = false;
            return CycleOutcome::default();
        }
        let outcome = CycleOutcome {
            capture_metrics: !self.metrics_captured,
            finished: self.terminal_seen,
        };
        self.metrics_captured = true;
        self.terminal_seen = true;
        outcome
    }
}

/// Cycle driver: poll both endpoints on the configured cadence until the
/// task is aborted.
pub(crate) async fn run_poll<F: StateFetcher>(shared: Arc<Shared>, fetcher: F, period: Duration) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tracker = RunTracker::default();
    loop {
        ticker.tick().await;
        let (state, traffic) = tokio::join!(fetcher.fetch_state(), fetcher.fetch_traffic());
        let state = ok_or_log(&shared, "state", state);
        let traffic = ok_or_log(&shared, "traffic", traffic);
        let (Some(state), Some(traffic)) = (state, traffic) else {
            shared.set_status(false, true);
            continue;
        };
        shared.set_status(true, false);

        let outcome = tracker.observe(state.tick, traffic.max_tick);
        if outcome.capture_metrics {
            if let Some(metrics) = state.metrics.clone() {
                shared.publish_metrics(metrics);
            }
        }
        match normalize::from_poll(&state) {
            Ok(scene) => shared.absorb_scene(scene, outcome.finished),
            Err(err) => {
                warn!(%err, "rejected state snapshot");
                shared.record(EventKind::Error, format!("rejected snapshot: {err}"));
            }
        }
    }
}

fn ok_or_log<T>(shared: &Shared, endpoint: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(endpoint, error = %err, "poll fetch failed");
            shared.record(EventKind::Error, format!("{endpoint} fetch failed: {err:#}"));
            None
        }
    }
}
