// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless console client for the lift dashboard.
//! Opens a link in either transport mode, follows the envelope stream,
//! and reports per-frame layout summaries over tracing.

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use lift_layout::{passenger_positions, Frame};
use lift_link::{Link, LinkConfig, Mode};
use lift_scene::{RunStatus, Scene};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TransportArg {
    /// Persistent stream of line-delimited JSON updates.
    Push,
    /// Fixed-interval HTTP polling.
    Poll,
}

impl From<TransportArg> for Mode {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Push => Self::Push,
            TransportArg::Poll => Self::Poll,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Lift dashboard console client")]
struct Args {
    /// Transport mode
    #[arg(long, value_enum, default_value = "push")]
    mode: TransportArg,
    /// Push endpoint, host:port
    #[arg(long, default_value = "127.0.0.1:8001")]
    push_addr: String,
    /// Poll endpoint base URL
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    poll_base: String,
    /// Poll cadence in milliseconds
    #[arg(long, default_value_t = 50)]
    poll_interval_ms: u64,
    /// Viewport width in pixels, for layout summaries
    #[arg(long, default_value_t = 720.0)]
    width: f32,
    /// Viewport height in pixels
    #[arg(long, default_value_t = 480.0)]
    height: f32,
    /// Automatically confirm the end-of-run checkpoint (push mode)
    #[arg(long)]
    auto_confirm: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let link = Link::open(LinkConfig {
        mode: args.mode.into(),
        push_addr: args.push_addr,
        poll_base: args.poll_base,
        poll_interval: Duration::from_millis(args.poll_interval_ms),
        ..LinkConfig::default()
    });
    info!(mode = ?link.mode(), "link opened");

    let mut envelopes = link.envelopes();
    let mut status = link.status();
    let mut metrics = link.metrics();
    let mut confirmed = false;

    loop {
        tokio::select! {
            changed = envelopes.changed() => {
                if changed.is_err() {
                    break;
                }
                let env = envelopes.borrow_and_update().clone();
                if let Some(scene) = env.display() {
                    report(scene, args.width, args.height);
                }
                if env.status == RunStatus::Finished && args.auto_confirm && !confirmed {
                    match link.confirm() {
                        Ok(()) => {
                            info!("run complete; confirmation sent");
                            confirmed = true;
                        }
                        Err(err) => warn!(%err, "confirmation not sent"),
                    }
                }
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let s = *status.borrow_and_update();
                info!(connected = s.connected, reconnecting = s.reconnecting, "link status");
            }
            changed = metrics.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(metrics) = metrics.borrow_and_update().clone() {
                    for (key, value) in &metrics {
                        info!(metric = %key, value = *value, "run metric");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    for event in link.recent_events() {
        info!(kind = ?event.kind, "{}", event.message);
    }
    link.close();
    Ok(())
}

/// Log a one-line layout summary for the displayed scene.
fn report(scene: &Scene, width: f32, height: f32) {
    let frame = Frame::new(width, height, &scene.building);
    let placed = passenger_positions(&frame, scene);
    info!(
        tick = scene.tick,
        elevators = scene.elevators.len(),
        passengers = scene.passengers.len(),
        placed = placed.len(),
        "scene"
    );
}
