// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Push-mode session: a persistent stream of line-delimited JSON
//! messages, with fixed-cadence reconnection.
//!
//! One task owns the socket for its whole lifetime, so at most one
//! physical connection exists per session; a replacement connection can
//! only be opened after the previous one has been dropped and its
//! pending reads discarded.

use std::sync::Arc;
use std::time::Duration;

use lift_scene::normalize;
use lift_scene::wire::ServerMessage;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::log::EventKind;
use crate::Shared;

/// Session driver: connect, stream, and retry on the liveness cadence
/// until the task is aborted.
pub(crate) async fn run_push(
    shared: Arc<Shared>,
    addr: String,
    retry: Duration,
    mut confirm_rx: mpsc::Receiver<String>,
) {
    loop {
        shared.set_status(false, true);
        debug!(%addr, "attempting connection");
        match TcpStream::connect(&addr).await {
            Ok(stream) => {
                info!(%addr, "connection established");
                shared.set_status(true, false);
                session(&shared, stream, &mut confirm_rx).await;
                info!(%addr, "connection closed");
                shared.set_status(false, false);
            }
            Err(err) => {
                debug!(%addr, %err, "connection attempt failed");
                shared.set_status(false, false);
            }
        }
        // liveness cadence: one readiness check / reconnect per interval
        tokio::time::sleep(retry).await;
    }
}

/// Drive one established connection until EOF, read error, or write
/// failure. Inbound lines and outbound confirmations share the task, so
/// messages are applied strictly in arrival order.
async fn session(shared: &Shared, stream: TcpStream, confirm_rx: &mut mpsc::Receiver<String>) {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(text)) => dispatch(shared, &text),
                Ok(None) => break,
                Err(err) => {
                    warn!(%err, "read error");
                    break;
                }
            },
            outbound = confirm_rx.recv() => match outbound {
                Some(text) => {
                    if let Err(err) = write_half.write_all(text.as_bytes()).await {
                        warn!(%err, "failed to send confirmation");
                        break;
                    }
                }
                // handle dropped; the task is about to be aborted anyway
                None => break,
            },
        }
    }
}

fn dispatch(shared: &Shared, text: &str) {
    match ServerMessage::parse(text) {
        Ok((msg, _timestamp)) => apply(shared, msg),
        Err(err) => {
            warn!(%err, "dropping malformed message");
            shared.record(EventKind::Error, format!("malformed message: {err}"));
        }
    }
}

fn apply(shared: &Shared, msg: ServerMessage) {
    match msg {
        ServerMessage::SceneUpdate(doc) => match normalize::from_push(doc) {
            Ok(scene) => {
                let finished = normalize::run_finished(&scene);
                shared.absorb_scene(scene, finished);
            }
            Err(err) => {
                warn!(%err, "rejected scene payload");
                shared.record(EventKind::Error, format!("rejected scene: {err}"));
            }
        },
        ServerMessage::MetricsUpdate(metrics) => shared.publish_metrics(metrics),
        ServerMessage::WaitForConfirmation => shared.finish(),
        ServerMessage::Log(message) => {
            info!(backend = true, "{message}");
            shared.record(EventKind::Log, message);
        }
        ServerMessage::Error(message) => {
            warn!(backend = true, "{message}");
            shared.record(EventKind::Error, message);
        }
        ServerMessage::Unknown { kind, .. } => {
            debug!(%kind, "ignoring unknown message kind");
            shared.record(EventKind::Unknown, format!("unknown message kind `{kind}`"));
        }
    }
}
