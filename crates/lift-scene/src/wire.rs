// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Push-transport wire schema.
//!
//! The backend streams JSON envelopes of the form
//! `{"type": "...", "data": ..., "timestamp": ...}`. Message kinds are
//! mapped onto [`ServerMessage`] so dispatch is exhaustive at compile
//! time; kinds we do not recognize are preserved, not rejected.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::types::{
    Building, Elevator, ElevatorId, Floor, FloorId, Metrics, Passenger, PassengerId, Tick,
};

/// Error type for wire decoding and scene validation.
#[derive(Debug, Error)]
pub enum WireError {
    /// The message was not valid JSON or lacked the envelope shape.
    #[error("invalid message envelope: {0}")]
    Envelope(#[from] serde_json::Error),
    /// The envelope was valid JSON but the payload did not match its kind.
    #[error("malformed `{kind}` payload: {source}")]
    Payload {
        /// Message kind whose payload failed to decode.
        kind: String,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// A decoded scene violated a structural invariant.
    #[error("invalid scene: {0}")]
    Scene(String),
}

/// Simulation clock wrapper as it appears on the wire.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Clock {
    /// Simulation time of the snapshot.
    pub tick: Tick,
}

/// Scene payload as carried by `server_scene_update`.
///
/// Already canonical apart from the nested clock; the normalizer flattens
/// it into [`crate::Scene`].
#[derive(Clone, Debug, Deserialize)]
pub struct SceneDoc {
    /// Building dimensions.
    pub building: Building,
    /// Nested clock record.
    pub current: Clock,
    /// Elevator cars keyed by id.
    #[serde(default)]
    pub elevators: BTreeMap<ElevatorId, Elevator>,
    /// Floor call queues keyed by floor id.
    #[serde(default)]
    pub floors: BTreeMap<FloorId, Floor>,
    /// Passengers keyed by id.
    #[serde(default)]
    pub passengers: BTreeMap<PassengerId, Passenger>,
}

/// One inbound push-mode message, dispatched by its kind tag.
#[derive(Clone, Debug)]
pub enum ServerMessage {
    /// A fresh simulation snapshot.
    SceneUpdate(SceneDoc),
    /// Aggregate run counters.
    MetricsUpdate(Metrics),
    /// The backend is parked at a checkpoint awaiting confirmation.
    WaitForConfirmation,
    /// Informational log line from the backend.
    Log(String),
    /// Error report from the backend.
    Error(String),
    /// A kind this client does not know; logged, never rejected.
    Unknown {
        /// The unrecognized kind tag.
        kind: String,
        /// Raw payload for diagnostics.
        data: Value,
    },
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    timestamp: Option<f64>,
}

impl ServerMessage {
    /// Parse one wire message. Returns the message and the backend's send
    /// timestamp when present.
    pub fn parse(text: &str) -> Result<(Self, Option<f64>), WireError> {
        let raw: RawMessage = serde_json::from_str(text)?;
        let msg = match raw.kind.as_str() {
            "server_scene_update" => Self::SceneUpdate(decode(&raw.kind, raw.data)?),
            "server_metrics_update" => Self::MetricsUpdate(decode(&raw.kind, raw.data)?),
            "server_wait_for_confirmation" => Self::WaitForConfirmation,
            "server_log" => Self::Log(text_payload(raw.data)),
            "server_error" => Self::Error(text_payload(raw.data)),
            _ => Self::Unknown {
                kind: raw.kind,
                data: raw.data,
            },
        };
        Ok((msg, raw.timestamp))
    }
}

fn decode<T: serde::de::DeserializeOwned>(kind: &str, data: Value) -> Result<T, WireError> {
    serde_json::from_value(data).map_err(|source| WireError::Payload {
        kind: kind.to_owned(),
        source,
    })
}

fn text_payload(data: Value) -> String {
    match data {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Serialized outbound "proceed" signal, newline-terminated for the
/// line-delimited stream.
pub fn confirmation() -> String {
    "{\"type\":\"client_confirmed\",\"data\":{}}\n".to_owned()
}
