// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical snapshot model for the lift dashboard.
//!
//! Both backend transports (push stream and HTTP poll) deliver their own
//! payload shapes; this crate defines the one [`Scene`] representation the
//! rest of the system consumes, the wire schemas for each transport, and
//! the normalizer that maps wire payloads into scenes.

pub mod envelope;
pub mod normalize;
pub mod poll;
pub mod types;
pub mod wire;

pub use envelope::{RunStatus, SceneEnvelope};
pub use types::{
    Building, Direction, Elevator, ElevatorId, Floor, FloorId, Metrics, Passenger, PassengerId,
    PassengerStatus, RunState, Scene, Tick,
};
pub use wire::WireError;
