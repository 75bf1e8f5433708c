// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Poll-transport payload shapes.
//!
//! Poll mode issues two independent requests per cycle: a full state
//! snapshot and run metadata. Neither payload is canonical; the state
//! snapshot reports positions as floor + fractional offset and leaves
//! derived passenger fields to the client. [`crate::normalize`] performs
//! that mapping.

use serde::Deserialize;

use crate::types::{Building, ElevatorId, FloorId, Metrics, PassengerId, RunState, Tick};

/// Elevator record as returned by the state endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct PollElevator {
    /// Car identifier.
    pub id: ElevatorId,
    /// Floor the car is at or most recently departed.
    pub current_floor: FloorId,
    /// Offset past `current_floor` in tenths of a floor.
    #[serde(default)]
    pub fractional_offset: f64,
    /// Assigned destination floor, if any.
    #[serde(default)]
    pub target_floor: Option<FloorId>,
    /// Kinematic state (wire names shared with the push transport).
    pub run_state: RunState,
    /// Riding passengers in boarding order.
    #[serde(default)]
    pub passengers: Vec<PassengerId>,
}

/// Floor record as returned by the state endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct PollFloor {
    /// Floor identifier.
    pub id: FloorId,
    /// Up-bound call queue, front first.
    #[serde(default)]
    pub up_queue: Vec<PassengerId>,
    /// Down-bound call queue, front first.
    #[serde(default)]
    pub down_queue: Vec<PassengerId>,
}

/// Passenger record as returned by the state endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct PollPassenger {
    /// Passenger identifier.
    pub id: PassengerId,
    /// Floor the passenger called from.
    pub origin: FloorId,
    /// Floor the passenger wants to reach.
    pub destination: FloorId,
    /// Tick the call was placed.
    pub arrive_tick: Tick,
    /// Tick the passenger boarded; absent or zero before boarding.
    #[serde(default)]
    pub pickup_tick: Option<Tick>,
    /// Tick the passenger was dropped off; absent before dropoff.
    #[serde(default)]
    pub dropoff_tick: Option<Tick>,
    /// Car the passenger is riding, while aboard.
    #[serde(default)]
    pub elevator_id: Option<ElevatorId>,
    /// Explicit completion flag set by the backend.
    #[serde(default)]
    pub arrived: bool,
}

/// Full state snapshot from the state endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct PollState {
    /// Simulation time of this snapshot.
    pub tick: Tick,
    /// Building dimensions.
    pub building: Building,
    /// All elevator cars.
    #[serde(default)]
    pub elevators: Vec<PollElevator>,
    /// All floors.
    #[serde(default)]
    pub floors: Vec<PollFloor>,
    /// All passengers seen so far this run.
    #[serde(default)]
    pub passengers: Vec<PollPassenger>,
    /// Aggregate counters, when the backend has computed them.
    #[serde(default)]
    pub metrics: Option<Metrics>,
}

/// Run metadata from the traffic endpoint.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PollTraffic {
    /// Total ticks scheduled for the current run.
    pub max_tick: Tick,
}
