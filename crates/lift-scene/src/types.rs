// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical scene types shared by every transport.
//!
//! These are plain domain objects. Transport-specific payload shapes live
//! in [`crate::wire`] (push) and [`crate::poll`] (poll); the normalizer in
//! [`crate::normalize`] maps both into [`Scene`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Discrete simulation time unit.
pub type Tick = u64;

/// Identifier for a passenger.
pub type PassengerId = u32;

/// Identifier for an elevator car.
pub type ElevatorId = u32;

/// Identifier for a floor; floor 0 is the lowest.
pub type FloorId = u32;

/// Aggregate run counters reported by the backend (completion rate,
/// wait-time percentiles). Opaque key/value pairs; the core only formats
/// them numerically.
pub type Metrics = BTreeMap<String, f64>;

/// Building dimensions, immutable for the duration of one simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    /// Number of floors (>= 1).
    pub floors: u32,
    /// Number of elevator cars (>= 1).
    pub elevators: u32,
    /// Passenger capacity per car (>= 1).
    pub elevator_capacity: u32,
}

/// Vertical travel direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Moving or queued upward.
    Up,
    /// Moving or queued downward.
    Down,
    /// No direction (idle / at destination).
    Stopped,
}

/// Kinematic state of an elevator car.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Parked at a floor.
    #[serde(rename = "stopped")]
    Stopped,
    /// Accelerating upward.
    #[serde(rename = "start_up")]
    AcceleratingUp,
    /// Accelerating downward.
    #[serde(rename = "start_down")]
    AcceleratingDown,
    /// Cruising at travel speed.
    #[serde(rename = "constant_speed")]
    ConstantSpeed,
}

/// Lifecycle state of a passenger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerStatus {
    /// Queued on the origin floor.
    Waiting,
    /// Riding an elevator.
    InElevator,
    /// Dropped off at the destination floor.
    Arrived,
}

/// One elevator car at one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Elevator {
    /// Car identifier; also its column index left to right.
    pub id: ElevatorId,
    /// Continuous floor coordinate (floor 0 = 0.0), one-decimal precision.
    #[serde(rename = "current_pos")]
    pub position: f64,
    /// Assigned destination floor; `None` while idle with no assignment.
    pub target_floor: Option<FloorId>,
    /// Whether the car currently has no work.
    pub is_idle: bool,
    // the backend historically misspells this key as `run_statis`
    /// Kinematic state.
    #[serde(rename = "run_status", alias = "run_statis")]
    pub run_state: RunState,
    /// Direction toward the assigned target floor.
    #[serde(rename = "target_floor_direction")]
    pub target_direction: Direction,
    /// Riding passengers in boarding order.
    #[serde(default)]
    pub passengers: Vec<PassengerId>,
}

/// Call queues for one floor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    /// Floor identifier.
    pub id: FloorId,
    /// Passengers waiting to travel up, front of queue first.
    #[serde(default)]
    pub up_queue: Vec<PassengerId>,
    /// Passengers waiting to travel down, front of queue first.
    #[serde(default)]
    pub down_queue: Vec<PassengerId>,
}

/// One passenger at one tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Passenger identifier.
    pub id: PassengerId,
    /// Floor the passenger called from.
    pub origin: FloorId,
    /// Floor the passenger wants to reach.
    pub destination: FloorId,
    /// Tick the call was placed.
    pub arrive_tick: Tick,
    /// Tick the passenger boarded, once boarded.
    #[serde(default)]
    pub pickup_tick: Option<Tick>,
    /// Tick the passenger was dropped off, once dropped off.
    #[serde(default)]
    pub dropoff_tick: Option<Tick>,
    /// Car the passenger is riding, while in an elevator.
    #[serde(default)]
    pub elevator_id: Option<ElevatorId>,
    /// Lifecycle state.
    pub status: PassengerStatus,
    /// Ticks from call to pickup. Meaningless until `pickup_tick` is set;
    /// consumers must guard on `status`.
    pub wait_time: i64,
    /// Ticks from call to dropoff. Meaningless until `dropoff_tick` is set.
    pub system_time: i64,
    /// Direction of the requested trip.
    pub travel_direction: Direction,
}

/// Canonical snapshot of the whole simulation at one tick.
///
/// Scenes are immutable once built: every inbound message or poll cycle
/// produces a fresh value, and the previous one is retained by reference
/// inside the envelope for freeze-frame display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Building dimensions for this run.
    pub building: Building,
    /// Simulation time of this snapshot.
    pub tick: Tick,
    /// Elevator cars keyed by id.
    pub elevators: BTreeMap<ElevatorId, Elevator>,
    /// Floor call queues keyed by floor id.
    pub floors: BTreeMap<FloorId, Floor>,
    /// Passengers keyed by id.
    pub passengers: BTreeMap<PassengerId, Passenger>,
}

impl Direction {
    /// Direction of travel from `from` toward `to`.
    pub fn between(from: FloorId, to: FloorId) -> Self {
        match from.cmp(&to) {
            std::cmp::Ordering::Less => Self::Up,
            std::cmp::Ordering::Greater => Self::Down,
            std::cmp::Ordering::Equal => Self::Stopped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_between_orders_floors() {
        assert_eq!(Direction::between(1, 4), Direction::Up);
        assert_eq!(Direction::between(4, 1), Direction::Down);
        assert_eq!(Direction::between(3, 3), Direction::Stopped);
    }

    #[test]
    fn run_state_uses_wire_names() {
        let s: RunState = serde_json::from_str("\"start_up\"").unwrap();
        assert_eq!(s, RunState::AcceleratingUp);
        assert_eq!(serde_json::to_string(&RunState::ConstantSpeed).unwrap(), "\"constant_speed\"");
    }

    #[test]
    fn elevator_accepts_misspelled_run_state_key() {
        let e: Elevator = serde_json::from_str(
            r#"{"id":0,"current_pos":2.5,"target_floor":null,"is_idle":false,
                "run_statis":"constant_speed","target_floor_direction":"up","passengers":[7]}"#,
        )
        .unwrap();
        assert_eq!(e.run_state, RunState::ConstantSpeed);
        assert_eq!(e.passengers, vec![7]);
    }
}
