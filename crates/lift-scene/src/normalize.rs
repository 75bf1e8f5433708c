// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Snapshot normalizer: one canonical [`Scene`] from either transport.
//!
//! Push payloads are already canonical and only need flattening plus
//! validation. Poll payloads carry raw scheduler state; the mapping rules
//! here derive positions, directions, and passenger lifecycle fields.

use std::collections::BTreeMap;

use crate::poll::{PollPassenger, PollState};
use crate::types::{
    Direction, Elevator, Floor, Passenger, PassengerStatus, RunState, Scene,
};
use crate::wire::{SceneDoc, WireError};

/// Build a canonical scene from a push-mode payload.
pub fn from_push(doc: SceneDoc) -> Result<Scene, WireError> {
    let scene = Scene {
        building: doc.building,
        tick: doc.current.tick,
        elevators: doc.elevators,
        floors: doc.floors,
        passengers: doc.passengers,
    };
    validate(&scene)?;
    Ok(scene)
}

/// Build a canonical scene from a poll-mode state snapshot.
pub fn from_poll(state: &PollState) -> Result<Scene, WireError> {
    let elevators = state
        .elevators
        .iter()
        .map(|e| {
            let position =
                (f64::from(e.current_floor) * 10.0 + e.fractional_offset).round() / 10.0;
            let target_direction = e.target_floor.map_or(Direction::Stopped, |target| {
                let target = f64::from(target);
                if position < target {
                    Direction::Up
                } else if position > target {
                    Direction::Down
                } else {
                    Direction::Stopped
                }
            });
            let car = Elevator {
                id: e.id,
                position,
                target_floor: e.target_floor,
                is_idle: e.run_state == RunState::Stopped,
                run_state: e.run_state,
                target_direction,
                passengers: e.passengers.clone(),
            };
            (e.id, car)
        })
        .collect();

    let floors = state
        .floors
        .iter()
        .map(|f| {
            let floor = Floor {
                id: f.id,
                up_queue: f.up_queue.clone(),
                down_queue: f.down_queue.clone(),
            };
            (f.id, floor)
        })
        .collect();

    let passengers = state
        .passengers
        .iter()
        .map(|p| (p.id, normalize_passenger(p)))
        .collect::<BTreeMap<_, _>>();

    let scene = Scene {
        building: state.building,
        tick: state.tick,
        elevators,
        floors,
        passengers,
    };
    validate(&scene)?;
    Ok(scene)
}

fn normalize_passenger(p: &PollPassenger) -> Passenger {
    let status = if p.arrived {
        PassengerStatus::Arrived
    } else if p.pickup_tick.is_some_and(|t| t > 0) {
        PassengerStatus::InElevator
    } else {
        PassengerStatus::Waiting
    };
    let arrive = i64::try_from(p.arrive_tick).unwrap_or(i64::MAX);
    let ticks_since = |t: Option<u64>| i64::try_from(t.unwrap_or(0)).unwrap_or(i64::MAX) - arrive;
    Passenger {
        id: p.id,
        origin: p.origin,
        destination: p.destination,
        arrive_tick: p.arrive_tick,
        pickup_tick: p.pickup_tick,
        dropoff_tick: p.dropoff_tick,
        elevator_id: p.elevator_id,
        status,
        wait_time: ticks_since(p.pickup_tick),
        system_time: ticks_since(p.dropoff_tick),
        travel_direction: Direction::between(p.origin, p.destination),
    }
}

/// Whether a push-mode scene marks the run as complete.
///
/// The backend signals completion through a passenger record whose pickup
/// and dropoff land on the same nonzero tick (a full cycle elapsed with
/// zero dwell). Preserved verbatim from the backend contract.
pub fn run_finished(scene: &Scene) -> bool {
    scene.passengers.values().any(|p| {
        matches!(
            (p.pickup_tick, p.dropoff_tick),
            (Some(pu), Some(dr)) if pu > 0 && dr > 0 && pu == dr
        )
    })
}

fn validate(scene: &Scene) -> Result<(), WireError> {
    let b = scene.building;
    if b.floors == 0 || b.elevators == 0 || b.elevator_capacity == 0 {
        return Err(WireError::Scene(format!(
            "building dimensions must all be >= 1 (floors={}, elevators={}, capacity={})",
            b.floors, b.elevators, b.elevator_capacity
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poll::{PollElevator, PollFloor, PollTraffic};
    use crate::types::Building;

    fn poll_state() -> PollState {
        PollState {
            tick: 20,
            building: Building {
                floors: 6,
                elevators: 2,
                elevator_capacity: 4,
            },
            elevators: vec![
                PollElevator {
                    id: 0,
                    current_floor: 2,
                    fractional_offset: 4.7,
                    target_floor: Some(5),
                    run_state: RunState::ConstantSpeed,
                    passengers: vec![3],
                },
                PollElevator {
                    id: 1,
                    current_floor: 3,
                    fractional_offset: 0.0,
                    target_floor: None,
                    run_state: RunState::Stopped,
                    passengers: vec![],
                },
            ],
            floors: vec![PollFloor {
                id: 0,
                up_queue: vec![4],
                down_queue: vec![],
            }],
            passengers: vec![
                PollPassenger {
                    id: 3,
                    origin: 1,
                    destination: 5,
                    arrive_tick: 2,
                    pickup_tick: Some(8),
                    dropoff_tick: None,
                    elevator_id: Some(0),
                    arrived: false,
                },
                PollPassenger {
                    id: 4,
                    origin: 0,
                    destination: 2,
                    arrive_tick: 15,
                    pickup_tick: None,
                    dropoff_tick: None,
                    elevator_id: None,
                    arrived: false,
                },
                PollPassenger {
                    id: 5,
                    origin: 4,
                    destination: 1,
                    arrive_tick: 1,
                    pickup_tick: Some(3),
                    dropoff_tick: Some(9),
                    elevator_id: None,
                    arrived: true,
                },
            ],
            metrics: None,
        }
    }

    #[test]
    fn poll_position_rounds_to_one_decimal() {
        let scene = from_poll(&poll_state()).unwrap();
        assert!((scene.elevators[&0].position - 2.5).abs() < f64::EPSILON);
        assert!((scene.elevators[&1].position - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn poll_derives_idle_and_direction() {
        let scene = from_poll(&poll_state()).unwrap();
        let moving = &scene.elevators[&0];
        assert!(!moving.is_idle);
        assert_eq!(moving.target_direction, Direction::Up);
        let idle = &scene.elevators[&1];
        assert!(idle.is_idle);
        assert_eq!(idle.target_direction, Direction::Stopped);
        assert_eq!(idle.target_floor, None);
    }

    #[test]
    fn poll_derives_passenger_lifecycle() {
        let scene = from_poll(&poll_state()).unwrap();
        assert_eq!(scene.passengers[&3].status, PassengerStatus::InElevator);
        assert_eq!(scene.passengers[&3].wait_time, 6);
        assert_eq!(scene.passengers[&4].status, PassengerStatus::Waiting);
        assert_eq!(scene.passengers[&5].status, PassengerStatus::Arrived);
        assert_eq!(scene.passengers[&5].system_time, 8);
        assert_eq!(scene.passengers[&5].travel_direction, Direction::Down);
    }

    #[test]
    fn normalization_is_idempotent() {
        let state = poll_state();
        assert_eq!(from_poll(&state).unwrap(), from_poll(&state).unwrap());
    }

    #[test]
    fn duplicate_tick_sentinel_detects_completion() {
        let mut state = poll_state();
        state.passengers[0].pickup_tick = Some(5);
        state.passengers[0].dropoff_tick = Some(5);
        let scene = from_poll(&state).unwrap();
        assert!(run_finished(&scene));

        state.passengers[0].dropoff_tick = Some(7);
        let scene = from_poll(&state).unwrap();
        assert!(!run_finished(&scene));
    }

    #[test]
    fn zero_ticks_do_not_trip_the_sentinel() {
        let mut state = poll_state();
        state.passengers[1].pickup_tick = Some(0);
        state.passengers[1].dropoff_tick = Some(0);
        let scene = from_poll(&state).unwrap();
        assert!(!run_finished(&scene));
    }

    #[test]
    fn degenerate_building_is_rejected() {
        let mut state = poll_state();
        state.building.floors = 0;
        assert!(matches!(from_poll(&state), Err(WireError::Scene(_))));
    }

    #[test]
    fn traffic_payload_decodes() {
        let t: PollTraffic = serde_json::from_str(r#"{"max_tick": 50}"#).unwrap();
        assert_eq!(t.max_tick, 50);
    }
}
