// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Passenger placement: waiting queues, in-car grids, arrived grids.
//!
//! Each of the three groups is computed independently and the results are
//! unioned; a passenger absent from all three (for example present in the
//! passenger table but no longer in any queue or car) simply has no
//! position and is omitted from rendering.

use std::collections::BTreeMap;

use lift_scene::{Direction, FloorId, Passenger, PassengerId, PassengerStatus, Scene};

use crate::frame::{Frame, Point, PADDING_SMALL};

/// Direction indicator emitted at the waiting boundary for a non-empty
/// queue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueueMarker {
    /// Floor the queue belongs to.
    pub floor: FloorId,
    /// Queue direction (never `Stopped`).
    pub direction: Direction,
    /// Top-left position of the indicator glyph.
    pub at: Point,
}

/// Top-left pixel positions for every visible passenger in the scene.
pub fn passenger_positions(frame: &Frame, scene: &Scene) -> BTreeMap<PassengerId, Point> {
    let mut out = BTreeMap::new();
    place_waiting(frame, scene, &mut out);
    place_boarded(frame, scene, &mut out);
    place_arrived(frame, scene, &mut out);
    out
}

/// Upper sub-row (up-bound queue) y-coordinate for a floor.
fn up_row_y(frame: &Frame, floor: FloorId) -> f32 {
    frame.floor_y(floor + 1) + PADDING_SMALL * 1.5
}

/// Lower sub-row (down-bound queue) y-coordinate for a floor.
fn down_row_y(frame: &Frame, floor: FloorId) -> f32 {
    frame.floor_y(floor + 1) + frame.cell() + PADDING_SMALL * 0.5
}

fn place_waiting(frame: &Frame, scene: &Scene, out: &mut BTreeMap<PassengerId, Point>) {
    for floor in scene.floors.values() {
        for (queue, y) in [
            (&floor.up_queue, up_row_y(frame, floor.id)),
            (&floor.down_queue, down_row_y(frame, floor.id)),
        ] {
            for (idx, &pid) in queue.iter().enumerate() {
                // front of queue sits closest to the boundary
                let x = frame.waiting_right_x() - (idx as f32 + 1.0) * frame.cell()
                    + PADDING_SMALL;
                out.insert(pid, Point { x, y });
            }
        }
    }
}

fn place_boarded(frame: &Frame, scene: &Scene, out: &mut BTreeMap<PassengerId, Point>) {
    for car in scene.elevators.values() {
        let rect = frame.elevator_rect(car);
        for (idx, &pid) in car.passengers.iter().enumerate() {
            // 2-row grid past the label area, filled column by column in
            // boarding order
            let col = (idx / 2) as f32;
            let row = (idx % 2) as f32;
            let x = rect.x + crate::frame::FLOOR_HEIGHT + col * frame.cell() + PADDING_SMALL;
            let y = rect.y + row * frame.cell() + PADDING_SMALL;
            out.insert(pid, Point { x, y });
        }
    }
}

fn place_arrived(frame: &Frame, scene: &Scene, out: &mut BTreeMap<PassengerId, Point>) {
    // grouped from passenger records alone; a destination floor need not
    // have a `floors` entry (push payloads may omit the table entirely)
    let mut by_floor: BTreeMap<FloorId, Vec<&Passenger>> = BTreeMap::new();
    for p in scene.passengers.values() {
        if p.status == PassengerStatus::Arrived {
            by_floor.entry(p.destination).or_default().push(p);
        }
    }
    for (floor, mut landed) in by_floor {
        // most recently arrived nearest the boundary; id breaks ties so
        // the grid is stable across frames
        landed.sort_by(|a, b| {
            b.dropoff_tick
                .cmp(&a.dropoff_tick)
                .then_with(|| a.id.cmp(&b.id))
        });
        // odd counts get one leading empty slot to keep row parity stable
        let offset = landed.len() % 2;
        for (idx, p) in landed.iter().enumerate() {
            let slot = idx + offset;
            let col = (slot / 2) as f32;
            let row = (slot % 2) as f32;
            let x = frame.arrived_left_x() + col * frame.cell() + PADDING_SMALL;
            let y = frame.floor_y(floor + 1) + row * frame.cell() + PADDING_SMALL;
            out.insert(p.id, Point { x, y });
        }
    }
}

/// Direction indicators at the waiting boundary, one per non-empty queue
/// direction per floor.
pub fn queue_markers(frame: &Frame, scene: &Scene) -> Vec<QueueMarker> {
    let x = frame.waiting_right_x() + PADDING_SMALL;
    let mut markers = Vec::new();
    for floor in scene.floors.values() {
        if !floor.up_queue.is_empty() {
            markers.push(QueueMarker {
                floor: floor.id,
                direction: Direction::Up,
                at: Point {
                    x,
                    y: up_row_y(frame, floor.id),
                },
            });
        }
        if !floor.down_queue.is_empty() {
            markers.push(QueueMarker {
                floor: floor.id,
                direction: Direction::Down,
                at: Point {
                    x,
                    y: down_row_y(frame, floor.id),
                },
            });
        }
    }
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lift_scene::{Building, Elevator, Floor, Passenger, RunState, Tick};
    use std::collections::BTreeMap;

    fn passenger(id: u32, origin: FloorId, destination: FloorId) -> Passenger {
        Passenger {
            id,
            origin,
            destination,
            arrive_tick: 0,
            pickup_tick: None,
            dropoff_tick: None,
            elevator_id: None,
            status: PassengerStatus::Waiting,
            wait_time: 0,
            system_time: 0,
            travel_direction: Direction::between(origin, destination),
        }
    }

    fn arrived(id: u32, destination: FloorId, dropoff: Tick) -> Passenger {
        Passenger {
            status: PassengerStatus::Arrived,
            dropoff_tick: Some(dropoff),
            pickup_tick: Some(dropoff.saturating_sub(4)),
            ..passenger(id, 0, destination)
        }
    }

    fn scene() -> Scene {
        let building = Building {
            floors: 6,
            elevators: 2,
            elevator_capacity: 6,
        };
        let mut floors = BTreeMap::new();
        floors.insert(
            2,
            Floor {
                id: 2,
                up_queue: vec![10, 11, 12],
                down_queue: vec![13],
            },
        );
        floors.insert(
            4,
            Floor {
                id: 4,
                up_queue: vec![],
                down_queue: vec![],
            },
        );
        let mut elevators = BTreeMap::new();
        elevators.insert(
            0,
            Elevator {
                id: 0,
                position: 1.5,
                target_floor: Some(4),
                is_idle: false,
                run_state: RunState::ConstantSpeed,
                target_direction: Direction::Up,
                passengers: vec![20, 21, 22],
            },
        );
        elevators.insert(
            1,
            Elevator {
                id: 1,
                position: 0.0,
                target_floor: None,
                is_idle: true,
                run_state: RunState::Stopped,
                target_direction: Direction::Stopped,
                passengers: vec![],
            },
        );
        let mut passengers = BTreeMap::new();
        for &id in &[10u32, 11, 12, 13] {
            passengers.insert(id, passenger(id, 2, 5));
        }
        for &id in &[20u32, 21, 22] {
            passengers.insert(
                id,
                Passenger {
                    status: PassengerStatus::InElevator,
                    elevator_id: Some(0),
                    ..passenger(id, 0, 4)
                },
            );
        }
        passengers.insert(30, arrived(30, 4, 40));
        passengers.insert(31, arrived(31, 4, 44));
        passengers.insert(32, arrived(32, 4, 42));
        // known to the scene but in no queue, car, or arrived grid
        passengers.insert(99, passenger(99, 5, 0));
        Scene {
            building,
            tick: 50,
            elevators,
            floors,
            passengers,
        }
    }

    #[test]
    fn waiting_queue_spacing_is_exact_cell_multiples() {
        let s = scene();
        let frame = Frame::new(900.0, 600.0, &s.building);
        let pos = passenger_positions(&frame, &s);
        let cell = frame.cell();
        assert_relative_eq!(pos[&10].x - pos[&11].x, cell);
        assert_relative_eq!(pos[&10].x - pos[&12].x, 2.0 * cell);
        // same sub-row
        assert_relative_eq!(pos[&10].y, pos[&11].y);
    }

    #[test]
    fn waiting_passengers_never_overlap_elevator_columns() {
        let s = scene();
        let frame = Frame::new(900.0, 600.0, &s.building);
        let pos = passenger_positions(&frame, &s);
        for &id in &[10u32, 11, 12, 13] {
            assert!(pos[&id].x + frame.passenger_size() < frame.elevator_x(0));
        }
    }

    #[test]
    fn queue_front_sits_nearest_the_boundary() {
        let s = scene();
        let frame = Frame::new(900.0, 600.0, &s.building);
        let pos = passenger_positions(&frame, &s);
        assert!(pos[&10].x > pos[&11].x);
        assert!(pos[&10].x < frame.waiting_right_x());
    }

    #[test]
    fn down_queue_uses_the_lower_sub_row() {
        let s = scene();
        let frame = Frame::new(900.0, 600.0, &s.building);
        let pos = passenger_positions(&frame, &s);
        assert!(pos[&13].y > pos[&10].y);
    }

    #[test]
    fn boarded_grid_fills_column_by_column() {
        let s = scene();
        let frame = Frame::new(900.0, 600.0, &s.building);
        let pos = passenger_positions(&frame, &s);
        // boarding order: 20 top row, 21 bottom row, 22 next column top
        assert_relative_eq!(pos[&20].x, pos[&21].x);
        assert_relative_eq!(pos[&21].y - pos[&20].y, frame.cell());
        assert_relative_eq!(pos[&22].x - pos[&20].x, frame.cell());
        assert_relative_eq!(pos[&22].y, pos[&20].y);
    }

    #[test]
    fn boarded_grid_rides_the_car() {
        let s = scene();
        let frame = Frame::new(900.0, 600.0, &s.building);
        let rect = frame.elevator_rect(&s.elevators[&0]);
        let pos = passenger_positions(&frame, &s);
        assert!(pos[&20].x > rect.x && pos[&20].x < rect.x + rect.w);
        assert!(pos[&20].y > rect.y && pos[&20].y < rect.y + rect.h);
    }

    #[test]
    fn arrived_grid_orders_by_descending_dropoff() {
        let s = scene();
        let frame = Frame::new(900.0, 600.0, &s.building);
        let pos = passenger_positions(&frame, &s);
        // odd count: slot 0 is padding, so 31 (latest) starts the lower row
        let boundary = frame.arrived_left_x();
        assert!(pos[&31].x >= boundary);
        assert!(pos[&31].x <= pos[&32].x);
        assert!(pos[&32].x <= pos[&30].x);
    }

    #[test]
    fn odd_arrived_count_pads_the_leading_slot() {
        let s = scene();
        let frame = Frame::new(900.0, 600.0, &s.building);
        let pos = passenger_positions(&frame, &s);
        // 3 passengers, offset 1: slots 1,2,3 -> rows 1,0,1
        assert!(pos[&31].y > pos[&32].y);
        assert_relative_eq!(pos[&30].y, pos[&31].y);
    }

    #[test]
    fn arrived_passengers_place_without_a_floor_entry() {
        // push payloads can omit the floor table entirely; the arrived
        // grid must come from passenger records alone
        let mut s = scene();
        s.floors.clear();
        let frame = Frame::new(900.0, 600.0, &s.building);
        let pos = passenger_positions(&frame, &s);
        for &id in &[30u32, 31, 32] {
            assert!(pos.contains_key(&id));
            assert!(pos[&id].x >= frame.arrived_left_x());
        }
    }

    #[test]
    fn unplaced_passengers_are_omitted() {
        let s = scene();
        let frame = Frame::new(900.0, 600.0, &s.building);
        let pos = passenger_positions(&frame, &s);
        assert!(!pos.contains_key(&99));
    }

    #[test]
    fn markers_emitted_once_per_non_empty_direction() {
        let s = scene();
        let frame = Frame::new(900.0, 600.0, &s.building);
        let markers = queue_markers(&frame, &s);
        assert_eq!(markers.len(), 2);
        assert!(markers
            .iter()
            .any(|m| m.floor == 2 && m.direction == Direction::Up));
        assert!(markers
            .iter()
            .any(|m| m.floor == 2 && m.direction == Direction::Down));
    }

    #[test]
    fn empty_scene_places_nothing() {
        let s = Scene {
            building: Building {
                floors: 3,
                elevators: 1,
                elevator_capacity: 2,
            },
            tick: 0,
            elevators: BTreeMap::new(),
            floors: BTreeMap::new(),
            passengers: BTreeMap::new(),
        };
        let frame = Frame::new(400.0, 300.0, &s.building);
        assert!(passenger_positions(&frame, &s).is_empty());
        assert!(queue_markers(&frame, &s).is_empty());
    }
}
