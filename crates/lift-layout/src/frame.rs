// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Derived canvas constants and the floor/elevator coordinate system.
//!
//! Canvas space is top-left origin with y growing downward. Floors stack
//! vertically, centered as a group; elevator columns sit side by side,
//! centered horizontally. All constants are computed once per
//! (canvas, building) pairing and cached in [`Frame`].

use lift_scene::{Building, Elevator, ElevatorId, FloorId};

/// Vertical extent of one floor row, in pixels.
pub const FLOOR_HEIGHT: f32 = 40.0;

/// Gap between adjacent elevator columns.
pub const PADDING_LARGE: f32 = 5.0;

/// Inner padding around a passenger glyph within its cell.
pub const PADDING_SMALL: f32 = 2.5;

/// A point in canvas space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Horizontal pixel coordinate.
    pub x: f32,
    /// Vertical pixel coordinate (grows downward).
    pub y: f32,
}

/// Axis-aligned rectangle, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

/// Cached layout constants for one canvas and building.
#[derive(Clone, Copy, Debug)]
pub struct Frame {
    width: f32,
    height: f32,
    floors: u32,
    elevators: u32,
    cell: f32,
    passenger_size: f32,
    first_floor_y: f32,
    elevator_width: f32,
}

impl Frame {
    /// Derive layout constants for a canvas of `width` x `height` pixels.
    pub fn new(width: f32, height: f32, building: &Building) -> Self {
        let cell = FLOOR_HEIGHT / 2.0;
        let capacity_cols = building.elevator_capacity.div_ceil(2);
        let elevator_width = FLOOR_HEIGHT + capacity_cols as f32 * cell;
        let center_y = height / 2.0;
        let first_floor_y = center_y + (building.floors as f32 / 2.0) * FLOOR_HEIGHT;
        Self {
            width,
            height,
            floors: building.floors,
            elevators: building.elevators,
            cell,
            passenger_size: cell - PADDING_SMALL * 2.0,
            first_floor_y,
            elevator_width,
        }
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Side length of one passenger/queue cell.
    pub fn cell(&self) -> f32 {
        self.cell
    }

    /// Side length of a passenger glyph.
    pub fn passenger_size(&self) -> f32 {
        self.passenger_size
    }

    /// Width of one elevator column (label area plus capacity cells).
    pub fn elevator_width(&self) -> f32 {
        self.elevator_width
    }

    /// Reference-line y-coordinate for a floor. Floor 0 is lowest;
    /// increasing ids move up the canvas.
    pub fn floor_y(&self, floor: FloorId) -> f32 {
        self.first_floor_y - floor as f32 * FLOOR_HEIGHT
    }

    /// Left edge of an elevator column. Columns are laid out left to right
    /// by car id and centered as a group.
    pub fn elevator_x(&self, id: ElevatorId) -> f32 {
        let n = self.elevators as f32;
        let group = n * self.elevator_width + PADDING_LARGE * (n - 1.0);
        self.width / 2.0 - group / 2.0 + id as f32 * (self.elevator_width + PADDING_LARGE)
    }

    /// Bounding rectangle of a car. The vertical position interpolates
    /// continuously with the car's floor coordinate, so mid-transit frames
    /// render between reference lines.
    pub fn elevator_rect(&self, car: &Elevator) -> Rect {
        Rect {
            x: self.elevator_x(car.id),
            y: self.first_floor_y - (1.0 + car.position as f32) * FLOOR_HEIGHT,
            w: self.elevator_width,
            h: FLOOR_HEIGHT,
        }
    }

    /// Waiting boundary: the x-coordinate immediately left of the leftmost
    /// elevator column. Waiting queues right-align against it.
    pub fn waiting_right_x(&self) -> f32 {
        self.elevator_x(0) - PADDING_LARGE
    }

    /// Arrived boundary: the x-coordinate immediately right of the
    /// rightmost elevator column. Arrived grids left-align against it.
    pub fn arrived_left_x(&self) -> f32 {
        self.elevator_x(self.elevators.saturating_sub(1)) + self.elevator_width + PADDING_LARGE
    }

    /// Reference-line y-coordinates for every floor, floor 0 first.
    pub fn floor_lines(&self) -> Vec<f32> {
        (0..self.floors).map(|f| self.floor_y(f)).collect()
    }
}
