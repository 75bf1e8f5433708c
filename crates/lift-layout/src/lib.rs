// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Spatial layout engine for the lift dashboard.
//!
//! Everything here is a pure function of (canvas size, building
//! dimensions, scene): no I/O, no cross-call state beyond the derived
//! constants cached in [`Frame`]. The presentation surface feeds the
//! display scene from the envelope through these functions each frame;
//! freeze-frame behavior falls out of the envelope's scene selection, not
//! anything here.

pub mod fade;
pub mod frame;
pub mod place;

pub use fade::FadeBands;
pub use frame::{Frame, Point, Rect, FLOOR_HEIGHT, PADDING_LARGE, PADDING_SMALL};
pub use place::{passenger_positions, queue_markers, QueueMarker};
