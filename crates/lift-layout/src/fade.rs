// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Horizontal opacity ramp for glyphs near the canvas edges.
//!
//! Queues grow toward the canvas edges; rather than clip them hard, glyph
//! opacity fades linearly across two bands. The ramp is a function of
//! horizontal position only and is independent of simulation state.

/// Pixel boundaries of the show-in and fade-out bands.
///
/// Layout: `show_start < show_end <= fade_start < fade_end`. Opacity is 0
/// outside `[show_start, fade_end]`, 1 inside `[show_end, fade_start]`,
/// and linear within each band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FadeBands {
    /// Left edge where glyphs begin to appear.
    pub show_start: f32,
    /// Point at which glyphs reach full opacity.
    pub show_end: f32,
    /// Point at which glyphs begin to fade.
    pub fade_start: f32,
    /// Right edge beyond which glyphs are invisible.
    pub fade_end: f32,
}

impl FadeBands {
    /// Standard bands for a canvas of the given width, at the width
    /// fractions the dashboard has always used.
    pub fn standard(width: f32) -> Self {
        Self {
            show_start: width * 0.025,
            show_end: width * 0.15,
            fade_start: width * 0.85,
            fade_end: width * 0.96,
        }
    }

    /// Opacity in `[0, 1]` for a glyph at horizontal position `x`.
    pub fn opacity(&self, x: f32) -> f32 {
        if x < self.show_start || x > self.fade_end {
            0.0
        } else if x < self.show_end {
            (x - self.show_start) / (self.show_end - self.show_start)
        } else if x <= self.fade_start {
            1.0
        } else {
            1.0 - (x - self.fade_start) / (self.fade_end - self.fade_start)
        }
    }
}
