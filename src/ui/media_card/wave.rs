// SPDX-License-Identifier: MPL-2.0
//! Procedural wave-path geometry for the card decoration.
//!
//! Each wave band is a pair of mirrored half-period quadratic Bézier
//! strokes. The geometry is produced as relative segments so the same
//! function feeds both the on-screen canvas and the SVG document used by
//! the software capture fallback.

/// Number of horizontal wave periods across the card.
pub const WAVE_COUNT: usize = 10;

/// Peak-to-centre amplitude of a wave stroke, in pixels.
pub const WAVE_AMPLITUDE: f32 = 15.0;

/// Vertical distance between wave bands, in pixels.
pub const WAVE_SPACING: f32 = 25.0;

/// Stroke width of a wave line.
pub const WAVE_STROKE_WIDTH: f32 = 2.0;

/// Rotation of the whole wave field, in degrees.
pub const WAVE_TILT_DEGREES: f32 = -15.0;

/// Vertical start of the first band relative to the card top.
pub const WAVE_BAND_START: f32 = -150.0;

/// Phase shift between consecutive bands, in fractions of the width.
pub const WAVE_BAND_PHASE_STEP: f32 = 0.5;

/// Full animation period of the wave drift.
pub const WAVE_PERIOD: std::time::Duration = std::time::Duration::from_secs(30);

/// One relative path segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Pen-up move by the given delta.
    MoveBy(f32, f32),
    /// Quadratic Bézier with a relative control point and end point.
    QuadBy { ctrl: (f32, f32), to: (f32, f32) },
}

/// A wave stroke: an absolute start point followed by relative segments.
#[derive(Debug, Clone, PartialEq)]
pub struct WavePath {
    pub start: (f32, f32),
    pub segments: Vec<Segment>,
}

/// Builds one wave stroke across `width` pixels.
///
/// `direction` selects which half of the sine-like shape is drawn (`1`
/// bulges down, `-1` bulges up); drawing both directions at the same
/// position forms the full wave. `offset` shifts the phase in pixels and
/// may exceed the width (it wraps).
#[must_use]
pub fn wave_path(direction: i8, width: f32, amplitude: f32, waves: usize, offset: f32) -> WavePath {
    let y_offset = amplitude / 2.0;
    let half_period = (width / (waves.saturating_sub(1).max(1) as f32)) / 2.0;
    let offset_px = {
        let wrapped = offset % width;
        wrapped - if offset > 0.0 { width } else { 0.0 }
    };

    let start = (-half_period / 2.0 + offset_px, y_offset);
    let segment_count = ((width * 2.0) / half_period + 1.0).ceil() as usize;
    let mut segments = Vec::with_capacity(segment_count);

    for i in 0..segment_count {
        if (i % 2 == 0) != (direction == 1) {
            segments.push(Segment::MoveBy(half_period, 0.0));
        } else {
            segments.push(Segment::QuadBy {
                ctrl: (half_period / 2.0, amplitude / 2.0 * f32::from(direction)),
                to: (half_period, 0.0),
            });
        }
    }

    WavePath { start, segments }
}

impl WavePath {
    /// Shifts the stroke vertically (used to place a band).
    #[must_use]
    pub fn translated(mut self, dy: f32) -> Self {
        self.start.1 += dy;
        self
    }

    /// Renders the stroke as SVG path data.
    #[must_use]
    pub fn to_svg_data(&self) -> String {
        let mut data = format!("M {:.2} {:.2}", self.start.0, self.start.1);
        for segment in &self.segments {
            match segment {
                Segment::MoveBy(dx, dy) => {
                    data.push_str(&format!(" m {dx:.2} {dy:.2}"));
                }
                Segment::QuadBy { ctrl, to } => {
                    data.push_str(&format!(
                        " q {:.2} {:.2} {:.2} {:.2}",
                        ctrl.0, ctrl.1, to.0, to.1
                    ));
                }
            }
        }
        data
    }

    /// Walks the stroke as absolute points, for canvas path building.
    ///
    /// The callback receives each quadratic segment with absolute control
    /// and end points; pen-up moves only advance the cursor.
    pub fn for_each_quad(&self, mut draw: impl FnMut((f32, f32), (f32, f32), (f32, f32))) {
        let mut cursor = self.start;
        for segment in &self.segments {
            match segment {
                Segment::MoveBy(dx, dy) => {
                    cursor = (cursor.0 + dx, cursor.1 + dy);
                }
                Segment::QuadBy { ctrl, to } => {
                    let abs_ctrl = (cursor.0 + ctrl.0, cursor.1 + ctrl.1);
                    let abs_to = (cursor.0 + to.0, cursor.1 + to.1);
                    draw(cursor, abs_ctrl, abs_to);
                    cursor = abs_to;
                }
            }
        }
    }
}

/// Number of wave bands needed to cover a card of the given size.
#[must_use]
pub fn band_count(width: f32, height: f32) -> usize {
    (width.max(height) / WAVE_SPACING) as usize
}

/// Vertical position of the nth band.
#[must_use]
pub fn band_position(band: usize) -> f32 {
    WAVE_SPACING * band as f32 + WAVE_BAND_START
}

/// Phase offset of the nth band, in pixels, for the given animation
/// progress (0.0..1.0 over [`WAVE_PERIOD`]).
#[must_use]
pub fn band_offset(band: usize, progress: f32, width: f32) -> f32 {
    (band as f32 * WAVE_BAND_PHASE_STEP - progress) * width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_path_alternates_moves_and_quads() {
        let path = wave_path(1, 100.0, 15.0, WAVE_COUNT, 0.0);

        let mut saw_move = false;
        let mut saw_quad = false;
        for (i, segment) in path.segments.iter().enumerate() {
            match segment {
                Segment::QuadBy { .. } => {
                    saw_quad = true;
                    assert_eq!(i % 2, 0, "draw strokes sit on even slots for direction 1");
                }
                Segment::MoveBy(..) => {
                    saw_move = true;
                    assert_eq!(i % 2, 1, "pen-up moves sit on odd slots for direction 1");
                }
            }
        }
        assert!(saw_move && saw_quad);

        // Both directions produce the same number of segments so the two
        // strokes interleave into one continuous wave.
        let mirrored = wave_path(-1, 100.0, 15.0, WAVE_COUNT, 0.0);
        assert_eq!(path.segments.len(), mirrored.segments.len());
    }

    #[test]
    fn directions_bulge_opposite_ways() {
        let down = wave_path(1, 100.0, 16.0, 5, 0.0);
        let up = wave_path(-1, 100.0, 16.0, 5, 0.0);

        let ctrl_of = |path: &WavePath| {
            path.segments
                .iter()
                .find_map(|s| match s {
                    Segment::QuadBy { ctrl, .. } => Some(ctrl.1),
                    Segment::MoveBy(..) => None,
                })
                .expect("path should contain a quad segment")
        };

        assert!(ctrl_of(&down) > 0.0);
        assert!(ctrl_of(&up) < 0.0);
    }

    #[test]
    fn offset_wraps_within_one_width() {
        let path = wave_path(1, 100.0, 15.0, WAVE_COUNT, 250.0);
        // 250 % 100 - 100 = -50
        assert!((path.start.0 - (-50.0 - path_half_period(100.0) / 2.0)).abs() < 0.01);

        let path_zero = wave_path(1, 100.0, 15.0, WAVE_COUNT, 0.0);
        assert!((path_zero.start.0 - (-path_half_period(100.0) / 2.0)).abs() < 0.01);
    }

    fn path_half_period(width: f32) -> f32 {
        (width / (WAVE_COUNT as f32 - 1.0)) / 2.0
    }

    #[test]
    fn strokes_cover_double_width() {
        // Segments must extend past 2x width so the phase shift never
        // exposes a gap.
        let width = 120.0;
        let path = wave_path(1, width, 15.0, WAVE_COUNT, 0.0);

        let mut end = path.start.0;
        path.for_each_quad(|_, _, to| end = end.max(to.0));
        let total: f32 = path
            .segments
            .iter()
            .map(|s| match s {
                Segment::MoveBy(dx, _) => *dx,
                Segment::QuadBy { to, .. } => to.0,
            })
            .sum();
        assert!(path.start.0 + total >= width * 2.0);
        assert!(end > width);
    }

    #[test]
    fn svg_data_starts_with_move() {
        let path = wave_path(1, 50.0, 10.0, 5, 0.0);
        let data = path.to_svg_data();
        assert!(data.starts_with("M "));
        assert!(data.contains(" q "));
    }

    #[test]
    fn translated_moves_start_only() {
        let path = wave_path(1, 50.0, 10.0, 5, 0.0);
        let original_start = path.start;
        let moved = path.clone().translated(30.0);
        assert_eq!(moved.start.0, original_start.0);
        assert!((moved.start.1 - original_start.1 - 30.0).abs() < f32::EPSILON);
        assert_eq!(moved.segments, path.segments);
    }

    #[test]
    fn band_helpers_cover_card() {
        assert_eq!(band_count(250.0, 100.0), 10);
        assert!((band_position(0) - WAVE_BAND_START).abs() < f32::EPSILON);
        assert!(band_position(6) > band_position(5));
    }

    #[test]
    fn band_offset_advances_with_progress() {
        let at_start = band_offset(0, 0.0, 100.0);
        let later = band_offset(0, 0.25, 100.0);
        assert!(later < at_start);

        // Adjacent bands are half a width apart in phase.
        let delta = band_offset(1, 0.0, 100.0) - band_offset(0, 0.0, 100.0);
        assert!((delta - 50.0).abs() < 0.01);
    }
}
