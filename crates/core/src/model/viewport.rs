use serde::Serialize;

use crate::transform;

/// Lowest zoom level, in pixels per millisecond.
pub const MIN_SCALE: f64 = 0.01;
/// Highest zoom level, in pixels per millisecond.
pub const MAX_SCALE: f64 = 100.0;

const DEFAULT_SCALE: f64 = 1.0;
const DEFAULT_END_TIME: f64 = 800.0;

/// Mapping between pixel columns and the session's time axis.
///
/// Fields are private: every constructor and mutator clamps `scale` into
/// `[MIN_SCALE, MAX_SCALE]` and `offset_x` to `>= 0`, so a viewport can never
/// hold values that would divide by zero or pan before time zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    offset_x: f64,
    scale: f64,
    start_time: f64,
    end_time: f64,
}

impl Default for Viewport {
    /// The natural window: 0 to 800 ms at one pixel per millisecond.
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            scale: DEFAULT_SCALE,
            start_time: 0.0,
            end_time: DEFAULT_END_TIME,
        }
    }
}

impl Viewport {
    pub fn new(offset_x: f64, scale: f64, start_time: f64, end_time: f64) -> Self {
        let start_time = if start_time.is_finite() { start_time } else { 0.0 };
        let end_time = if end_time.is_finite() && end_time >= start_time {
            end_time
        } else {
            start_time + DEFAULT_END_TIME
        };
        Self {
            offset_x: clamp_offset(offset_x),
            scale: clamp_scale(scale),
            start_time,
            end_time,
        }
    }

    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn time_to_pixel(&self, t: f64) -> f64 {
        transform::time_to_pixel(t, self)
    }

    pub fn pixel_to_time(&self, p: f64) -> f64 {
        transform::pixel_to_time(p, self)
    }

    /// Times at the left and right edges of a surface `width` pixels wide.
    pub fn visible_range(&self, width: f64) -> (f64, f64) {
        (self.pixel_to_time(0.0), self.pixel_to_time(width))
    }

    pub fn set_offset_x(&mut self, offset_x: f64) {
        self.offset_x = clamp_offset(offset_x);
    }

    /// Drag the content by `dx` pixels (positive = content moves right).
    pub fn pan_by(&mut self, dx: f64) {
        self.set_offset_x(self.offset_x - dx);
    }

    /// Multiply the scale by `factor`, keeping the time under pixel `x`
    /// fixed unless the offset clamp at time zero engages.
    pub fn zoom_about(&mut self, x: f64, factor: f64) {
        let time_at_cursor = self.pixel_to_time(x);
        self.scale = clamp_scale(self.scale * factor);
        self.offset_x = clamp_offset((time_at_cursor - self.start_time) * self.scale - x);
    }

    /// Choose the scale that shows `[start, end]` across `width` pixels and
    /// scroll so that `start` sits at the left edge.
    pub fn fit(&mut self, start: f64, end: f64, width: f64) {
        let span = end - start;
        if !span.is_finite() || span <= 0.0 || !width.is_finite() || width <= 0.0 {
            return;
        }
        self.scale = clamp_scale(width / span);
        self.offset_x = clamp_offset((start - self.start_time) * self.scale);
        self.end_time = self.end_time.max(end);
    }
}

fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    } else {
        DEFAULT_SCALE
    }
}

fn clamp_offset(offset_x: f64) -> f64 {
    if offset_x.is_finite() {
        offset_x.max(0.0)
    } else {
        0.0
    }
}
