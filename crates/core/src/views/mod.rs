//! One module per draw-pipeline layer. Each turns the frame inputs into a
//! list of render commands; the renderer concatenates them in layer order.

pub mod events;
pub mod lanes;
pub mod legend;
pub mod time_cursor;
pub mod time_grid;
pub mod tooltip;

use crate::config::TimelineConfig;
use crate::model::{MouseState, PlaybackCursor, TrackMap, Viewport};
use crate::text::TextMeasure;

/// Everything a layer may read while building one frame.
pub struct FrameContext<'a> {
    pub config: &'a TimelineConfig,
    pub viewport: &'a Viewport,
    pub tracks: &'a TrackMap,
    pub mouse: &'a MouseState,
    pub cursor: Option<&'a PlaybackCursor>,
    pub width: f64,
    pub height: f64,
    pub metrics: &'a dyn TextMeasure,
}
