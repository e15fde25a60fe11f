use perf_timeline_protocol::Point;
use serde::{Deserialize, Serialize};

use super::event::TimelineEvent;

/// Transient pointer state. Never persisted; reset on pointer-leave.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MouseState {
    pub is_dragging: bool,
    pub last_x: f64,
    /// True while the pointer rests over an event; drives the tooltip.
    pub is_hovering: bool,
    pub hover_event: Option<TimelineEvent>,
    pub hover_position: Option<Point>,
}

impl MouseState {
    pub fn clear_hover(&mut self) {
        self.is_hovering = false;
        self.hover_event = None;
        self.hover_position = None;
    }
}

/// Replay position pushed in by the session-replay player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackCursor {
    /// Milliseconds from the session baseline. Negative means "no position".
    pub current_time: f64,
    pub is_playing: bool,
}

impl PlaybackCursor {
    pub fn new(current_time: f64, is_playing: bool) -> Self {
        Self {
            current_time,
            is_playing,
        }
    }

    pub fn is_positioned(&self) -> bool {
        self.current_time.is_finite() && self.current_time >= 0.0
    }
}
