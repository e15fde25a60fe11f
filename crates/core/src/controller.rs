use std::sync::Arc;

use log::{debug, trace};
use perf_timeline_protocol::Point;

use crate::model::{MouseState, PlaybackCursor, TimelineEvent, TrackMap, Viewport, tracks_time_range};
use crate::renderer::{Surface, TimelineRenderer};

/// Zoom factor for one wheel notch away from the user (zoom out).
const ZOOM_OUT: f64 = 0.9;
/// Zoom factor for one wheel notch towards the user (zoom in).
const ZOOM_IN: f64 = 1.1;

/// Invoked with the clicked event; hosts typically seek their replay to
/// `event.start_time`.
pub type EventClickHandler = Box<dyn FnMut(&TimelineEvent)>;

/// Owns the viewport and pointer state and turns wheel/pointer input into
/// state changes.
///
/// Dragging and hovering are independent flags, but hover is not computed
/// while a drag is in progress. Every public mutator ends by pushing the
/// new state into the renderer and repainting.
pub struct InteractionController<S: Surface> {
    renderer: TimelineRenderer<S>,
    viewport: Viewport,
    mouse: MouseState,
    /// Pointer-down position, for telling clicks from drags.
    press_x: Option<f64>,
    playback: Option<PlaybackCursor>,
    on_event_click: Option<EventClickHandler>,
}

impl<S: Surface> InteractionController<S> {
    pub fn new(renderer: TimelineRenderer<S>) -> Self {
        let mut controller = Self {
            renderer,
            viewport: Viewport::default(),
            mouse: MouseState::default(),
            press_x: None,
            playback: None,
            on_event_click: None,
        };
        controller.commit();
        controller
    }

    pub fn renderer(&self) -> &TimelineRenderer<S> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut TimelineRenderer<S> {
        &mut self.renderer
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn mouse_state(&self) -> &MouseState {
        &self.mouse
    }

    pub fn playback(&self) -> Option<&PlaybackCursor> {
        self.playback.as_ref()
    }

    pub fn set_on_event_click(&mut self, handler: impl FnMut(&TimelineEvent) + 'static) {
        self.on_event_click = Some(Box::new(handler));
    }

    pub fn clear_on_event_click(&mut self) {
        self.on_event_click = None;
    }

    /// Replace the whole working set of tracks.
    ///
    /// A hover referring to the previous set is dropped, since its event may
    /// no longer exist.
    pub fn replace_tracks(&mut self, tracks: impl Into<Arc<TrackMap>>) {
        let tracks = tracks.into();
        debug!(
            "replacing tracks: {} tracks, {} events",
            tracks.len(),
            tracks.values().map(|t| t.events.len()).sum::<usize>()
        );
        self.renderer.set_tracks(tracks);
        self.mouse.clear_hover();
        self.commit();
    }

    /// Update or tear down the replay cursor.
    pub fn set_playback(&mut self, playback: Option<PlaybackCursor>) {
        self.playback = playback;
        self.commit();
    }

    /// Zoom about the pointer. Returns `true`: the wheel gesture is always
    /// consumed, so hosts should suppress page scrolling.
    pub fn handle_wheel(&mut self, x: f64, delta_y: f64) -> bool {
        let factor = if delta_y > 0.0 { ZOOM_OUT } else { ZOOM_IN };
        self.viewport.zoom_about(x, factor);
        trace!(
            "wheel at {x}: scale {:.4}, offset {:.1}",
            self.viewport.scale(),
            self.viewport.offset_x()
        );
        self.commit();
        true
    }

    pub fn pointer_down(&mut self, x: f64, _y: f64) {
        self.mouse.is_dragging = true;
        self.mouse.last_x = x;
        self.mouse.clear_hover();
        self.press_x = Some(x);
        trace!("drag start at {x}");
        self.commit();
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.mouse.is_dragging {
            self.viewport.pan_by(x - self.mouse.last_x);
            self.mouse.last_x = x;
        } else {
            self.update_hover(x, y);
        }
        self.commit();
    }

    /// End a drag. A release within the click threshold of the press counts
    /// as a click on whatever event lies under the pointer.
    pub fn pointer_up(&mut self, x: f64, y: f64) {
        let was_dragging = self.mouse.is_dragging;
        self.mouse.is_dragging = false;
        let press_x = self.press_x.take();

        if was_dragging
            && press_x.is_some_and(|px| (x - px).abs() < self.renderer.config().click_threshold)
        {
            self.handle_click(x, y);
        }
        self.update_hover(x, y);
        self.commit();
    }

    /// The pointer left the surface: drop drag and hover unconditionally.
    pub fn pointer_leave(&mut self) {
        self.mouse.is_dragging = false;
        self.mouse.clear_hover();
        self.press_x = None;
        self.commit();
    }

    /// Resolve `(x, y)` to an event and, on a hit, notify the click handler.
    pub fn handle_click(&mut self, x: f64, y: f64) -> Option<TimelineEvent> {
        let event = self.renderer.find_event_at_position(x, y).cloned()?;
        debug!("clicked event {:?} at {}ms", event.id, event.start_time);
        if let Some(handler) = self.on_event_click.as_mut() {
            handler(&event);
        }
        Some(event)
    }

    /// Back to the natural window: offset 0, one pixel per millisecond.
    pub fn reset_view(&mut self) {
        self.viewport = Viewport::default();
        self.commit();
    }

    /// Zoom so every recorded event fits the surface width.
    pub fn fit_to_tracks(&mut self) {
        let (width, _) = self.renderer.size();
        if let Some((start, end)) = tracks_time_range(self.renderer.tracks()) {
            self.viewport.fit(start, end, width);
        }
        self.commit();
    }

    /// Pan by `dx` pixels (keyboard or trackpad scrolling).
    pub fn pan_by(&mut self, dx: f64) {
        self.viewport.pan_by(dx);
        self.commit();
    }

    /// Zoom by an arbitrary factor about pixel `x` (keyboard, pinch).
    pub fn zoom_by(&mut self, x: f64, factor: f64) {
        self.viewport.zoom_about(x, factor);
        self.commit();
    }

    /// The host surface changed size.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.push_state();
        self.renderer.resize_canvas(width, height);
    }

    /// Repaint without a state change (e.g. after a theme switch).
    pub fn redraw(&mut self) {
        self.commit();
    }

    fn update_hover(&mut self, x: f64, y: f64) {
        match self.renderer.find_event_at_position(x, y).cloned() {
            Some(event) => {
                self.mouse.is_hovering = true;
                self.mouse.hover_event = Some(event);
                self.mouse.hover_position = Some(Point::new(x, y));
            }
            None => self.mouse.clear_hover(),
        }
    }

    fn push_state(&mut self) {
        self.renderer.set_viewport(self.viewport);
        self.renderer.set_mouse_state(self.mouse.clone());
        self.renderer.set_current_time(self.playback);
    }

    fn commit(&mut self) {
        self.push_state();
        self.renderer.draw_timeline();
    }
}
