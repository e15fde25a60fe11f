use std::sync::Arc;

use log::debug;
use perf_timeline_protocol::{RenderCommand, ThemeToken};

use crate::config::TimelineConfig;
use crate::hit_test;
use crate::model::{MouseState, PlaybackCursor, TimelineEvent, TrackMap, Viewport};
use crate::text::{ApproxTextMetrics, TextMeasure};
use crate::views::{FrameContext, events, lanes, legend, time_cursor, time_grid, tooltip};

/// A drawing target for finished frames.
///
/// Surfaces receive the complete command list of one repaint and measure
/// text for the label-fitting step that produces it.
pub trait Surface: TextMeasure {
    fn present(&mut self, commands: &[RenderCommand]);

    /// Called whenever the renderer adopts new dimensions, before the next
    /// frame is presented. Surfaces that size their output track it here.
    fn resize(&mut self, _width: f64, _height: f64) {}
}

/// A surface that keeps the most recent frame in memory.
///
/// Used by immediate-mode hosts, which replay the commands into their own
/// painter, and by tests.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<RenderCommand>,
    frames_presented: u64,
    metrics: ApproxTextMetrics,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: ApproxTextMetrics) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    /// Commands of the last presented frame.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of frames presented so far.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl TextMeasure for CommandBuffer {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        self.metrics.text_width(text, font_size)
    }
}

impl Surface for CommandBuffer {
    fn present(&mut self, commands: &[RenderCommand]) {
        self.commands.clear();
        self.commands.extend_from_slice(commands);
        self.frames_presented += 1;
    }
}

/// The draw pipeline.
///
/// A plain stateful object: setters store the latest inputs and
/// [`TimelineRenderer::draw_timeline`] repaints everything from them. Without
/// a surface every draw is a silent no-op.
pub struct TimelineRenderer<S: Surface> {
    surface: Option<S>,
    config: TimelineConfig,
    width: f64,
    height: f64,
    tracks: Arc<TrackMap>,
    viewport: Viewport,
    mouse: MouseState,
    cursor: Option<PlaybackCursor>,
}

impl<S: Surface> TimelineRenderer<S> {
    /// Out-of-range config values are repaired, see [`TimelineConfig::sanitized`].
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            surface: None,
            config: config.sanitized(),
            width: 0.0,
            height: 0.0,
            tracks: Arc::new(TrackMap::new()),
            viewport: Viewport::default(),
            mouse: MouseState::default(),
            cursor: None,
        }
    }

    /// Renderer drawing into `surface`, sized `width` x `height` device pixels.
    pub fn with_surface(config: TimelineConfig, surface: S, width: f64, height: f64) -> Self {
        let mut renderer = Self::new(config);
        renderer.surface = Some(surface);
        renderer.set_size(width, height);
        renderer
    }

    pub fn attach_surface(&mut self, surface: S) {
        self.surface = Some(surface);
    }

    /// Take the surface out; subsequent draws do nothing.
    pub fn detach_surface(&mut self) -> Option<S> {
        self.surface.take()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn tracks(&self) -> &Arc<TrackMap> {
        &self.tracks
    }

    pub fn set_tracks(&mut self, tracks: Arc<TrackMap>) {
        self.tracks = tracks;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_mouse_state(&mut self, mouse: MouseState) {
        self.mouse = mouse;
    }

    /// Set or clear the replay cursor.
    pub fn set_current_time(&mut self, cursor: Option<PlaybackCursor>) {
        self.cursor = cursor;
    }

    /// Adopt new surface dimensions and repaint.
    pub fn resize_canvas(&mut self, width: f64, height: f64) {
        self.set_size(width, height);
        debug!("surface resized to {}x{}", self.width, self.height);
        self.draw_timeline();
    }

    fn set_size(&mut self, width: f64, height: f64) {
        let sanitize = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        self.width = sanitize(width);
        self.height = sanitize(height);
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(self.width, self.height);
        }
    }

    /// Hit-test against the current tracks and viewport.
    pub fn find_event_at_position(&self, x: f64, y: f64) -> Option<&TimelineEvent> {
        hit_test::find_event_at_position(&self.tracks, &self.viewport, &self.config, x, y)
    }

    /// Build the full command list for the current inputs.
    ///
    /// Layers, each over the previous: background, time grid, legend,
    /// lanes, events, time cursor, tooltip.
    pub fn build_frame(&self, metrics: &dyn TextMeasure) -> Vec<RenderCommand> {
        let ctx = FrameContext {
            config: &self.config,
            viewport: &self.viewport,
            tracks: &self.tracks,
            mouse: &self.mouse,
            cursor: self.cursor.as_ref(),
            width: self.width,
            height: self.height,
            metrics,
        };

        let mut commands = vec![RenderCommand::Clear {
            color: ThemeToken::Background.into(),
        }];
        commands.extend(time_grid::render_time_grid(&ctx));
        commands.extend(legend::render_legend(&ctx));
        commands.extend(lanes::render_lanes(&ctx));
        commands.extend(events::render_events(&ctx));
        commands.extend(time_cursor::render_time_cursor(&ctx));
        commands.extend(tooltip::render_tooltip(&ctx));
        commands
    }

    /// Repaint the whole timeline. Idempotent for unchanged inputs.
    pub fn draw_timeline(&mut self) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let commands = self.build_frame(surface);
        if let Some(surface) = self.surface.as_mut() {
            surface.present(&commands);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_support::{track, tracks};

    fn renderer() -> TimelineRenderer<CommandBuffer> {
        let mut r = TimelineRenderer::with_surface(
            TimelineConfig::default(),
            CommandBuffer::new(),
            800.0,
            300.0,
        );
        r.set_tracks(Arc::new(tracks(vec![track(
            "render",
            &[("1", "App", 100.0, 20.0)],
        )])));
        r
    }

    fn group_order(cmds: &[RenderCommand]) -> Vec<String> {
        cmds.iter()
            .filter_map(|c| match c {
                RenderCommand::BeginGroup { id } => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn layers_in_fixed_order() {
        let mut r = renderer();
        r.set_current_time(Some(PlaybackCursor::new(50.0, true)));
        r.set_mouse_state(MouseState {
            is_hovering: true,
            hover_event: Some(TimelineEvent::new("1", "App", 100.0, 20.0, "render")),
            hover_position: Some(perf_timeline_protocol::Point::new(105.0, 60.0)),
            ..MouseState::default()
        });
        r.draw_timeline();

        let cmds = r.surface().map(CommandBuffer::commands).unwrap_or_default();
        assert!(matches!(cmds.first(), Some(RenderCommand::Clear { .. })));
        assert_eq!(
            group_order(cmds),
            ["time-grid", "legend", "lanes", "events", "time-cursor", "tooltip"]
        );
    }

    #[test]
    fn repaint_is_idempotent() {
        let mut r = renderer();
        r.draw_timeline();
        let first = r.surface().map(|s| s.commands().to_vec());
        r.draw_timeline();
        let second = r.surface().map(|s| s.commands().to_vec());
        assert_eq!(first, second);
        assert_eq!(r.surface().map(CommandBuffer::frames_presented), Some(2));
    }

    #[test]
    fn no_surface_is_a_silent_noop() {
        let mut r = renderer();
        let surface = r.detach_surface();
        r.draw_timeline();
        r.resize_canvas(100.0, 100.0);
        assert_eq!(surface.as_ref().map(CommandBuffer::frames_presented), Some(0));
        assert!(r.surface().is_none());
    }

    #[test]
    fn resize_repaints_with_new_width() {
        let mut r = renderer();
        r.resize_canvas(400.0, 200.0);
        assert_eq!(r.size(), (400.0, 200.0));
        let cmds = r.surface().map(CommandBuffer::commands).unwrap_or_default();
        let background = cmds.iter().find_map(|c| match c {
            RenderCommand::DrawRect { rect, .. } => Some(rect.w),
            _ => None,
        });
        assert_eq!(background, Some(400.0));
    }

    #[test]
    fn negative_sizes_are_clamped() {
        let mut r = renderer();
        r.resize_canvas(-5.0, f64::NAN);
        assert_eq!(r.size(), (0.0, 0.0));
    }
}
