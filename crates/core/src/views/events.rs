use perf_timeline_protocol::{Paint, Point, Rect, RenderCommand, TextAlign, ThemeToken};

use super::FrameContext;
use crate::model::{TimelineEvent, Viewport};
use crate::text::fit_label;

/// Vertical inset of an event bar inside its lane.
const BAR_INSET_Y: f64 = 2.0;
const LABEL_PADDING_X: f64 = 4.0;

/// Horizontal extent of an event on screen, snapped to whole pixels.
///
/// Always at least one pixel wide so zero-length events stay visible.
pub fn event_span(event: &TimelineEvent, viewport: &Viewport) -> (f64, f64) {
    let x = viewport.time_to_pixel(event.start_time).round();
    let end_x = viewport.time_to_pixel(event.end_time()).round();
    (x, (end_x - x).max(1.0))
}

/// Render every visible event as a rounded bar in its track's color, with
/// the label overlaid when the bar is wide enough.
pub fn render_events(ctx: &FrameContext<'_>) -> Vec<RenderCommand> {
    let config = ctx.config;
    let bar_height = (config.track_height - 2.0 * BAR_INSET_Y).max(1.0);
    let event_count: usize = ctx.tracks.values().map(|t| t.events.len()).sum();
    let mut commands = Vec::with_capacity(event_count * 2 + 2);

    commands.push(RenderCommand::BeginGroup { id: "events".into() });
    for (index, track) in ctx.tracks.values().enumerate() {
        let lane_top = config.track_y(index);
        let bar_y = lane_top + BAR_INSET_Y;
        let center_y = lane_top + config.track_height / 2.0;

        for event in &track.events {
            let (x, width) = event_span(event, ctx.viewport);

            // Cull off-screen bars (drawing only; hit-testing ignores this).
            if x + width < 0.0 || x > ctx.width {
                continue;
            }

            commands.push(RenderCommand::DrawRect {
                rect: Rect::new(x, bar_y, width, bar_height),
                fill: Paint::Solid(track.color),
                border: Some(ThemeToken::EventBorder.into()),
                corner_radius: config.event_corner_radius.min(width / 2.0),
            });

            if width > config.label_min_width {
                let max_width = width - 2.0 * LABEL_PADDING_X;
                if let Some(text) = fit_label(&event.label, max_width, config.font_size, ctx.metrics)
                {
                    commands.push(RenderCommand::DrawText {
                        position: Point::new(x + LABEL_PADDING_X, center_y),
                        text,
                        color: ThemeToken::EventLabel.into(),
                        font_size: config.font_size,
                        align: TextAlign::Left,
                    });
                }
            }
        }
    }
    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_support::{Fixture, count, track, tracks};

    fn bars(cmds: &[RenderCommand]) -> Vec<Rect> {
        cmds.iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn event_at_identity_scale() {
        let fx = Fixture::new(tracks(vec![track("render", &[("1", "App", 100.0, 20.0)])]));
        let rects = bars(&render_events(&fx.ctx()));
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].x, 100.0);
        assert_eq!(rects[0].w, 20.0);
        assert_eq!(rects[0].y, fx.config.track_y(0) + BAR_INSET_Y);
    }

    #[test]
    fn zero_duration_is_one_pixel() {
        let fx = Fixture::new(tracks(vec![track("input", &[("1", "click", 50.0, 0.0)])]));
        let rects = bars(&render_events(&fx.ctx()));
        assert_eq!(rects[0].w, 1.0);
    }

    #[test]
    fn offscreen_events_are_culled() {
        let fx = Fixture::new(tracks(vec![track(
            "render",
            &[("1", "A", 10.0, 5.0), ("2", "B", 5_000.0, 5.0)],
        )]));
        assert_eq!(bars(&render_events(&fx.ctx())).len(), 1);
    }

    #[test]
    fn labels_only_on_wide_bars() {
        let fx = Fixture::new(tracks(vec![track(
            "render",
            &[("1", "Narrow", 0.0, 15.0), ("2", "Wide", 100.0, 200.0)],
        )]));
        let cmds = render_events(&fx.ctx());
        let texts: Vec<&str> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, ["Wide"]);
    }

    #[test]
    fn long_labels_are_truncated() {
        // 40px bar, 32px for text at 6.6px/char -> 3 chars + ellipsis.
        let fx = Fixture::new(tracks(vec![track(
            "render",
            &[("1", "VeryLongComponentName", 0.0, 40.0)],
        )]));
        let cmds = render_events(&fx.ctx());
        let label = cmds.iter().find_map(|c| match c {
            RenderCommand::DrawText { text, .. } => Some(text.clone()),
            _ => None,
        });
        assert_eq!(label.as_deref(), Some("Ver…"));
    }

    #[test]
    fn lanes_follow_track_order() {
        let fx = Fixture::new(tracks(vec![
            track("network", &[("n", "GET", 0.0, 50.0)]),
            track("render", &[("r", "App", 0.0, 50.0)]),
        ]));
        let rects = bars(&render_events(&fx.ctx()));
        assert_eq!(rects[1].y - rects[0].y, fx.config.track_stride());
        assert_eq!(
            count(&render_events(&fx.ctx()), |c| matches!(c, RenderCommand::BeginGroup { .. })),
            1
        );
    }
}
