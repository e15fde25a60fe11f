use perf_timeline_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};

use super::FrameContext;
use crate::text::format_ms;

const DOT_RADIUS: f64 = 4.0;
const PILL_GAP: f64 = 6.0;
const PILL_PADDING_X: f64 = 4.0;
const PILL_HEIGHT: f64 = 14.0;

/// Render the replay position as a vertical line with a dot on the tick
/// row and a time label beside it.
///
/// Nothing is drawn when no cursor is set, when its time is negative, or
/// when it falls outside the visible window.
pub fn render_time_cursor(ctx: &FrameContext<'_>) -> Vec<RenderCommand> {
    let Some(cursor) = ctx.cursor.filter(|c| c.is_positioned()) else {
        return Vec::new();
    };
    let x = ctx.viewport.time_to_pixel(cursor.current_time);
    if x < 0.0 || x > ctx.width {
        return Vec::new();
    }

    let color = if cursor.is_playing {
        ThemeToken::CursorPlaying
    } else {
        ThemeToken::CursorPaused
    };
    let row_height = ctx.config.time_markers_height;
    let font_size = ctx.config.tick_font_size;

    let label = format_ms(cursor.current_time);
    let pill_width = ctx.metrics.text_width(&label, font_size) + 2.0 * PILL_PADDING_X;
    // Flip the label to the left of the line when it would run off the edge.
    let pill_x = if x + PILL_GAP + pill_width > ctx.width {
        x - PILL_GAP - pill_width
    } else {
        x + PILL_GAP
    };
    let pill_y = (row_height - PILL_HEIGHT) / 2.0;

    vec![
        RenderCommand::BeginGroup {
            id: "time-cursor".into(),
        },
        RenderCommand::DrawLine {
            from: Point::new(x, row_height),
            to: Point::new(x, ctx.height),
            color: color.into(),
            width: 2.0,
        },
        RenderCommand::DrawCircle {
            center: Point::new(x, row_height),
            radius: DOT_RADIUS,
            fill: color.into(),
        },
        RenderCommand::DrawRect {
            rect: Rect::new(pill_x, pill_y, pill_width, PILL_HEIGHT),
            fill: color.into(),
            border: None,
            corner_radius: PILL_HEIGHT / 2.0,
        },
        RenderCommand::DrawText {
            position: Point::new(pill_x + PILL_PADDING_X, pill_y + PILL_HEIGHT / 2.0),
            text: label,
            color: ThemeToken::CursorLabel.into(),
            font_size,
            align: TextAlign::Left,
        },
        RenderCommand::EndGroup,
    ]
}
