use perf_timeline_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};

use super::FrameContext;
use crate::model::TimelineEvent;
use crate::text::{fit_label, format_ms};

const POINTER_GAP: f64 = 12.0;
const PADDING: f64 = 8.0;
const LINE_HEIGHT: f64 = 16.0;
const MIN_WIDTH: f64 = 120.0;

/// Render the info card for the hovered event.
///
/// The card sits below-right of the pointer and flips to the left and/or
/// above whenever it would overflow the surface.
pub fn render_tooltip(ctx: &FrameContext<'_>) -> Vec<RenderCommand> {
    let mouse = ctx.mouse;
    if !mouse.is_hovering {
        return Vec::new();
    }
    let (Some(event), Some(anchor)) = (mouse.hover_event.as_ref(), mouse.hover_position) else {
        return Vec::new();
    };

    let font_size = ctx.config.font_size;
    let max_text_width = ctx.config.tooltip_max_width - 2.0 * PADDING;
    let lines = tooltip_lines(event);
    let lines: Vec<(String, ThemeToken)> = lines
        .into_iter()
        .enumerate()
        .filter_map(|(i, line)| {
            let color = if i == 0 {
                ThemeToken::TooltipText
            } else {
                ThemeToken::TooltipMuted
            };
            fit_label(&line, max_text_width, font_size, ctx.metrics).map(|text| (text, color))
        })
        .collect();

    let text_width = lines
        .iter()
        .map(|(text, _)| ctx.metrics.text_width(text, font_size))
        .fold(0.0, f64::max);
    let width = (text_width + 2.0 * PADDING).clamp(MIN_WIDTH, ctx.config.tooltip_max_width);
    let height = 2.0 * PADDING + lines.len() as f64 * LINE_HEIGHT;
    let card = place_card(anchor, width, height, ctx.width, ctx.height);

    let mut commands = Vec::with_capacity(lines.len() + 3);
    commands.push(RenderCommand::BeginGroup { id: "tooltip".into() });
    commands.push(RenderCommand::DrawRect {
        rect: card,
        fill: ThemeToken::TooltipBackground.into(),
        border: Some(ThemeToken::TooltipBorder.into()),
        corner_radius: 4.0,
    });
    for (i, (text, color)) in lines.into_iter().enumerate() {
        commands.push(RenderCommand::DrawText {
            position: Point::new(
                card.x + PADDING,
                card.y + PADDING + (i as f64 + 0.5) * LINE_HEIGHT,
            ),
            text,
            color: color.into(),
            font_size,
            align: TextAlign::Left,
        });
    }
    commands.push(RenderCommand::EndGroup);
    commands
}

fn tooltip_lines(event: &TimelineEvent) -> [String; 4] {
    [
        event.label.clone(),
        format!("ID: {}", event.id),
        format!("Start: {}", format_ms(event.start_time)),
        format!("Duration: {}", format_ms(event.duration)),
    ]
}

/// Position a `width` x `height` card next to `anchor` inside the surface.
fn place_card(anchor: Point, width: f64, height: f64, surface_w: f64, surface_h: f64) -> Rect {
    let mut x = anchor.x + POINTER_GAP;
    let mut y = anchor.y + POINTER_GAP;
    if x + width > surface_w {
        x = anchor.x - POINTER_GAP - width;
    }
    if y + height > surface_h {
        y = anchor.y - POINTER_GAP - height;
    }
    Rect::new(x.max(0.0), y.max(0.0), width, height)
}
