use perf_timeline_protocol::{Paint, Point, Rect, RenderCommand, TextAlign, ThemeToken};

use super::FrameContext;

const SWATCH_SIZE: f64 = 10.0;
const SWATCH_GAP: f64 = 4.0;
const ITEM_SPACING: f64 = 16.0;

/// Render one color swatch + label per track, centered horizontally in the
/// band directly below the tick row.
pub fn render_legend(ctx: &FrameContext<'_>) -> Vec<RenderCommand> {
    if ctx.tracks.is_empty() {
        return Vec::new();
    }

    let font_size = ctx.config.font_size;
    let label_widths: Vec<f64> = ctx
        .tracks
        .values()
        .map(|t| ctx.metrics.text_width(&t.label, font_size))
        .collect();
    let total: f64 = label_widths
        .iter()
        .map(|w| SWATCH_SIZE + SWATCH_GAP + w)
        .sum::<f64>()
        + ITEM_SPACING * (label_widths.len() - 1) as f64;

    let center_y = ctx.config.time_markers_height + ctx.config.legend_height / 2.0;
    let mut x = ((ctx.width - total) / 2.0).max(0.0);
    let mut commands = Vec::with_capacity(ctx.tracks.len() * 2 + 2);

    commands.push(RenderCommand::BeginGroup { id: "legend".into() });
    for (track, label_width) in ctx.tracks.values().zip(&label_widths) {
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(x, center_y - SWATCH_SIZE / 2.0, SWATCH_SIZE, SWATCH_SIZE),
            fill: Paint::Solid(track.color),
            border: None,
            corner_radius: 2.0,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(x + SWATCH_SIZE + SWATCH_GAP, center_y),
            text: track.label.clone(),
            color: ThemeToken::LegendText.into(),
            font_size,
            align: TextAlign::Left,
        });
        x += SWATCH_SIZE + SWATCH_GAP + label_width + ITEM_SPACING;
    }
    commands.push(RenderCommand::EndGroup);
    commands
}
