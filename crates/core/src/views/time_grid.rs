use perf_timeline_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};

use super::FrameContext;
use crate::model::Viewport;
use crate::text::format_tick_label;

/// Standard tick intervals in milliseconds.
const INTERVAL_LADDER: [f64; 15] = [
    1.0, 2.0, 5.0, 10.0, 20.0, 25.0, 50.0, 100.0, 200.0, 250.0, 500.0, 1_000.0, 2_000.0,
    5_000.0, 10_000.0,
];
const TICK_MARK_HEIGHT: f64 = 6.0;
const LABEL_INSET_X: f64 = 3.0;

/// A grid tick: its time, its (rounded) pixel column and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub time: f64,
    pub x: f64,
    pub label: String,
}

/// Pick the tick interval (ms) for a visible range of `range` ms.
///
/// Starts from `range / target`. At fine zoom (at most 1ms per marker) the
/// interval is rounded up to a whole millisecond. Otherwise it snaps to the
/// nearest ladder rung, climbing the ladder while that would produce more
/// than `max_ticks` markers. Past the top rung it rounds up to a multiple of
/// the top rung.
pub fn tick_interval(range: f64, target: f64, max_ticks: f64) -> f64 {
    if !range.is_finite() || range <= 0.0 || target <= 0.0 {
        return 1.0;
    }
    let ideal = range / target;
    if ideal <= 1.0 {
        return ideal.ceil().max(1.0);
    }

    let top = INTERVAL_LADDER[INTERVAL_LADDER.len() - 1];
    if ideal > top {
        return (ideal / top).ceil() * top;
    }

    let mut idx = INTERVAL_LADDER
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - ideal).abs().total_cmp(&(*b - ideal).abs()))
        .map_or(0, |(i, _)| i);
    while range / INTERVAL_LADDER[idx] > max_ticks && idx + 1 < INTERVAL_LADDER.len() {
        idx += 1;
    }
    INTERVAL_LADDER[idx]
}

/// Ticks for the visible window, at most one per pixel column.
pub fn compute_ticks(viewport: &Viewport, width: f64, target: f64, max_ticks: f64) -> Vec<Tick> {
    let (visible_start, visible_end) = viewport.visible_range(width);
    let interval = tick_interval(visible_end - visible_start, target, max_ticks);

    let first = (visible_start / interval).ceil() as i64;
    let mut ticks: Vec<Tick> = Vec::new();
    for k in first.. {
        let time = k as f64 * interval;
        if time > visible_end {
            break;
        }
        let x = viewport.time_to_pixel(time).round();
        if ticks.last().is_some_and(|prev| prev.x == x) {
            continue;
        }
        ticks.push(Tick {
            time,
            x,
            label: format_tick_label(time),
        });
    }
    ticks
}

/// Render the tick row plus one full-height grid line per tick.
pub fn render_time_grid(ctx: &FrameContext<'_>) -> Vec<RenderCommand> {
    let row_height = ctx.config.time_markers_height;
    let ticks = compute_ticks(
        ctx.viewport,
        ctx.width,
        ctx.config.target_ticks,
        ctx.config.max_ticks,
    );
    let mut commands = Vec::with_capacity(ticks.len() * 3 + 4);

    commands.push(RenderCommand::BeginGroup {
        id: "time-grid".into(),
    });
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, ctx.width, row_height),
        fill: ThemeToken::TickRowBackground.into(),
        border: None,
        corner_radius: 0.0,
    });

    for tick in &ticks {
        // Half-pixel offset keeps 1px lines crisp on raster backends.
        let x = tick.x + 0.5;
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, row_height),
            to: Point::new(x, ctx.height),
            color: ThemeToken::GridLine.into(),
            width: 1.0,
        });
        commands.push(RenderCommand::DrawLine {
            from: Point::new(x, row_height - TICK_MARK_HEIGHT),
            to: Point::new(x, row_height),
            color: ThemeToken::GridText.into(),
            width: 1.0,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(tick.x + LABEL_INSET_X, (row_height - TICK_MARK_HEIGHT) / 2.0),
            text: tick.label.clone(),
            color: ThemeToken::GridText.into(),
            font_size: ctx.config.tick_font_size,
            align: TextAlign::Left,
        });
    }

    commands.push(RenderCommand::DrawLine {
        from: Point::new(0.0, row_height),
        to: Point::new(ctx.width, row_height),
        color: ThemeToken::LaneBorder.into(),
        width: 1.0,
    });
    commands.push(RenderCommand::EndGroup);
    commands
}
