use perf_timeline_protocol::{Point, RenderCommand, ThemeToken};

use super::FrameContext;

/// Render the lane dividers. Lanes have no fill; the divider sits in the
/// middle of the padding below each lane.
pub fn render_lanes(ctx: &FrameContext<'_>) -> Vec<RenderCommand> {
    let config = ctx.config;
    let mut commands = Vec::with_capacity(ctx.tracks.len() + 2);

    commands.push(RenderCommand::BeginGroup { id: "lanes".into() });
    for index in 0..ctx.tracks.len() {
        let y = config.track_y(index) + config.track_height + config.track_padding / 2.0;
        commands.push(RenderCommand::DrawLine {
            from: Point::new(0.0, y),
            to: Point::new(ctx.width, y),
            color: ThemeToken::LaneBorder.into(),
            width: 1.0,
        });
    }
    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_support::{Fixture, track, tracks};

    #[test]
    fn one_divider_per_track() {
        let fx = Fixture::new(tracks(vec![
            track("network", &[]),
            track("input", &[]),
            track("render", &[]),
        ]));
        let ys: Vec<f64> = render_lanes(&fx.ctx())
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawLine { from, .. } => Some(from.y),
                _ => None,
            })
            .collect();
        // band 54, lane 30, padding 10: dividers at 89, 129, 169.
        assert_eq!(ys, vec![89.0, 129.0, 169.0]);
    }
}
