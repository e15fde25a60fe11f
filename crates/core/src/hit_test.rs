//! Pixel to event resolution for hover and click.

use crate::config::TimelineConfig;
use crate::model::{TimelineEvent, TrackMap, Viewport};

/// Index of the lane under vertical position `y`, if any.
///
/// The lane's padding gap below it belongs to the lane.
pub fn track_index_at(y: f64, track_count: usize, config: &TimelineConfig) -> Option<usize> {
    let band = config.band_height();
    let stride = config.track_stride();
    if !y.is_finite() || y < band || stride.is_nan() || stride <= 0.0 {
        return None;
    }
    let index = ((y - band) / stride).floor();
    if index < track_count as f64 {
        Some(index as usize)
    } else {
        None
    }
}

/// Find the event drawn at `(x, y)`.
///
/// Linear scan of the lane under `y`; the first event (in track order)
/// whose closed `[start, start + duration]` interval contains the time under
/// `x` wins. Points in the grid/legend band or below the last lane match
/// nothing.
pub fn find_event_at_position<'a>(
    tracks: &'a TrackMap,
    viewport: &Viewport,
    config: &TimelineConfig,
    x: f64,
    y: f64,
) -> Option<&'a TimelineEvent> {
    let index = track_index_at(y, tracks.len(), config)?;
    let (_, track) = tracks.get_index(index)?;
    let time = viewport.pixel_to_time(x);
    track.events.iter().find(|e| e.contains_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_support::{track, tracks};

    fn fixture() -> (TrackMap, Viewport, TimelineConfig) {
        let tracks = tracks(vec![
            track("network", &[("n1", "GET /api", 0.0, 300.0)]),
            track(
                "render",
                &[("r1", "App", 100.0, 20.0), ("r2", "List", 110.0, 50.0)],
            ),
        ]);
        (tracks, Viewport::default(), TimelineConfig::default())
    }

    #[test]
    fn click_inside_event_on_its_lane() {
        let (tracks, vp, cfg) = fixture();
        let y = cfg.track_y(1) + cfg.track_height / 2.0;
        let hit = find_event_at_position(&tracks, &vp, &cfg, 105.0, y);
        assert_eq!(hit.map(|e| e.id.as_str()), Some("r1"));
        // Both edges are inside.
        assert!(find_event_at_position(&tracks, &vp, &cfg, 100.0, y).is_some());
        assert!(find_event_at_position(&tracks, &vp, &cfg, 160.0, y).is_some());
    }

    #[test]
    fn one_pixel_outside_misses() {
        let (tracks, vp, cfg) = fixture();
        let y = cfg.track_y(1) + 1.0;
        assert!(find_event_at_position(&tracks, &vp, &cfg, 99.0, y).is_none());
        assert!(find_event_at_position(&tracks, &vp, &cfg, 161.0, y).is_none());
    }

    #[test]
    fn overlap_resolves_to_first_in_order() {
        let (tracks, vp, cfg) = fixture();
        let y = cfg.track_y(1) + 1.0;
        let hit = find_event_at_position(&tracks, &vp, &cfg, 115.0, y);
        assert_eq!(hit.map(|e| e.id.as_str()), Some("r1"));
    }

    #[test]
    fn band_and_out_of_range_lanes_miss() {
        let (tracks, vp, cfg) = fixture();
        assert!(find_event_at_position(&tracks, &vp, &cfg, 105.0, 10.0).is_none());
        assert!(find_event_at_position(&tracks, &vp, &cfg, 105.0, cfg.band_height() - 0.5).is_none());
        assert!(find_event_at_position(&tracks, &vp, &cfg, 105.0, cfg.track_y(2) + 1.0).is_none());
        assert!(find_event_at_position(&tracks, &vp, &cfg, 105.0, f64::NAN).is_none());
    }

    #[test]
    fn respects_viewport_transform() {
        let (tracks, _, cfg) = fixture();
        let vp = Viewport::new(200.0, 2.0, 0.0, 800.0);
        let y = cfg.track_y(1) + 1.0;
        // pixel 0 -> (0 + 200) / 2 = 100ms, the start of r1.
        let hit = find_event_at_position(&tracks, &vp, &cfg, 0.0, y);
        assert_eq!(hit.map(|e| e.id.as_str()), Some("r1"));
    }

    #[test]
    fn collapsed_stride_matches_nothing() {
        let (tracks, vp, _) = fixture();
        let cfg = TimelineConfig {
            track_padding: -40.0,
            ..TimelineConfig::default()
        };
        assert!(cfg.track_stride() < 0.0);
        let below = cfg.band_height() + 500.0;
        assert_eq!(track_index_at(below, tracks.len(), &cfg), None);
        assert!(find_event_at_position(&tracks, &vp, &cfg, 105.0, below).is_none());
    }
}
