//! Property-based invariant tests for the coordinate transform, viewport
//! clamping, hit-testing and tick generation.
//!
//! 1. time -> pixel -> time is the identity (within float tolerance).
//! 2. Zooming keeps the time under the pointer fixed unless the offset
//!    clamp at time zero engages.
//! 3. Scale and offset stay in bounds under any pan/zoom sequence.
//! 4. Hit-testing is a pure function of its inputs.
//! 5. Tick columns are strictly increasing and bounded in count.

use perf_timeline_core::hit_test::find_event_at_position;
use perf_timeline_core::model::{MAX_SCALE, MIN_SCALE};
use perf_timeline_core::views::time_grid::compute_ticks;
use perf_timeline_core::{EventTrack, TimelineConfig, TimelineEvent, TrackMap, Viewport};
use perf_timeline_protocol::Color;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn viewport_strategy() -> impl Strategy<Value = Viewport> {
    (0.0f64..1.0e6, MIN_SCALE..MAX_SCALE)
        .prop_map(|(offset, scale)| Viewport::new(offset, scale, 0.0, 800.0))
}

#[derive(Debug, Clone)]
enum Gesture {
    Pan(f64),
    Zoom(f64, bool),
}

fn gesture_strategy() -> impl Strategy<Value = Gesture> {
    prop_oneof![
        (-5_000.0f64..5_000.0).prop_map(Gesture::Pan),
        (0.0f64..800.0, any::<bool>()).prop_map(|(x, zoom_in)| Gesture::Zoom(x, zoom_in)),
    ]
}

fn tracks_strategy() -> impl Strategy<Value = TrackMap> {
    let event = (0.0f64..2_000.0, 0.0f64..200.0);
    prop::collection::vec(prop::collection::vec(event, 0..8), 1..4).prop_map(|lanes| {
        lanes
            .into_iter()
            .enumerate()
            .map(|(lane, events)| {
                let id = format!("track-{lane}");
                let mut track = EventTrack::new(id.clone(), id.clone(), Color::rgb8(0, 0, 0));
                track.events = events
                    .into_iter()
                    .enumerate()
                    .map(|(i, (start, duration))| {
                        TimelineEvent::new(i.to_string(), "e", start, duration, id.clone())
                    })
                    .collect();
                (id, track)
            })
            .collect()
    })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn time_pixel_round_trip(vp in viewport_strategy(), t in 0.0f64..1.0e6) {
        let back = vp.pixel_to_time(vp.time_to_pixel(t));
        prop_assert!((back - t).abs() <= 1e-6 * t.max(1.0), "t={t} back={back} vp={vp:?}");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Zoom keeps the time under the pointer
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn zoom_keeps_pointer_time(
        vp in viewport_strategy(),
        x in 0.0f64..800.0,
        zoom_in in any::<bool>(),
    ) {
        let mut after = vp;
        after.zoom_about(x, if zoom_in { 1.1 } else { 0.9 });
        prop_assume!(after.offset_x() > 0.0);
        let (before_t, after_t) = (vp.pixel_to_time(x), after.pixel_to_time(x));
        prop_assert!(
            (before_t - after_t).abs() <= 1e-6 * before_t.max(1.0),
            "before={before_t} after={after_t}"
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Bounds hold under arbitrary gesture sequences
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn gestures_stay_in_bounds(gestures in prop::collection::vec(gesture_strategy(), 0..64)) {
        let mut vp = Viewport::default();
        for gesture in gestures {
            match gesture {
                Gesture::Pan(dx) => vp.pan_by(dx),
                Gesture::Zoom(x, zoom_in) => vp.zoom_about(x, if zoom_in { 1.1 } else { 0.9 }),
            }
            prop_assert!(vp.offset_x() >= 0.0);
            prop_assert!((MIN_SCALE..=MAX_SCALE).contains(&vp.scale()));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Hit-testing is deterministic and consistent with containment
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn hit_test_is_pure(
        tracks in tracks_strategy(),
        vp in viewport_strategy(),
        x in -100.0f64..900.0,
        y in 0.0f64..300.0,
    ) {
        let cfg = TimelineConfig::default();
        let first = find_event_at_position(&tracks, &vp, &cfg, x, y).cloned();
        let second = find_event_at_position(&tracks, &vp, &cfg, x, y).cloned();
        prop_assert_eq!(&first, &second);
        if let Some(event) = first {
            prop_assert!(event.contains_time(vp.pixel_to_time(x)));
            prop_assert!(y >= cfg.band_height());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Ticks
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tick_columns_unique_and_bounded(vp in viewport_strategy(), width in 1.0f64..4_000.0) {
        let ticks = compute_ticks(&vp, width, 8.0, 15.0);
        prop_assert!(ticks.len() <= 16, "{} ticks", ticks.len());
        prop_assert!(ticks.windows(2).all(|w| w[0].x < w[1].x));
        prop_assert!(ticks.iter().all(|t| t.x >= 0.0 && t.x <= width.round()));
    }
}
