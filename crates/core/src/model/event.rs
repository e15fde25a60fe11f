use indexmap::IndexMap;
use perf_timeline_protocol::Color;
use serde::{Deserialize, Serialize};

use super::color;

/// Tracks keyed by id, in lane order (insertion order).
pub type TrackMap = IndexMap<String, EventTrack>;

/// A single recorded occurrence on the timeline.
///
/// Times are milliseconds from the session baseline. On input the span may
/// be given either as `duration` or as `endTime`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawTimelineEvent")]
pub struct TimelineEvent {
    pub id: String,
    pub label: String,
    pub start_time: f64,
    pub duration: f64,
    /// The owning track; doubles as the event kind (render, input, network).
    pub event_track_id: String,
}

impl TimelineEvent {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        start_time: f64,
        duration: f64,
        event_track_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            start_time,
            duration,
            event_track_id: event_track_id.into(),
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Closed-interval containment: both endpoints count.
    pub fn contains_time(&self, t: f64) -> bool {
        t >= self.start_time && t <= self.end_time()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimelineEvent {
    id: String,
    label: String,
    start_time: f64,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    end_time: Option<f64>,
    #[serde(default)]
    event_track_id: String,
}

impl TryFrom<RawTimelineEvent> for TimelineEvent {
    type Error = String;

    fn try_from(raw: RawTimelineEvent) -> Result<Self, Self::Error> {
        let duration = match (raw.duration, raw.end_time) {
            (Some(d), _) => d,
            (None, Some(end)) => end - raw.start_time,
            (None, None) => {
                return Err(format!("event {:?} has neither duration nor endTime", raw.id));
            }
        };
        Ok(Self {
            id: raw.id,
            label: raw.label,
            start_time: raw.start_time,
            duration,
            event_track_id: raw.event_track_id,
        })
    }
}

/// A named, colored lane of events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTrack {
    #[serde(default)]
    pub id: String,
    pub label: String,
    #[serde(with = "color::hex")]
    pub color: Color,
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
}

impl EventTrack {
    pub fn new(id: impl Into<String>, label: impl Into<String>, color: Color) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color,
            events: Vec::new(),
        }
    }

    /// Earliest start and latest end across the track, if it has events.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.events.iter().fold(None, |acc, e| {
            let (lo, hi) = acc.unwrap_or((e.start_time, e.end_time()));
            Some((lo.min(e.start_time), hi.max(e.end_time())))
        })
    }
}

/// Combined time range of every track in the map.
pub fn tracks_time_range(tracks: &TrackMap) -> Option<(f64, f64)> {
    tracks
        .values()
        .filter_map(EventTrack::time_range)
        .reduce(|(a_lo, a_hi), (b_lo, b_hi)| (a_lo.min(b_lo), a_hi.max(b_hi)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_duration_or_end_time() {
        let with_duration: Result<TimelineEvent, _> = serde_json::from_str(
            r#"{"id":"a","label":"App","startTime":100,"duration":20,"eventTrackId":"render"}"#,
        );
        let with_end: Result<TimelineEvent, _> = serde_json::from_str(
            r#"{"id":"b","label":"click","startTime":50,"endTime":58}"#,
        );
        assert_eq!(with_duration.map(|e| e.duration).ok(), Some(20.0));
        assert_eq!(with_end.map(|e| e.duration).ok(), Some(8.0));
    }

    #[test]
    fn rejects_event_without_span() {
        let parsed: Result<TimelineEvent, _> =
            serde_json::from_str(r#"{"id":"c","label":"x","startTime":1}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn contains_both_endpoints() {
        let e = TimelineEvent::new("a", "App", 100.0, 20.0, "render");
        assert!(e.contains_time(100.0));
        assert!(e.contains_time(120.0));
        assert!(!e.contains_time(120.5));
    }

    #[test]
    fn time_range_spans_all_tracks() {
        let mut tracks = TrackMap::new();
        let mut render = EventTrack::new("render", "Renders", Color::rgb8(0, 0, 0));
        render.events.push(TimelineEvent::new("1", "A", 10.0, 5.0, "render"));
        let mut network = EventTrack::new("network", "Network", Color::rgb8(0, 0, 0));
        network.events.push(TimelineEvent::new("2", "GET /", 2.0, 40.0, "network"));
        tracks.insert(render.id.clone(), render);
        tracks.insert(network.id.clone(), network);
        tracks.insert(
            "input".into(),
            EventTrack::new("input", "Input", Color::rgb8(0, 0, 0)),
        );
        assert_eq!(tracks_time_range(&tracks), Some((2.0, 42.0)));
    }
}
