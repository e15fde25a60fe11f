//! Loading recorded sessions from JSON.
//!
//! Two document shapes are accepted: an object keyed by track id (the shape
//! the recording hooks export), or a plain array of tracks. In the keyed form
//! a track's `id` may be omitted and is taken from its key.
//!
//! ```json
//! {
//!   "network": { "label": "Network", "color": "#4e79a7", "events": [
//!     { "id": "1", "label": "GET /api", "startTime": 12, "endTime": 80 }
//!   ] }
//! }
//! ```

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{EventTrack, RecordingSession, SessionError, TrackMap};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("track keyed {key:?} declares id {id:?}")]
    TrackIdMismatch { key: String, id: String },
    #[error("track without an id")]
    MissingTrackId,
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TracksDocument {
    Keyed(IndexMap<String, EventTrack>),
    List(Vec<EventTrack>),
}

/// Parse a JSON document into a validated session.
///
/// Events are checked like [`RecordingSession::record`] checks them:
/// finite, non-negative timing and ids unique within their track.
pub fn parse_session(data: &[u8]) -> Result<RecordingSession, IngestError> {
    let tracks = match serde_json::from_slice(data)? {
        TracksDocument::Keyed(map) => map
            .into_iter()
            .map(|(key, mut track)| {
                if track.id.is_empty() {
                    track.id = key;
                } else if track.id != key {
                    return Err(IngestError::TrackIdMismatch { key, id: track.id });
                }
                Ok(track)
            })
            .collect::<Result<Vec<_>, _>>()?,
        TracksDocument::List(list) => list,
    };

    let mut session = RecordingSession::new();
    for track in tracks {
        if track.id.is_empty() {
            return Err(IngestError::MissingTrackId);
        }
        session.add_track(track)?;
    }
    debug!(
        "ingested {} tracks with {} events",
        session.tracks().len(),
        session.event_count()
    );
    Ok(session)
}

/// Parse a JSON document straight into renderer-ready tracks.
pub fn parse_tracks(data: &[u8]) -> Result<TrackMap, IngestError> {
    parse_session(data).map(RecordingSession::into_tracks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYED: &str = r##"{
        "network": {
            "label": "Network",
            "color": "#4e79a7",
            "events": [
                { "id": "1", "label": "GET /api", "startTime": 12, "endTime": 80 }
            ]
        },
        "render": {
            "label": "Renders",
            "color": "#59a14f",
            "events": [
                { "id": "1", "label": "App", "startTime": 100, "duration": 20 },
                { "id": "2", "label": "List", "startTime": 130, "duration": 4.5 }
            ]
        }
    }"##;

    #[test]
    fn keyed_document_keeps_lane_order() {
        let tracks = parse_tracks(KEYED.as_bytes()).unwrap();
        let ids: Vec<&str> = tracks.keys().map(String::as_str).collect();
        assert_eq!(ids, ["network", "render"]);

        let render = &tracks["render"];
        assert_eq!(render.id, "render");
        assert_eq!(render.events.len(), 2);
        assert!(render.events.iter().all(|e| e.event_track_id == "render"));
        assert_eq!(tracks["network"].events[0].duration, 68.0);
    }

    #[test]
    fn list_document() {
        let json = r##"[
            { "id": "user-input", "label": "User Input", "color": "#f28e2b",
              "events": [{ "id": "c", "label": "click", "startTime": 5, "duration": 1 }] }
        ]"##;
        let session = parse_session(json.as_bytes()).unwrap();
        assert_eq!(session.event_count(), 1);
        assert_eq!(session.time_range(), Some((5.0, 6.0)));
    }

    #[test]
    fn rejects_mismatched_key() {
        let json = r##"{ "a": { "id": "b", "label": "B", "color": "#000" } }"##;
        assert!(matches!(
            parse_tracks(json.as_bytes()),
            Err(IngestError::TrackIdMismatch { .. })
        ));
    }

    #[test]
    fn rejects_negative_duration_and_duplicates() {
        let negative = r##"[{ "id": "r", "label": "R", "color": "#000",
            "events": [{ "id": "1", "label": "x", "startTime": 5, "duration": -1 }] }]"##;
        assert!(matches!(
            parse_tracks(negative.as_bytes()),
            Err(IngestError::Session(SessionError::InvalidTiming { .. }))
        ));

        let duplicate = r##"[{ "id": "r", "label": "R", "color": "#000", "events": [
            { "id": "1", "label": "x", "startTime": 5, "duration": 1 },
            { "id": "1", "label": "y", "startTime": 9, "duration": 1 }] }]"##;
        assert!(matches!(
            parse_tracks(duplicate.as_bytes()),
            Err(IngestError::Session(SessionError::DuplicateEvent { .. }))
        ));
    }

    #[test]
    fn list_track_needs_an_id() {
        let json = r##"[{ "label": "R", "color": "#000" }]"##;
        assert!(matches!(
            parse_tracks(json.as_bytes()),
            Err(IngestError::MissingTrackId)
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(parse_tracks(b"{not json"), Err(IngestError::Json(_))));
        assert!(matches!(parse_tracks(b"[{\"label\": 3}]"), Err(IngestError::Json(_))));
    }
}
