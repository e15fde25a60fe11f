use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{debug, warn};
use perf_timeline_protocol::Color;
use thiserror::Error;

use super::event::{EventTrack, TimelineEvent, TrackMap, tracks_time_range};

pub const NETWORK_TRACK: &str = "network";
pub const USER_INPUT_TRACK: &str = "user-input";
pub const RENDER_TRACK: &str = "render";

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("unknown track {0:?}")]
    UnknownTrack(String),
    #[error("track {0:?} already exists")]
    DuplicateTrack(String),
    #[error("event {id:?} already recorded on track {track:?}")]
    DuplicateEvent { track: String, id: String },
    #[error("event {id:?} has invalid timing (start {start}, duration {duration})")]
    InvalidTiming { id: String, start: f64, duration: f64 },
}

/// One profiling session: the fixed set of tracks and everything recorded
/// into them since the baseline.
///
/// The host constructs and owns this object; the rendering core only ever
/// sees [`RecordingSession::snapshot`], so there is no shared mutable store.
/// Validation happens here, at ingestion, rather than on every repaint.
#[derive(Debug, Clone, Default)]
pub struct RecordingSession {
    tracks: TrackMap,
    ids: HashMap<String, HashSet<String>>,
}

impl RecordingSession {
    /// Create a session with no tracks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with the three standard lanes: network, user input
    /// and component renders.
    pub fn with_standard_tracks() -> Self {
        let mut session = Self::new();
        let standard = [
            (NETWORK_TRACK, "Network", Color::rgb8(0x4e, 0x79, 0xa7)),
            (USER_INPUT_TRACK, "User Input", Color::rgb8(0xf2, 0x8e, 0x2b)),
            (RENDER_TRACK, "Renders", Color::rgb8(0x59, 0xa1, 0x4f)),
        ];
        for (id, label, color) in standard {
            // Ids are distinct literals, so this cannot collide.
            let _ = session.add_track(EventTrack::new(id, label, color));
        }
        session
    }

    /// Register a track. Events already on it are validated like
    /// [`RecordingSession::record`] would; on error the session is unchanged.
    pub fn add_track(&mut self, mut track: EventTrack) -> Result<(), SessionError> {
        if self.tracks.contains_key(&track.id) {
            return Err(SessionError::DuplicateTrack(track.id));
        }
        let events = std::mem::take(&mut track.events);
        let id = track.id.clone();

        let mut staged = Self::new();
        staged.tracks.insert(id.clone(), track);
        staged.ids.insert(id.clone(), HashSet::new());
        for mut event in events {
            event.event_track_id = id.clone();
            staged.record(event)?;
        }

        self.tracks.extend(staged.tracks);
        self.ids.extend(staged.ids);
        Ok(())
    }

    /// Append an event to the track named by its `event_track_id`.
    pub fn record(&mut self, event: TimelineEvent) -> Result<(), SessionError> {
        if !event.start_time.is_finite() || !event.duration.is_finite() || event.duration < 0.0 {
            warn!("rejecting event {:?}: invalid timing", event.id);
            return Err(SessionError::InvalidTiming {
                id: event.id,
                start: event.start_time,
                duration: event.duration,
            });
        }
        let Some(track) = self.tracks.get_mut(&event.event_track_id) else {
            warn!(
                "rejecting event {:?}: unknown track {:?}",
                event.id, event.event_track_id
            );
            return Err(SessionError::UnknownTrack(event.event_track_id));
        };
        let seen = self.ids.entry(track.id.clone()).or_default();
        if !seen.insert(event.id.clone()) {
            return Err(SessionError::DuplicateEvent {
                track: track.id.clone(),
                id: event.id,
            });
        }
        track.events.push(event);
        Ok(())
    }

    /// Drop every recorded event; the tracks themselves stay.
    pub fn clear(&mut self) {
        for track in self.tracks.values_mut() {
            track.events.clear();
        }
        for ids in self.ids.values_mut() {
            ids.clear();
        }
        debug!("session cleared ({} tracks kept)", self.tracks.len());
    }

    pub fn tracks(&self) -> &TrackMap {
        &self.tracks
    }

    pub fn track(&self, id: &str) -> Option<&EventTrack> {
        self.tracks.get(id)
    }

    /// Total number of events across all tracks.
    pub fn event_count(&self) -> usize {
        self.tracks.values().map(|t| t.events.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.event_count() == 0
    }

    /// Earliest start and latest end of anything recorded.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        tracks_time_range(&self.tracks)
    }

    /// Consume the session, keeping only its tracks.
    pub fn into_tracks(self) -> TrackMap {
        self.tracks
    }

    /// Immutable copy for the renderer. Later recording does not affect it.
    pub fn snapshot(&self) -> Arc<TrackMap> {
        Arc::new(self.tracks.clone())
    }
}
