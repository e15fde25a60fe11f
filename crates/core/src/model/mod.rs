pub mod color;
pub mod event;
pub mod pointer;
pub mod session;
pub mod viewport;

pub use color::{ColorParseError, parse_hex_color};
pub use event::{EventTrack, TimelineEvent, TrackMap, tracks_time_range};
pub use pointer::{MouseState, PlaybackCursor};
pub use session::{RecordingSession, SessionError};
pub use viewport::{MAX_SCALE, MIN_SCALE, Viewport};
