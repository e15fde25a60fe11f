//! Timeline rendering and interaction engine.
//!
//! Events recorded during a profiling session are grouped into tracks and
//! laid out on a horizontal, zoomable time axis:
//!
//! ```text
//!   RecordingSession ──▶ Arc<TrackMap> ──▶ InteractionController ──▶ TimelineRenderer
//!     (ingestion)          (snapshot)        (viewport, mouse,          (views ──▶
//!                                             playback cursor)           RenderCommand[]
//!                                                                        ──▶ Surface)
//! ```
//!
//! The renderer is a pure function of its last-set inputs: every state change
//! in the controller pushes a fresh snapshot and triggers a full repaint.

pub mod config;
pub mod controller;
pub mod hit_test;
pub mod ingest;
pub mod model;
pub mod renderer;
pub mod svg;
pub mod text;
pub mod transform;
pub mod views;

pub use config::TimelineConfig;
pub use controller::InteractionController;
pub use model::{
    EventTrack, MouseState, PlaybackCursor, RecordingSession, TimelineEvent, TrackMap, Viewport,
};
pub use renderer::{CommandBuffer, Surface, TimelineRenderer};
