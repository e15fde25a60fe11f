use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
///
/// Track colors are not tokens: they come from the track itself and travel
/// as [`crate::Paint::Solid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,

    // Time grid
    TickRowBackground,
    GridLine,
    GridText,

    // Legend
    LegendText,

    // Lanes and events
    LaneBorder,
    EventBorder,
    EventLabel,

    // Time cursor
    CursorPlaying,
    CursorPaused,
    CursorLabel,

    // Tooltip
    TooltipBackground,
    TooltipBorder,
    TooltipText,
    TooltipMuted,
}
