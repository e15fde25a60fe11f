use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::{Color, Point, Rect};

/// How a shape is colored: a theme token resolved by the backend, or a
/// literal color carried by the data (e.g. a track's own color).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Token(ThemeToken),
    Solid(Color),
}

impl From<ThemeToken> for Paint {
    fn from(token: ThemeToken) -> Self {
        Self::Token(token)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` for every repaint. Backends consume
/// the list sequentially, each command carrying all the data it needs.
/// Text positions name the vertical center of the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Wipe the whole surface and fill it.
    Clear { color: Paint },

    /// Draw a filled rectangle, optionally rounded and outlined.
    DrawRect {
        rect: Rect,
        fill: Paint,
        border: Option<Paint>,
        corner_radius: f64,
    },

    /// Draw a text string at a position.
    DrawText {
        position: Point,
        text: String,
        color: Paint,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: Paint,
        width: f64,
    },

    /// Draw a filled circle.
    DrawCircle {
        center: Point,
        radius: f64,
        fill: Paint,
    },

    /// Begin a logical group (a pipeline layer). Backends may use this for
    /// batching or accessibility.
    BeginGroup { id: String },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}
