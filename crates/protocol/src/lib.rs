pub mod commands;
pub mod theme;
pub mod types;

pub use commands::{Paint, RenderCommand, TextAlign};
pub use theme::ThemeToken;
pub use types::{Color, Point, Rect};
