//! SVG backend: turns a frame's command list into a standalone SVG document.
//!
//! Used for static export of the current view and in tests to eyeball a
//! frame.

use std::fmt::Write as _;

use perf_timeline_protocol::{Paint, RenderCommand, TextAlign, ThemeToken};

use crate::renderer::Surface;
use crate::text::{ApproxTextMetrics, TextMeasure};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the viewBox; `dark` selects the palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 120);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif">"#,
    );

    for cmd in commands {
        match cmd {
            RenderCommand::Clear { color } => {
                let _ = write!(
                    svg,
                    r#"<rect width="{width}" height="{height}" fill="{}"/>"#,
                    paint_css(*color, dark),
                );
            }
            RenderCommand::DrawRect {
                rect,
                fill,
                border,
                corner_radius,
            } => {
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}""#,
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    paint_css(*fill, dark),
                );
                if *corner_radius > 0.0 {
                    let _ = write!(svg, r#" rx="{corner_radius}""#);
                }
                if let Some(border) = border {
                    let _ = write!(svg, r#" stroke="{}" stroke-width="1""#, paint_css(*border, dark));
                }
                svg.push_str("/>");
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}" text-anchor="{anchor}" dominant-baseline="central">{}</text>"#,
                    position.x,
                    position.y,
                    paint_css(*color, dark),
                    escape_xml(text),
                );
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let _ = write!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{line_width}"/>"#,
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    paint_css(*color, dark),
                );
            }
            RenderCommand::DrawCircle {
                center,
                radius,
                fill,
            } => {
                let _ = write!(
                    svg,
                    r#"<circle cx="{}" cy="{}" r="{radius}" fill="{}"/>"#,
                    center.x,
                    center.y,
                    paint_css(*fill, dark),
                );
            }
            RenderCommand::BeginGroup { id } => {
                let _ = write!(svg, r#"<g class="{}">"#, escape_xml(id));
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

/// CSS color for a paint under the light or dark palette.
pub fn paint_css(paint: Paint, dark: bool) -> String {
    match paint {
        Paint::Token(token) => token_css(token, dark).to_owned(),
        Paint::Solid(color) => color.to_css(),
    }
}

/// The palette shared by the SVG and canvas backends.
pub fn token_css(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::Background => "#181818",
            ThemeToken::TickRowBackground => "#202020",
            ThemeToken::GridLine | ThemeToken::LaneBorder => "#303030",
            ThemeToken::GridText | ThemeToken::TooltipMuted => "#9e9e9e",
            ThemeToken::LegendText | ThemeToken::TooltipText | ThemeToken::EventLabel => {
                "#ececec"
            }
            ThemeToken::EventBorder => "#00000066",
            ThemeToken::CursorPlaying => "#ef5350",
            ThemeToken::CursorPaused => "#ffa726",
            ThemeToken::CursorLabel => "#ffffff",
            ThemeToken::TooltipBackground => "#262626",
            ThemeToken::TooltipBorder => "#424242",
        }
    } else {
        match token {
            ThemeToken::Background => "#ffffff",
            ThemeToken::TickRowBackground => "#f5f5f5",
            ThemeToken::GridLine | ThemeToken::LaneBorder => "#e0e0e0",
            ThemeToken::GridText | ThemeToken::TooltipMuted => "#666677",
            ThemeToken::LegendText | ThemeToken::TooltipText => "#1a1a2e",
            ThemeToken::EventLabel => "#ffffff",
            ThemeToken::EventBorder => "#00000033",
            ThemeToken::CursorPlaying => "#e53935",
            ThemeToken::CursorPaused => "#fb8c00",
            ThemeToken::CursorLabel => "#ffffff",
            ThemeToken::TooltipBackground => "#ffffff",
            ThemeToken::TooltipBorder => "#cccccc",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// A surface that serializes every presented frame to SVG.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    dark: bool,
    metrics: ApproxTextMetrics,
    document: String,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64, dark: bool) -> Self {
        Self {
            width,
            height,
            dark,
            metrics: ApproxTextMetrics::default(),
            document: String::new(),
        }
    }

    /// The last presented frame; empty before the first draw.
    pub fn document(&self) -> &str {
        &self.document
    }
}

impl TextMeasure for SvgSurface {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        self.metrics.text_width(text, font_size)
    }
}

impl Surface for SvgSurface {
    fn present(&mut self, commands: &[RenderCommand]) {
        self.document = render_svg(commands, self.width, self.height, self.dark);
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perf_timeline_protocol::{Color, Point, Rect};

    #[test]
    fn basic_svg_output() {
        let commands = vec![
            RenderCommand::Clear {
                color: ThemeToken::Background.into(),
            },
            RenderCommand::DrawRect {
                rect: Rect::new(10.0, 20.0, 100.0, 18.0),
                fill: Color::rgb8(0x59, 0xa1, 0x4f).into(),
                border: Some(ThemeToken::EventBorder.into()),
                corner_radius: 3.0,
            },
        ];
        let svg = render_svg(&commands, 800.0, 400.0, true);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("#181818"));
        assert!(svg.contains(r#"rx="3""#));
        assert!(svg.contains(&Color::rgb8(0x59, 0xa1, 0x4f).to_css()));
    }

    #[test]
    fn escapes_xml_entities() {
        let commands = vec![RenderCommand::DrawText {
            position: Point::new(0.0, 10.0),
            text: "<List items={a & b}>".into(),
            color: ThemeToken::EventLabel.into(),
            font_size: 11.0,
            align: TextAlign::Center,
        }];
        let svg = render_svg(&commands, 400.0, 100.0, false);
        assert!(svg.contains("&lt;List items={a &amp; b}&gt;"));
        assert!(svg.contains(r#"text-anchor="middle""#));
    }

    #[test]
    fn layer_groups_are_balanced() {
        let commands = vec![
            RenderCommand::BeginGroup {
                id: "time-cursor".into(),
            },
            RenderCommand::DrawCircle {
                center: Point::new(5.0, 5.0),
                radius: 4.0,
                fill: ThemeToken::CursorPlaying.into(),
            },
            RenderCommand::EndGroup,
        ];
        let svg = render_svg(&commands, 10.0, 10.0, false);
        assert_eq!(svg.matches("<g ").count(), svg.matches("</g>").count());
        assert!(svg.contains(r#"<g class="time-cursor"><circle"#));
    }

    #[test]
    fn surface_keeps_last_frame() {
        let mut surface = SvgSurface::new(100.0, 50.0, false);
        assert!(surface.document().is_empty());
        surface.present(&[RenderCommand::Clear {
            color: ThemeToken::Background.into(),
        }]);
        assert!(surface.document().contains(r#"viewBox="0 0 100 50""#));
    }
}
