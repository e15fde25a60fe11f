use egui::{Align2, CornerRadius, FontId, Pos2, Rect, Stroke, StrokeKind};
use perf_timeline_protocol::{RenderCommand, TextAlign};

use crate::theme::{self, ThemeMode};

fn corner_radius(r: f64) -> CornerRadius {
    CornerRadius::same(r.round().clamp(0.0, f64::from(u8::MAX)) as u8)
}

/// Replay a frame's `RenderCommand` list into an egui `Painter`.
///
/// `offset` is the top-left pixel position of the timeline area; command
/// coordinates are relative to it.
pub fn render_commands(
    painter: &egui::Painter,
    commands: &[RenderCommand],
    offset: Pos2,
    mode: ThemeMode,
) {
    let area = painter.clip_rect();
    let at = |x: f64, y: f64| Pos2::new(x as f32 + offset.x, y as f32 + offset.y);

    for cmd in commands {
        match cmd {
            RenderCommand::Clear { color } => {
                painter.rect_filled(area, CornerRadius::ZERO, theme::resolve_paint(*color, mode));
            }

            RenderCommand::DrawRect {
                rect,
                fill,
                border,
                corner_radius: radius,
            } => {
                let w = rect.w as f32;
                let h = rect.h as f32;
                if w < 0.5 || h < 0.5 {
                    continue;
                }
                let egui_rect = Rect::from_min_size(at(rect.x, rect.y), egui::vec2(w, h));
                if !painter.clip_rect().intersects(egui_rect) {
                    continue;
                }

                let radius = corner_radius(*radius);
                painter.rect_filled(egui_rect, radius, theme::resolve_paint(*fill, mode));
                if let Some(border) = border {
                    painter.rect_stroke(
                        egui_rect,
                        radius,
                        Stroke::new(1.0, theme::resolve_paint(*border, mode)),
                        StrokeKind::Inside,
                    );
                }
            }

            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let size = *font_size as f32;
                if size < 1.0 {
                    continue;
                }
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_CENTER,
                    TextAlign::Center => Align2::CENTER_CENTER,
                    TextAlign::Right => Align2::RIGHT_CENTER,
                };
                painter.text(
                    at(position.x, position.y),
                    anchor,
                    text,
                    FontId::proportional(size),
                    theme::resolve_paint(*color, mode),
                );
            }

            RenderCommand::DrawLine {
                from,
                to,
                color,
                width,
            } => {
                painter.line_segment(
                    [at(from.x, from.y), at(to.x, to.y)],
                    Stroke::new(*width as f32, theme::resolve_paint(*color, mode)),
                );
            }

            RenderCommand::DrawCircle {
                center,
                radius,
                fill,
            } => {
                painter.circle_filled(
                    at(center.x, center.y),
                    *radius as f32,
                    theme::resolve_paint(*fill, mode),
                );
            }

            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {
                // Groups are semantic; no visual effect in egui
            }
        }
    }
}
