use perf_timeline_core::Surface;
use perf_timeline_core::svg::paint_css;
use perf_timeline_core::text::{ApproxTextMetrics, TextMeasure};
use perf_timeline_protocol::{Rect, RenderCommand, TextAlign};
use web_sys::CanvasRenderingContext2d;

const FONT_FAMILY: &str = "system-ui, -apple-system, sans-serif";

/// Backing-store size for a canvas laid out at `width` x `height` CSS pixels
/// on a display with `pixel_ratio` device pixels per CSS pixel.
pub fn backing_size(width: f64, height: f64, pixel_ratio: f64) -> (u32, u32) {
    let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
        pixel_ratio
    } else {
        1.0
    };
    let device = |v: f64| {
        if v.is_finite() {
            (v * ratio).round().clamp(0.0, f64::from(u32::MAX)) as u32
        } else {
            0
        }
    };
    (device(width), device(height))
}

/// Replays frames onto an HTML canvas 2D context.
///
/// Frames are laid out in CSS pixels; the context is scaled by the pixel
/// ratio so a high-density backing store stays sharp.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    pixel_ratio: f64,
    dark: bool,
    fallback: ApproxTextMetrics,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self {
            ctx,
            width,
            height,
            pixel_ratio: 1.0,
            dark: false,
            fallback: ApproxTextMetrics::default(),
        }
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Device pixels per CSS pixel; non-positive ratios fall back to 1.
    pub fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        };
    }

    pub fn set_dark(&mut self, dark: bool) {
        self.dark = dark;
    }

    fn set_font(&self, font_size: f64) {
        self.ctx.set_font(&format!("{font_size}px {FONT_FAMILY}"));
    }

    fn rounded_rect_path(&self, rect: &Rect, radius: f64) {
        let ctx = &self.ctx;
        let r = radius.min(rect.w / 2.0).min(rect.h / 2.0).max(0.0);
        let (x, y, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());
        ctx.begin_path();
        ctx.move_to(x + r, y);
        ctx.line_to(right - r, y);
        ctx.quadratic_curve_to(right, y, right, y + r);
        ctx.line_to(right, bottom - r);
        ctx.quadratic_curve_to(right, bottom, right - r, bottom);
        ctx.line_to(x + r, bottom);
        ctx.quadratic_curve_to(x, bottom, x, bottom - r);
        ctx.line_to(x, y + r);
        ctx.quadratic_curve_to(x, y, x + r, y);
        ctx.close_path();
    }
}

impl TextMeasure for CanvasSurface {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        self.set_font(font_size);
        match self.ctx.measure_text(text) {
            Ok(metrics) => metrics.width(),
            Err(_) => self.fallback.text_width(text, font_size),
        }
    }
}

impl Surface for CanvasSurface {
    fn present(&mut self, commands: &[RenderCommand]) {
        let ctx = &self.ctx;
        let r = self.pixel_ratio;
        let _ = ctx.set_transform(r, 0.0, 0.0, r, 0.0, 0.0);

        for cmd in commands {
            match cmd {
                RenderCommand::Clear { color } => {
                    ctx.clear_rect(0.0, 0.0, self.width, self.height);
                    ctx.set_fill_style_str(&paint_css(*color, self.dark));
                    ctx.fill_rect(0.0, 0.0, self.width, self.height);
                }
                RenderCommand::DrawRect {
                    rect,
                    fill,
                    border,
                    corner_radius,
                } => {
                    ctx.set_fill_style_str(&paint_css(*fill, self.dark));
                    if *corner_radius > 0.0 {
                        self.rounded_rect_path(rect, *corner_radius);
                        ctx.fill();
                    } else {
                        ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
                    }
                    if let Some(border) = border {
                        ctx.set_stroke_style_str(&paint_css(*border, self.dark));
                        ctx.set_line_width(1.0);
                        if *corner_radius > 0.0 {
                            ctx.stroke();
                        } else {
                            ctx.stroke_rect(rect.x, rect.y, rect.w, rect.h);
                        }
                    }
                }
                RenderCommand::DrawText {
                    position,
                    text,
                    color,
                    font_size,
                    align,
                } => {
                    self.set_font(*font_size);
                    ctx.set_fill_style_str(&paint_css(*color, self.dark));
                    ctx.set_text_align(match align {
                        TextAlign::Left => "left",
                        TextAlign::Center => "center",
                        TextAlign::Right => "right",
                    });
                    ctx.set_text_baseline("middle");
                    let _ = ctx.fill_text(text, position.x, position.y);
                }
                RenderCommand::DrawLine {
                    from,
                    to,
                    color,
                    width,
                } => {
                    ctx.set_stroke_style_str(&paint_css(*color, self.dark));
                    ctx.set_line_width(*width);
                    ctx.begin_path();
                    ctx.move_to(from.x, from.y);
                    ctx.line_to(to.x, to.y);
                    ctx.stroke();
                }
                RenderCommand::DrawCircle {
                    center,
                    radius,
                    fill,
                } => {
                    ctx.set_fill_style_str(&paint_css(*fill, self.dark));
                    ctx.begin_path();
                    let _ = ctx.arc(center.x, center.y, *radius, 0.0, std::f64::consts::TAU);
                    ctx.fill();
                }
                RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
            }
        }
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}
