use perf_timeline_protocol::{Paint, ThemeToken};

/// Resolved RGBA color for egui rendering.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ResolvedColor {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn visuals(self) -> egui::Visuals {
        match self {
            Self::Dark => dark_visuals(),
            Self::Light => egui::Visuals::light(),
        }
    }
}

pub fn resolve(token: ThemeToken, mode: ThemeMode) -> egui::Color32 {
    match mode {
        ThemeMode::Dark => resolve_dark(token),
        ThemeMode::Light => resolve_light(token),
    }
    .to_color32()
}

/// Theme tokens go through the palette; track colors pass through as-is.
pub fn resolve_paint(paint: Paint, mode: ThemeMode) -> egui::Color32 {
    match paint {
        Paint::Token(token) => resolve(token, mode),
        Paint::Solid(color) => {
            let [r, g, b, a] = color.to_rgba8();
            egui::Color32::from_rgba_unmultiplied(r, g, b, a)
        }
    }
}

fn resolve_dark(token: ThemeToken) -> ResolvedColor {
    // Catppuccin Mocha palette
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(0x1e, 0x1e, 0x2e),        // Base
        TickRowBackground => ResolvedColor::rgb(0x18, 0x18, 0x25), // Mantle
        GridLine => ResolvedColor::rgba(0x45, 0x47, 0x5a, 160),    // Surface1
        GridText => ResolvedColor::rgb(0xa6, 0xad, 0xc8),          // Subtext0

        LegendText => ResolvedColor::rgb(0xcd, 0xd6, 0xf4), // Text

        LaneBorder => ResolvedColor::rgb(0x31, 0x32, 0x44), // Surface0
        EventBorder => ResolvedColor::rgba(0x11, 0x11, 0x1b, 140),
        EventLabel => ResolvedColor::rgb(0x11, 0x11, 0x1b), // Crust

        CursorPlaying => ResolvedColor::rgb(0xf3, 0x8b, 0xa8), // Red
        CursorPaused => ResolvedColor::rgb(0xfa, 0xb3, 0x87),  // Peach
        CursorLabel => ResolvedColor::rgb(0x11, 0x11, 0x1b),

        TooltipBackground => ResolvedColor::rgb(0x18, 0x18, 0x25),
        TooltipBorder => ResolvedColor::rgb(0x45, 0x47, 0x5a),
        TooltipText => ResolvedColor::rgb(0xcd, 0xd6, 0xf4),
        TooltipMuted => ResolvedColor::rgb(0xba, 0xc2, 0xde), // Subtext1
    }
}

fn resolve_light(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(255, 255, 255),
        TickRowBackground => ResolvedColor::rgb(245, 245, 248),
        GridLine => ResolvedColor::rgb(225, 225, 232),
        GridText => ResolvedColor::rgb(100, 100, 110),

        LegendText => ResolvedColor::rgb(40, 40, 50),

        LaneBorder => ResolvedColor::rgb(210, 210, 220),
        EventBorder => ResolvedColor::rgba(0, 0, 0, 50),
        EventLabel => ResolvedColor::rgb(255, 255, 255),

        CursorPlaying => ResolvedColor::rgb(211, 47, 47),
        CursorPaused => ResolvedColor::rgb(230, 140, 0),
        CursorLabel => ResolvedColor::rgb(255, 255, 255),

        TooltipBackground => ResolvedColor::rgb(255, 255, 255),
        TooltipBorder => ResolvedColor::rgb(210, 210, 220),
        TooltipText => ResolvedColor::rgb(20, 20, 30),
        TooltipMuted => ResolvedColor::rgb(80, 80, 100),
    }
}

/// Catppuccin Mocha dark visuals for egui widgets.
fn dark_visuals() -> egui::Visuals {
    let mut v = egui::Visuals::dark();
    v.panel_fill = egui::Color32::from_rgb(0x18, 0x18, 0x25);
    v.window_fill = egui::Color32::from_rgb(0x1e, 0x1e, 0x2e);
    v.extreme_bg_color = egui::Color32::from_rgb(0x11, 0x11, 0x1b);
    v.widgets.inactive.bg_fill = egui::Color32::from_rgb(0x45, 0x47, 0x5a);
    v.widgets.hovered.bg_fill = egui::Color32::from_rgb(0x58, 0x5b, 0x70);
    v.widgets.active.bg_fill = egui::Color32::from_rgb(0x89, 0xb4, 0xfa);
    v.selection.bg_fill = egui::Color32::from_rgba_unmultiplied(0x89, 0xb4, 0xfa, 60);
    v.error_fg_color = egui::Color32::from_rgb(0xf3, 0x8b, 0xa8);
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use perf_timeline_protocol::Color;

    #[test]
    fn solid_paint_passes_through() {
        let c = resolve_paint(Paint::Solid(Color::rgb8(0x4e, 0x79, 0xa7)), ThemeMode::Dark);
        assert_eq!(c, egui::Color32::from_rgb(0x4e, 0x79, 0xa7));
    }

    #[test]
    fn cursor_states_are_distinct() {
        for mode in [ThemeMode::Dark, ThemeMode::Light] {
            assert_ne!(
                resolve(ThemeToken::CursorPlaying, mode),
                resolve(ThemeToken::CursorPaused, mode)
            );
        }
    }
}
