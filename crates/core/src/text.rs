//! Text measurement, label fitting and time formatting.

const ELLIPSIS: &str = "…";

/// Measures rendered text width in pixels. Implemented by every surface so
/// that label fitting uses the backend's real font metrics when it has them.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

/// Fixed advance per character, as a fraction of the font size. Good enough
/// for backends that cannot measure (command buffers, SVG).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxTextMetrics {
    pub char_width_ratio: f64,
}

impl Default for ApproxTextMetrics {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
        }
    }
}

impl TextMeasure for ApproxTextMetrics {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.char_width_ratio
    }
}

/// Fit `text` into `max_width` pixels.
///
/// Returns the text unchanged when it fits, otherwise the longest character
/// prefix that still fits with an ellipsis appended. Returns `None` when not
/// even one character plus the ellipsis fits.
pub fn fit_label(
    text: &str,
    max_width: f64,
    font_size: f64,
    metrics: &dyn TextMeasure,
) -> Option<String> {
    if text.is_empty() || max_width <= 0.0 {
        return None;
    }
    if metrics.text_width(text, font_size) <= max_width {
        return Some(text.to_string());
    }

    let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let candidate = |n: usize| format!("{}{ELLIPSIS}", &text[..boundaries[n]]);

    // Binary search for the largest prefix length n (in chars) that fits.
    // n == boundaries.len() is the full text, already known not to fit.
    let (mut lo, mut hi) = (0usize, boundaries.len() - 1);
    while lo < hi {
        let mid = (lo + hi).div_ceil(2);
        if metrics.text_width(&candidate(mid), font_size) <= max_width {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    if lo == 0 {
        None
    } else {
        Some(candidate(lo))
    }
}

/// Tick label: whole milliseconds below one second, trimmed seconds above.
pub fn format_tick_label(ms: f64) -> String {
    if ms.abs() >= 1_000.0 {
        format!("{}s", trim_decimals(ms / 1_000.0, 3))
    } else {
        format!("{}ms", trim_decimals(ms, 2))
    }
}

/// Precise duration/position label used by the cursor and the tooltip.
pub fn format_ms(ms: f64) -> String {
    if ms.abs() >= 1_000.0 {
        format!("{:.2}s", ms / 1_000.0)
    } else {
        format!("{ms:.1}ms")
    }
}

fn trim_decimals(value: f64, places: usize) -> String {
    let s = format!("{value:.places$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRICS: ApproxTextMetrics = ApproxTextMetrics {
        char_width_ratio: 1.0,
    };

    #[test]
    fn fitting_text_is_untouched() {
        assert_eq!(fit_label("App", 30.0, 10.0, &METRICS), Some("App".into()));
    }

    #[test]
    fn truncates_with_ellipsis() {
        // 10px per char: 5 chars = 50px; "Comp…" fits, "Compo…" does not.
        let fitted = fit_label("ComponentTree", 50.0, 10.0, &METRICS);
        assert_eq!(fitted, Some("Comp…".into()));
    }

    #[test]
    fn nothing_fits() {
        assert_eq!(fit_label("ComponentTree", 15.0, 10.0, &METRICS), None);
        assert_eq!(fit_label("", 100.0, 10.0, &METRICS), None);
    }

    #[test]
    fn multibyte_labels_cut_on_char_boundaries() {
        let fitted = fit_label("ÄÖÜßéèê", 40.0, 10.0, &METRICS);
        assert_eq!(fitted, Some("ÄÖÜ…".into()));
    }

    #[test]
    fn tick_labels() {
        assert_eq!(format_tick_label(0.0), "0ms");
        assert_eq!(format_tick_label(250.0), "250ms");
        assert_eq!(format_tick_label(1_000.0), "1s");
        assert_eq!(format_tick_label(1_500.0), "1.5s");
        assert_eq!(format_tick_label(12_250.0), "12.25s");
    }

    #[test]
    fn precise_labels() {
        assert_eq!(format_ms(12.345), "12.3ms");
        assert_eq!(format_ms(2_500.0), "2.50s");
    }
}
