use serde::{Deserialize, Serialize};

/// Layout and interaction tunables for one timeline view.
///
/// Every field has a default, so hosts can deserialize a partial JSON
/// override (`{"track_height": 40}`) and keep the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Height of the tick row at the top of the surface.
    pub time_markers_height: f64,
    /// Height of the legend band below the tick row.
    pub legend_height: f64,
    pub track_height: f64,
    /// Vertical gap between consecutive track lanes.
    pub track_padding: f64,
    /// Pointer travel (px) below which a press/release pair counts as a click.
    pub click_threshold: f64,
    /// Events narrower than this (px) are drawn without a label.
    pub label_min_width: f64,
    pub event_corner_radius: f64,
    pub font_size: f64,
    pub tick_font_size: f64,
    /// Desired number of tick markers across the visible range.
    pub target_ticks: f64,
    /// Upper bound on tick markers before the interval is coarsened.
    pub max_ticks: f64,
    pub tooltip_max_width: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            time_markers_height: 30.0,
            legend_height: 24.0,
            track_height: 30.0,
            track_padding: 10.0,
            click_threshold: 3.0,
            label_min_width: 20.0,
            event_corner_radius: 3.0,
            font_size: 11.0,
            tick_font_size: 10.0,
            target_ticks: 8.0,
            max_ticks: 15.0,
            tooltip_max_width: 260.0,
        }
    }
}

impl TimelineConfig {
    /// Copy with every field forced into a usable range.
    ///
    /// Lengths become finite and non-negative, the lane stride stays
    /// positive, and tick counts are at least one. Non-finite values fall
    /// back to the default for that field.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let length = |v: f64, fallback: f64| if v.is_finite() { v.max(0.0) } else { fallback };
        let count = |v: f64, fallback: f64| if v.is_finite() { v.max(1.0) } else { fallback };

        let mut cfg = Self {
            time_markers_height: length(self.time_markers_height, defaults.time_markers_height),
            legend_height: length(self.legend_height, defaults.legend_height),
            track_height: length(self.track_height, defaults.track_height),
            track_padding: length(self.track_padding, defaults.track_padding),
            click_threshold: length(self.click_threshold, defaults.click_threshold),
            label_min_width: length(self.label_min_width, defaults.label_min_width),
            event_corner_radius: length(self.event_corner_radius, defaults.event_corner_radius),
            font_size: length(self.font_size, defaults.font_size),
            tick_font_size: length(self.tick_font_size, defaults.tick_font_size),
            target_ticks: count(self.target_ticks, defaults.target_ticks),
            max_ticks: count(self.max_ticks, defaults.max_ticks),
            tooltip_max_width: length(self.tooltip_max_width, defaults.tooltip_max_width),
        };
        if cfg.track_stride() <= 0.0 {
            cfg.track_height = defaults.track_height;
        }
        cfg.max_ticks = cfg.max_ticks.max(cfg.target_ticks);
        cfg
    }

    /// Combined height of the tick row and the legend band. Nothing above
    /// this line is hit-testable.
    pub fn band_height(&self) -> f64 {
        self.time_markers_height + self.legend_height
    }

    /// Distance between the tops of two consecutive lanes.
    pub fn track_stride(&self) -> f64 {
        self.track_height + self.track_padding
    }

    /// Top edge of lane `index`.
    pub fn track_y(&self, index: usize) -> f64 {
        self.band_height() + index as f64 * self.track_stride()
    }

    /// Surface height needed to show `track_count` lanes without clipping.
    pub fn content_height(&self, track_count: usize) -> f64 {
        self.track_y(track_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lane_layout() {
        let cfg = TimelineConfig::default();
        assert_eq!(cfg.band_height(), 54.0);
        assert_eq!(cfg.track_y(0), 54.0);
        assert_eq!(cfg.track_y(2), 54.0 + 2.0 * 40.0);
    }

    #[test]
    fn partial_json_override() {
        let cfg: TimelineConfig =
            serde_json::from_str(r#"{"track_height": 50}"#).unwrap_or_default();
        assert_eq!(cfg.track_height, 50.0);
        assert_eq!(cfg.track_padding, 10.0);
    }

    #[test]
    fn sanitized_keeps_valid_config() {
        let cfg = TimelineConfig::default();
        assert_eq!(cfg.sanitized(), cfg);
    }

    #[test]
    fn sanitized_repairs_negative_and_zero_geometry() {
        let cfg: TimelineConfig = serde_json::from_str(
            r#"{"track_padding": -40, "legend_height": -5, "target_ticks": 0, "max_ticks": -3}"#,
        )
        .unwrap_or_default();
        let fixed = cfg.sanitized();
        assert_eq!(fixed.track_padding, 0.0);
        assert_eq!(fixed.legend_height, 0.0);
        assert_eq!(fixed.target_ticks, 1.0);
        assert_eq!(fixed.max_ticks, 1.0);
        assert!(fixed.track_stride() > 0.0);

        let flat = TimelineConfig {
            track_height: 0.0,
            track_padding: 0.0,
            ..TimelineConfig::default()
        };
        assert_eq!(flat.sanitized().track_stride(), 30.0);
    }
}
