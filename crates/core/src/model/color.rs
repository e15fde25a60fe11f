use perf_timeline_protocol::Color;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),
    #[error("expected 3, 6 or 8 hex digits: {0:?}")]
    BadLength(String),
    #[error("invalid hex digit in {0:?}")]
    BadDigit(String),
}

/// Parse a CSS hex color: `#rgb`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(input: &str) -> Result<Color, ColorParseError> {
    let trimmed = input.trim();
    let Some(hex) = trimmed.strip_prefix('#') else {
        return Err(ColorParseError::MissingHash(input.to_string()));
    };
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorParseError::BadDigit(input.to_string()));
    }

    let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| ColorParseError::BadDigit(input.to_string()));
    match hex.len() {
        3 => {
            let mut channels = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let doubled: String = [c, c].iter().collect();
                channels[i] = byte(&doubled)?;
            }
            Ok(Color::rgb8(channels[0], channels[1], channels[2]))
        }
        6 => Ok(Color::rgb8(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?)),
        8 => Ok(Color::rgba8(
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            byte(&hex[6..8])?,
        )),
        _ => Err(ColorParseError::BadLength(input.to_string())),
    }
}

/// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
pub fn to_hex(color: Color) -> String {
    let [r, g, b, a] = color.to_rgba8();
    if a == 255 {
        format!("#{r:02x}{g:02x}{b:02x}")
    } else {
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

/// Serde adapter storing a [`Color`] as a CSS hex string.
pub mod hex {
    use perf_timeline_protocol::Color;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_hex_color(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_forms() {
        assert_eq!(parse_hex_color("#fff"), Ok(Color::rgb8(255, 255, 255)));
        assert_eq!(parse_hex_color("#4e79a7"), Ok(Color::rgb8(0x4e, 0x79, 0xa7)));
        assert_eq!(
            parse_hex_color("#00000080"),
            Ok(Color::rgba8(0, 0, 0, 0x80))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_hex_color("red"), Err(ColorParseError::MissingHash(_))));
        assert!(matches!(parse_hex_color("#12345"), Err(ColorParseError::BadLength(_))));
        assert!(matches!(parse_hex_color("#zzzzzz"), Err(ColorParseError::BadDigit(_))));
    }

    #[test]
    fn hex_output() {
        assert_eq!(to_hex(Color::rgb8(0x4e, 0x79, 0xa7)), "#4e79a7");
        assert_eq!(to_hex(Color::rgba8(1, 2, 3, 4)), "#01020304");
    }
}
