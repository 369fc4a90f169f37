use std::str::FromStr;

use thiserror::Error;

use super::Color;

/// Error returned when a CSS-style color string cannot be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("color literal must be #rgb, #rrggbb or #rrggbbaa, got {digits} hex digits in {input:?}")]
    HexLength { input: String, digits: usize },
    #[error("invalid hex digit in color {0:?}")]
    HexDigit(String),
    #[error("unknown color name {0:?}")]
    UnknownName(String),
}

/// Basic CSS named colors, as straight sRGB bytes.
const NAMED: &[(&str, [u8; 4])] = &[
    ("black", [0, 0, 0, 255]),
    ("white", [255, 255, 255, 255]),
    ("red", [255, 0, 0, 255]),
    ("green", [0, 128, 0, 255]),
    ("lime", [0, 255, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("yellow", [255, 255, 0, 255]),
    ("cyan", [0, 255, 255, 255]),
    ("aqua", [0, 255, 255, 255]),
    ("magenta", [255, 0, 255, 255]),
    ("fuchsia", [255, 0, 255, 255]),
    ("gray", [128, 128, 128, 255]),
    ("grey", [128, 128, 128, 255]),
    ("orange", [255, 165, 0, 255]),
    ("purple", [128, 0, 128, 255]),
    ("transparent", [0, 0, 0, 0]),
];

impl Color {
    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa` or a basic CSS color name.
    ///
    /// Surrounding whitespace is ignored and names are case-insensitive.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(s, hex);
        }

        let lower = s.to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, [r, g, b, a])| Color::from_srgb_u8(*r, *g, *b, *a))
            .ok_or_else(|| ColorParseError::UnknownName(s.to_string()))
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

fn parse_hex(input: &str, hex: &str) -> Result<Color, ColorParseError> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorParseError::HexDigit(input.to_string()));
    }

    // All characters are ASCII hex digits here, so byte slicing is safe.
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);

    let rgba = match hex.len() {
        3 => [nibble(0), nibble(1), nibble(2), Ok(255)],
        6 => [byte(0), byte(2), byte(4), Ok(255)],
        8 => [byte(0), byte(2), byte(4), byte(6)],
        digits => {
            return Err(ColorParseError::HexLength { input: input.to_string(), digits });
        }
    };

    let mut out = [0u8; 4];
    for (slot, v) in out.iter_mut().zip(rgba) {
        *slot = v.map_err(|_| ColorParseError::HexDigit(input.to_string()))?;
    }
    let [r, g, b, a] = out;
    Ok(Color::from_srgb_u8(r, g, b, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_digit_hex() {
        assert_eq!(Color::parse("#1f1f1f").unwrap(), Color::from_srgb_u8(0x1f, 0x1f, 0x1f, 255));
    }

    #[test]
    fn short_hex_expands_nibbles() {
        assert_eq!(Color::parse("#fff").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("#f00").unwrap(), Color::parse("red").unwrap());
    }

    #[test]
    fn eight_digit_hex_carries_alpha() {
        let c = Color::parse("#00000080").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn names_ignore_case_and_padding() {
        assert_eq!(Color::parse("green ").unwrap(), Color::from_srgb_u8(0, 128, 0, 255));
        assert_eq!("Blue".parse::<Color>().unwrap(), Color::from_srgb_u8(0, 0, 255, 255));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(Color::parse("  "), Err(ColorParseError::Empty));
        assert!(matches!(Color::parse("#12345"), Err(ColorParseError::HexLength { digits: 5, .. })));
        assert!(matches!(Color::parse("#zzzzzz"), Err(ColorParseError::HexDigit(_))));
        assert!(matches!(Color::parse("chartreuse-ish"), Err(ColorParseError::UnknownName(_))));
    }
}
