use palette::{Srgba, WithAlpha};
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumString};

pub type Color = Srgba<f64>;

pub const DEFAULT_GRAY: Color = Srgba::new(0.557, 0.557, 0.576, 1.0);

/// The system accent palette slices are tinted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum NamedColor {
    #[strum(serialize = "red", serialize = "systemred")]
    Red,
    #[strum(serialize = "orange", serialize = "systemorange")]
    Orange,
    #[strum(serialize = "yellow", serialize = "systemyellow")]
    Yellow,
    #[strum(serialize = "green", serialize = "systemgreen")]
    Green,
    #[strum(serialize = "mint", serialize = "systemmint")]
    Mint,
    #[strum(serialize = "teal", serialize = "systemteal")]
    Teal,
    #[strum(serialize = "cyan", serialize = "systemcyan")]
    Cyan,
    #[strum(serialize = "blue", serialize = "systemblue")]
    Blue,
    #[strum(serialize = "indigo", serialize = "systemindigo")]
    Indigo,
    #[strum(serialize = "purple", serialize = "systempurple")]
    Purple,
    #[strum(serialize = "pink", serialize = "systempink")]
    Pink,
    #[strum(serialize = "brown")]
    Brown,
    #[strum(serialize = "white")]
    White,
    #[strum(serialize = "black")]
    Black,
    #[strum(
        serialize = "gray",
        serialize = "grey",
        serialize = "systemgray",
        serialize = "systemgrey"
    )]
    Gray,
}

impl NamedColor {
    pub fn color(self) -> Color {
        let (r, g, b) = match self {
            Self::Red => (1.0, 0.231, 0.188),
            Self::Orange => (1.0, 0.584, 0.0),
            Self::Yellow => (1.0, 0.8, 0.0),
            Self::Green => (0.204, 0.78, 0.349),
            Self::Mint => (0.0, 0.78, 0.745),
            Self::Teal => (0.188, 0.69, 0.78),
            Self::Cyan => (0.196, 0.678, 0.902),
            Self::Blue => (0.0, 0.478, 1.0),
            Self::Indigo => (0.345, 0.337, 0.839),
            Self::Purple => (0.686, 0.322, 0.871),
            Self::Pink => (1.0, 0.176, 0.333),
            Self::Brown => (0.6, 0.4, 0.2),
            Self::White => (1.0, 1.0, 1.0),
            Self::Black => (0.0, 0.0, 0.0),
            Self::Gray => return DEFAULT_GRAY,
        };
        Srgba::new(r, g, b, 1.0)
    }
}

/// `#rgb`, `#rrggbb` or `#rrggbbaa`; the `#` is optional.
pub fn parse_hex_color(spec: &str) -> Option<Color> {
    let trimmed = spec.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };

    let value = u32::from_str_radix(&expanded, 16).ok()?;
    let channel = |shift: u32| ((value >> shift) & 0xff) as f64 / 255.0;

    if expanded.len() == 6 {
        Some(Srgba::new(channel(16), channel(8), channel(0), 1.0))
    } else {
        Some(Srgba::new(channel(24), channel(16), channel(8), channel(0)))
    }
}

/// Hex first, then the accent palette, then CSS color names.
pub fn parse_color_spec(spec: &str) -> Option<Color> {
    if let Some(color) = parse_hex_color(spec) {
        return Some(color);
    }

    let key: String = spec
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .to_lowercase();

    NamedColor::from_str(&key)
        .map(NamedColor::color)
        .ok()
        .or_else(|| {
            palette::named::from_str(&key).map(|c| c.into_format::<f64>().with_alpha(1.0))
        })
}

pub fn resolve_color_spec(spec: &str) -> Color {
    parse_color_spec(spec).unwrap_or(DEFAULT_GRAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hex_is_full_alpha() {
        assert_eq!(resolve_color_spec("#f00"), Srgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(resolve_color_spec("0f0"), Srgba::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn eight_digit_hex_carries_alpha() {
        let c = parse_color_spec("#00000080").unwrap();
        assert_eq!((c.red, c.green, c.blue), (0.0, 0.0, 0.0));
        assert!((c.alpha - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#ggg"), None);
        assert_eq!(parse_hex_color(""), None);
    }

    #[test]
    fn names_ignore_case_and_separators() {
        assert_eq!(parse_color_spec("System Blue"), Some(NamedColor::Blue.color()));
        assert_eq!(parse_color_spec("system_grey"), Some(DEFAULT_GRAY));
        let hot_pink = palette::named::from_str("hotpink").map(|c| c.into_format::<f64>());
        assert_eq!(parse_color_spec("Hot-Pink"), hot_pink.map(|c| c.with_alpha(1.0)));
    }

    #[test]
    fn unknown_spec_resolves_to_default_gray() {
        assert_eq!(parse_color_spec("turquoise99"), None);
        assert_eq!(resolve_color_spec("turquoise99"), DEFAULT_GRAY);
    }
}
