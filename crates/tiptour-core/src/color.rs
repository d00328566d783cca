#![forbid(unsafe_code)]

//! Compact RGBA colour used by appearance settings.

use std::fmt;

/// A compact RGBA color.
///
/// - **Layout:** `0xRRGGBBAA` (R in bits 31..24, A in bits 7..0).
/// - **Alpha:** straight (RGB channels are not pre-multiplied).
///
/// With the `serde` feature the colour serializes as a `#RRGGBBAA` string and
/// accepts `#RRGGBB` or `#RRGGBBAA` on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
#[repr(transparent)]
pub struct Rgba(pub u32);

impl Rgba {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Apply uniform opacity in `[0.0, 1.0]` by scaling alpha.
    ///
    /// Non-finite opacity is treated as fully opaque.
    #[inline]
    pub fn with_opacity(self, opacity: f64) -> Self {
        let opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let a = ((self.a() as f64) * opacity).round().clamp(0.0, 255.0) as u8;
        Self::rgba(self.r(), self.g(), self.b(), a)
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(text: &str) -> Option<Self> {
        let hex = text.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            6 => u32::from_str_radix(hex, 16).ok().map(|v| Self((v << 8) | 0xFF)),
            8 => u32::from_str_radix(hex, 16).ok().map(Self),
            _ => None,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgba::from_hex(&value).ok_or_else(|| format!("invalid colour {value:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::Rgba;

    #[test]
    fn channels_round_trip_through_packing() {
        let c = Rgba::rgba(1, 2, 3, 4);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
        assert_eq!(Rgba::rgb(9, 8, 7).a(), 255);
    }

    #[test]
    fn with_opacity_scales_alpha() {
        assert_eq!(Rgba::BLACK.with_opacity(0.5).a(), 128);
        assert_eq!(Rgba::BLACK.with_opacity(2.0).a(), 255);
        assert_eq!(Rgba::BLACK.with_opacity(-1.0).a(), 0);
        assert_eq!(Rgba::BLACK.with_opacity(f64::NAN).a(), 255);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Rgba::from_hex("#FF0000"), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(Rgba::from_hex("00ff0080"), Some(Rgba::rgba(0, 255, 0, 128)));
        assert_eq!(Rgba::from_hex("#12345"), None);
        assert_eq!(Rgba::from_hex("#GGGGGG"), None);
        assert_eq!(Rgba::from_hex("+1234567"), None);
    }

    #[test]
    fn display_is_upper_hex_with_alpha() {
        assert_eq!(Rgba::rgba(0xAB, 0xCD, 0xEF, 0x01).to_string(), "#ABCDEF01");
    }
}
