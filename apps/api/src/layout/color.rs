use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Fallback accent (`#3B82F6`).
    pub const DEFAULT_ACCENT: Rgb = Rgb(59, 130, 246);
    /// Secondary text (`#6B7280`).
    pub const MUTED: Rgb = Rgb(107, 114, 128);
    /// Body text (`#1F2937`).
    pub const BODY: Rgb = Rgb(31, 41, 55);

    /// Components scaled to 0.0..=1.0, as PDF color operators expect.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        ]
    }

    /// Parses `#rrggbb` (case-insensitive, `#` optional).
    pub fn from_hex(input: &str) -> Option<Rgb> {
        let hex = input.strip_prefix('#').unwrap_or(input);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Accent color for a render request; anything unparsable falls back to the default blue.
pub fn parse_accent_color(input: Option<&str>) -> Rgb {
    input
        .map(str::trim)
        .and_then(Rgb::from_hex)
        .unwrap_or(Rgb::DEFAULT_ACCENT)
}
