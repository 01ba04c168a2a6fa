//! Canonical text forms for colors and lengths.
//!
//! Everything here is pure and infallible: inputs that cannot be formatted
//! (NaN sizes, unparsable colors) produce `None` and callers skip them.

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::figma::api_types::FigmaColor;

/// Normalized RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Build a color, clamping every channel.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: clamp01(r),
            g: clamp01(g),
            b: clamp01(b),
            a: clamp01(a),
        }
    }

    pub fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Replace the alpha channel.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: clamp01(alpha),
            ..self
        }
    }
}

impl From<&FigmaColor> for Color {
    fn from(c: &FigmaColor) -> Self {
        Color::new(c.r, c.g, c.b, c.a)
    }
}

/// Names of the stylesheet helpers used to wrap responsive lengths,
/// e.g. `#{rem(14px)}` for mobile and `#{vw(24px)}` for desktop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UnitFunctions {
    pub mobile: String,
    pub desktop: String,
}

impl Default for UnitFunctions {
    fn default() -> Self {
        Self {
            mobile: "rem".to_string(),
            desktop: "vw".to_string(),
        }
    }
}

impl UnitFunctions {
    fn name(&self, desktop: bool) -> &str {
        if desktop {
            &self.desktop
        } else {
            &self.mobile
        }
    }
}

/// Clamp to `[0, 1]`; NaN becomes 0.
pub fn clamp01(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Effective alpha of a paint: node opacity × paint opacity × color alpha.
///
/// Each factor is clamped before multiplying and the product is clamped again.
pub fn compose_alpha(node_opacity: f32, paint_opacity: f32, channel_alpha: f32) -> f32 {
    clamp01(clamp01(node_opacity) * clamp01(paint_opacity) * clamp01(channel_alpha))
}

/// `#rrggbb` when fully opaque, otherwise `rgba(r, g, b, a)`.
pub fn format_color(color: Color) -> String {
    let rgb: Srgb<u8> =
        Srgb::new(clamp01(color.r), clamp01(color.g), clamp01(color.b)).into_format();
    let alpha = round_to(clamp01(color.a), 3);

    if alpha >= 1.0 {
        format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
    } else {
        format!(
            "rgba({}, {}, {}, {})",
            rgb.red,
            rgb.green,
            rgb.blue,
            trim_decimal(alpha, 3)
        )
    }
}

/// Round to the nearest pixel: `13.6` → `14px`.
pub fn format_length(px: f32) -> Option<String> {
    if !px.is_finite() {
        return None;
    }
    Some(format!("{}px", px.round() as i64))
}

/// Length wrapped in the responsive unit helper, e.g. `#{rem(14px)}`.
pub fn format_length_wrapped(px: f32, desktop: bool, units: &UnitFunctions) -> Option<String> {
    let length = format_length(px)?;
    Some(format!("#{{{}({})}}", units.name(desktop), length))
}

/// Bare multiplier such as `1.5` or `1.333`.
pub fn format_unitless_ratio(n: f32) -> Option<String> {
    if !n.is_finite() {
        return None;
    }
    Some(trim_decimal(round_to(n, 3), 3))
}

/// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(...)` or `rgba(...)`.
pub fn parse_color(text: &str) -> Option<Color> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = text.to_ascii_lowercase();
    let inner = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |s: &str| s.parse::<f32>().ok().map(|v| v / 255.0);
    let alpha = match parts.get(3) {
        Some(a) => a.parse::<f32>().ok()?,
        None => 1.0,
    };
    Some(Color::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };

    let byte = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    let alpha = if expanded.len() == 8 { byte(6)? } else { 1.0 };
    Some(Color::new(byte(0)?, byte(2)?, byte(4)?, alpha))
}

fn round_to(value: f32, decimals: i32) -> f32 {
    let factor = 10f32.powi(decimals);
    (value * factor).round() / factor
}

fn trim_decimal(value: f32, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}
