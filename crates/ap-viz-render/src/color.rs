use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn hex(s: &str) -> Self {
        let s = s.strip_prefix('#').unwrap_or(s);
        let channel = |i: usize| s.get(i..i + 2).and_then(|h| u8::from_str_radix(h, 16).ok());
        Self { r: channel(0).unwrap_or(0), g: channel(2).unwrap_or(0), b: channel(4).unwrap_or(0), a: 1.0 }
    }

    /// From unit-interval channels (matplotlib segment data).
    fn unit(r: f64, g: f64, b: f64) -> Self {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(q(r), q(g), q(b))
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            self.to_hex()
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation between two colors (for colormaps).
    pub fn lerp(a: Color, b: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: (a.r as f64 * (1.0 - t) + b.r as f64 * t).round() as u8,
            g: (a.g as f64 * (1.0 - t) + b.g as f64 * t).round() as u8,
            b: (a.b as f64 * (1.0 - t) + b.b as f64 * t).round() as u8,
            a: a.a * (1.0 - t) + b.a * t,
        }
    }

    /// Black or white, whichever reads better on top of `self`.
    pub fn contrasting_text(&self) -> Color {
        let luma = 0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64;
        if luma > 140.0 { Color::rgb(0, 0, 0) } else { Color::rgb(255, 255, 255) }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Color::hex(&s))
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

// --- Colormaps ---

/// Colormaps for map panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Colormap {
    /// Sequential black → red → yellow → white.
    Afmhot,
    /// Diverging dark blue → white → dark red.
    Seismic,
    /// Sequential white → dark blue.
    Blues,
    /// Diverging blue → white → red.
    RdBuR,
}

impl Colormap {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "afmhot" => Some(Self::Afmhot),
            "seismic" => Some(Self::Seismic),
            "blues" => Some(Self::Blues),
            "rdbu_r" => Some(Self::RdBuR),
            _ => None,
        }
    }

    /// Color at position `t` in `[0, 1]` (clamped).
    pub fn at(self, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        match self {
            Colormap::Afmhot => {
                Color::unit(2.0 * t, 2.0 * t - 0.5, 2.0 * t - 1.0)
            }
            Colormap::Seismic => segmented(
                &[(0.0, 0.0, 0.3), (0.0, 0.0, 1.0), (1.0, 1.0, 1.0), (1.0, 0.0, 0.0), (0.5, 0.0, 0.0)],
                t,
            ),
            Colormap::Blues => Color::lerp(Color::rgb(247, 251, 255), Color::hex("#08306b"), t),
            Colormap::RdBuR => {
                if t < 0.5 {
                    Color::lerp(Color::hex("#2166ac"), Color::rgb(255, 255, 255), t * 2.0)
                } else {
                    Color::lerp(Color::rgb(255, 255, 255), Color::hex("#b2182b"), t * 2.0 - 1.0)
                }
            }
        }
    }

    /// Color for `value` on the scale `[vmin, vmax]`.
    pub fn map(self, value: f64, vmin: f64, vmax: f64) -> Color {
        let span = vmax - vmin;
        let t = if span.abs() < f64::EPSILON { 0.5 } else { (value - vmin) / span };
        self.at(t)
    }
}

/// Evenly spaced anchor colors, linearly interpolated.
fn segmented(anchors: &[(f64, f64, f64)], t: f64) -> Color {
    let n = anchors.len() - 1;
    let pos = t * n as f64;
    let i = (pos.floor() as usize).min(n - 1);
    let f = pos - i as f64;
    let (r0, g0, b0) = anchors[i];
    let (r1, g1, b1) = anchors[i + 1];
    Color::unit(r0 + (r1 - r0) * f, g0 + (g1 - g0) * f, b0 + (b1 - b0) * f)
}
