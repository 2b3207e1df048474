//! Paint and type settings of the comparison figure.
//!
//! Cells and colorbar steps are filled rectangles, frames and ticks are
//! strokes, and every text run is one of a handful of placements around its
//! anchor point.

use crate::color::Color;
use crate::config::VizConfig;

/// A stroked line or outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }

    pub fn tick(config: &VizConfig) -> Self {
        Self::new(config.colors.frame, 0.6)
    }

    pub fn minor_tick(config: &VizConfig) -> Self {
        Self::new(config.colors.frame, 0.4)
    }

    pub fn frame(config: &VizConfig) -> Self {
        Self::new(config.colors.frame, config.axes.frame_width)
    }
}

/// How a rectangle is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill(Color),
    Outline(Stroke),
}

/// Where a text run sits relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Centered horizontally, baseline on the anchor (titles, axis labels).
    #[default]
    Above,
    /// Centered horizontally, hanging from the anchor (x tick labels, suptitle).
    Below,
    /// Centered on the anchor (cell annotations).
    Center,
    /// Starting at the anchor, vertically centered (colorbar tick labels).
    RightOf,
    /// Ending at the anchor, vertically centered (y tick labels).
    LeftOf,
}

impl Placement {
    /// `text-anchor` and `dominant-baseline` values.
    pub fn svg_alignment(self) -> (&'static str, &'static str) {
        match self {
            Placement::Above => ("middle", "auto"),
            Placement::Below => ("middle", "hanging"),
            Placement::Center => ("middle", "central"),
            Placement::RightOf => ("start", "central"),
            Placement::LeftOf => ("end", "central"),
        }
    }
}

/// Size, color, weight and placement of a text run.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub size: f64,
    pub color: Color,
    pub bold: bool,
    pub placement: Placement,
}

impl Font {
    pub fn new(size: f64, color: Color) -> Self {
        Self { size, color, bold: false, placement: Placement::default() }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn placed(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn colored(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn tick(config: &VizConfig) -> Self {
        Self::new(config.font.tick_size, config.colors.text)
    }

    pub fn label(config: &VizConfig) -> Self {
        Self::new(config.font.label_size, config.colors.text)
    }

    pub fn title(config: &VizConfig) -> Self {
        Self::new(config.font.title_size, config.colors.text)
    }

    pub fn suptitle(config: &VizConfig) -> Self {
        Self::new(config.font.suptitle_size, config.colors.text).bold().placed(Placement::Below)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fonts_follow_config() {
        let mut cfg = VizConfig::default();
        cfg.font.tick_size = 7.5;
        let t = Font::tick(&cfg);
        assert_eq!(t.size, 7.5);
        assert_eq!(t.placement, Placement::Above);
        assert!(!t.bold);

        let s = Font::suptitle(&cfg);
        assert!(s.bold);
        assert_eq!(s.placement.svg_alignment(), ("middle", "hanging"));
    }

    #[test]
    fn frame_stroke_uses_frame_width() {
        let mut cfg = VizConfig::default();
        cfg.axes.frame_width = 1.25;
        assert_eq!(Stroke::frame(&cfg).width, 1.25);
        assert_eq!(Stroke::frame(&cfg).color, cfg.colors.frame);
    }
}
