use crate::primitives::Font;

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

/// Average advance of a sans-serif glyph, in ems.
const AVG_ADVANCE_EM: f64 = 0.55;
const NARROW_ADVANCE_EM: f64 = 0.3;
const BOLD_WIDENING: f64 = 1.06;

/// Estimate text extent in points.
///
/// Output is converted by usvg with whatever fonts the host provides, so the
/// layout only needs a stable approximation, not exact glyph advances.
pub fn measure_text(text: &str, font: &Font) -> TextMetrics {
    let ems: f64 = text
        .chars()
        .map(|c| match c {
            'i' | 'l' | 'j' | 't' | 'f' | 'r' | 'I' | '.' | ',' | ':' | ';' | '\'' | '|' | ' '
            | '(' | ')' | '[' | ']' => NARROW_ADVANCE_EM,
            'm' | 'w' | 'M' | 'W' => AVG_ADVANCE_EM * 1.5,
            _ => AVG_ADVANCE_EM,
        })
        .sum();
    let weight = if font.bold { BOLD_WIDENING } else { 1.0 };
    TextMetrics { width: ems * font.size * weight, height: font.size * 1.2, ascent: font.size * 0.9 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn regular(size: f64) -> Font {
        Font::new(size, Color::rgb(0, 0, 0))
    }

    #[test]
    fn measure_hello() {
        let m = measure_text("Hello", &regular(12.0));
        assert!(m.width > 20.0);
        assert!(m.height > 8.0);
        assert!(m.ascent > 0.0);
    }

    #[test]
    fn bold_wider_than_regular() {
        let r = measure_text("Test", &regular(10.0));
        let b = measure_text("Test", &regular(10.0).bold());
        assert!(b.width > r.width);
    }

    #[test]
    fn narrow_glyphs_take_less_room() {
        assert!(measure_text("iii", &regular(10.0)).width < measure_text("MMM", &regular(10.0)).width);
        assert_eq!(measure_text("", &regular(10.0)).width, 0.0);
    }
}
