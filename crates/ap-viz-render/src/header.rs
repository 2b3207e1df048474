use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::primitives::Font;

/// Draw the figure-wide title centered above all panels.
pub fn draw_suptitle(canvas: &mut Canvas, title: &str, config: &VizConfig) {
    if title.is_empty() {
        return;
    }
    canvas.text(canvas.width / 2.0, 8.0, title, &Font::suptitle(config));
}

/// Vertical space reserved for the suptitle.
pub fn suptitle_height(title: &str, config: &VizConfig) -> f64 {
    if title.is_empty() { 8.0 } else { config.font.suptitle_size + 16.0 }
}

/// Draw a panel title centered over the span `[left, left + width]`.
pub fn draw_panel_title(canvas: &mut Canvas, left: f64, width: f64, top: f64, title: &str, config: &VizConfig) {
    canvas.text(left + width / 2.0, top - 6.0, title, &Font::title(config));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suptitle_drawn_centered() {
        let cfg = VizConfig::default();
        let mut c = Canvas::new(300.0, 100.0);
        draw_suptitle(&mut c, "IceCube DeepCore", &cfg);
        let svg = c.finish_svg();
        assert!(svg.contains("IceCube DeepCore"));
        assert!(svg.contains("x=\"150.00\""));
        assert!(svg.contains("font-weight=\"bold\""));
    }

    #[test]
    fn empty_title_draws_nothing() {
        let cfg = VizConfig::default();
        let mut c = Canvas::new(300.0, 100.0);
        draw_suptitle(&mut c, "", &cfg);
        assert!(!c.finish_svg().contains("<text"));
        assert!(suptitle_height("", &cfg) < suptitle_height("t", &cfg));
    }
}
