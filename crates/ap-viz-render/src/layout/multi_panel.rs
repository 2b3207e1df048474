use crate::layout::margins::PlotArea;

/// Row of equally sized panels separated by a fixed gap.
#[derive(Debug, Clone)]
pub struct PanelRow {
    pub panels: Vec<PlotArea>,
}

impl PanelRow {
    pub fn new(left: f64, top: f64, total_width: f64, height: f64, gap: f64, n: usize) -> Self {
        let n = n.max(1);
        let w = (total_width - gap * (n - 1) as f64) / n as f64;
        let panels =
            (0..n).map(|i| PlotArea::manual(left + i as f64 * (w + gap), top, w, height)).collect();
        Self { panels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_panels_fill_width() {
        let row = PanelRow::new(10.0, 20.0, 320.0, 100.0, 10.0, 3);
        assert_eq!(row.panels.len(), 3);
        assert_eq!(row.panels[0].width, 100.0);
        assert_eq!(row.panels[1].left, 120.0);
        assert_eq!(row.panels[2].right(), 330.0);
    }
}
