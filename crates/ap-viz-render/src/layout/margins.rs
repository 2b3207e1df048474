/// Rectangular plot area within the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn manual(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Shrink by the given margins, keeping at least `min` points in each direction.
    pub fn inset(&self, left: f64, top: f64, right: f64, bottom: f64, min: f64) -> Self {
        Self {
            left: self.left + left,
            top: self.top + top,
            width: (self.width - left - right).max(min),
            height: (self.height - top - bottom).max(min),
        }
    }
}

/// Margins around a heatmap panel.
#[derive(Debug, Clone, Copy)]
pub struct PanelMargins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PanelMargins {
    /// Room for y tick labels of width `y_tick_width`, axis labels and the
    /// colorbar to the right.
    pub fn heatmap(
        y_tick_width: f64,
        has_y_label: bool,
        has_x_label: bool,
        tick_size: f64,
        label_size: f64,
        colorbar_room: f64,
    ) -> Self {
        let mut left = 6.0 + y_tick_width;
        if has_y_label {
            left += label_size + 8.0;
        }
        let mut bottom = 6.0 + tick_size + 4.0;
        if has_x_label {
            bottom += label_size + 6.0;
        }
        Self { left, top: label_size + 12.0, right: colorbar_room, bottom }
    }
}
