use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::{Font, Paint, Placement, Stroke};

/// Panel edge carrying ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Bottom,
    Left,
}

/// Tick geometry shared by both edges.
struct TickMarks {
    /// +1 for ticks pointing away from the plot area, -1 for inward.
    outward: f64,
    major: f64,
    minor: f64,
    /// Distance from the frame to the tick labels.
    label_pad: f64,
}

impl TickMarks {
    fn new(config: &VizConfig) -> Self {
        let inward = config.axes.tick_direction == "in";
        let major = config.axes.tick_length;
        Self {
            outward: if inward { -1.0 } else { 1.0 },
            major,
            minor: config.axes.minor_tick_length,
            label_pad: if inward { 3.0 } else { major + 3.0 },
        }
    }

    fn draw(&self, canvas: &mut Canvas, area: &PlotArea, edge: Edge, axis: &Axis, config: &VizConfig) {
        let to_pixel = |val: f64| match edge {
            Edge::Bottom => axis.data_to_pixel(val, area.left, area.right()),
            Edge::Left => axis.data_to_pixel(val, area.bottom(), area.top),
        };
        // Segment from the frame outwards by `len` at pixel `p` along the edge.
        let segment = |p: f64, len: f64| match edge {
            Edge::Bottom => (p, area.bottom(), p, area.bottom() + self.outward * len),
            Edge::Left => (area.left, p, area.left - self.outward * len, p),
        };

        if self.major > 0.0 {
            let stroke = Stroke::tick(config);
            for &val in &axis.tick_positions {
                let (x1, y1, x2, y2) = segment(to_pixel(val), self.major);
                canvas.line(x1, y1, x2, y2, stroke);
            }
        }
        if self.minor > 0.0 {
            let stroke = Stroke::minor_tick(config);
            for &val in &axis.minor_ticks {
                let (x1, y1, x2, y2) = segment(to_pixel(val), self.minor);
                canvas.line(x1, y1, x2, y2, stroke);
            }
        }

        let font = tick_font(edge, config);
        for (&val, label) in axis.tick_positions.iter().zip(&axis.tick_labels) {
            let p = to_pixel(val);
            match edge {
                Edge::Bottom => canvas.text(p, area.bottom() + self.label_pad, label, &font),
                Edge::Left => canvas.text(area.left - self.label_pad - 1.0, p, label, &font),
            }
        }
    }
}

fn tick_font(edge: Edge, config: &VizConfig) -> Font {
    let placement = match edge {
        Edge::Bottom => Placement::Below,
        Edge::Left => Placement::LeftOf,
    };
    Font::tick(config).placed(placement)
}

/// Draw the panel frame with ticks, tick labels and axis labels.
pub fn draw_axes(canvas: &mut Canvas, area: &PlotArea, x_axis: &Axis, y_axis: &Axis, config: &VizConfig) {
    let marks = TickMarks::new(config);
    draw_frame(canvas, area, config);
    marks.draw(canvas, area, Edge::Bottom, x_axis, config);
    marks.draw(canvas, area, Edge::Left, y_axis, config);

    let label_font = Font::label(config);
    if !x_axis.label.is_empty() {
        let y = area.bottom() + marks.label_pad + config.font.tick_size + config.font.label_size + 4.0;
        canvas.text(area.left + area.width / 2.0, y, &x_axis.label, &label_font);
    }
    if !y_axis.label.is_empty() {
        let y_tick_font = tick_font(Edge::Left, config);
        let widest = y_axis
            .tick_labels
            .iter()
            .map(|l| canvas.measure_text(l, &y_tick_font).width)
            .fold(0.0_f64, f64::max);
        let x = area.left - marks.label_pad - widest - 8.0;
        canvas.text_rotated(x, area.top + area.height / 2.0, &y_axis.label, &label_font, -90.0);
    }
}

/// Outline `area` with the frame stroke; a non-positive frame width draws nothing.
pub fn draw_frame(canvas: &mut Canvas, area: &PlotArea, config: &VizConfig) {
    if config.axes.frame_width <= 0.0 {
        return;
    }
    canvas.rect(area.left, area.top, area.width, area.height, Paint::Outline(Stroke::frame(config)));
}
