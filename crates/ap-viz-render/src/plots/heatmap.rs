use ap_viz::{MapPanel, PanelScale};

use crate::RenderError;
use crate::canvas::Canvas;
use crate::color::Colormap;
use crate::config::VizConfig;
use crate::header::draw_panel_title;
use crate::layout::axes::{Axis, format_tick};
use crate::layout::margins::{PanelMargins, PlotArea};
use crate::plots::axes_draw::{draw_axes, draw_frame};
use crate::primitives::{Font, Paint, Placement, Stroke};

/// Axes of a heatmap panel: x is the first binning dimension, y the second
/// (or a single unlabeled row for 1-D maps).
pub fn panel_axes(panel: &MapPanel, config: &VizConfig) -> crate::Result<(Axis, Axis)> {
    let target = config.axes.target_ticks;
    let (x, y) = match panel.axes.as_slice() {
        [x] => (Axis::from_panel_axis(x, target), Axis::single_row()),
        [x, y] => (Axis::from_panel_axis(x, target), Axis::from_panel_axis(y, target)),
        other => {
            return Err(RenderError::Layout(format!(
                "panel '{}' has {} dimensions; only 1-D and 2-D maps can be drawn",
                panel.title,
                other.len()
            )));
        }
    };
    let expected = x.num_cells() * y.num_cells();
    if panel.values.len() != expected {
        return Err(RenderError::Layout(format!(
            "panel '{}' has {} values for {} bins",
            panel.title,
            panel.values.len(),
            expected
        )));
    }
    Ok((x, y))
}

fn colormap(panel: &MapPanel, config: &VizConfig) -> Colormap {
    match panel.scale {
        PanelScale::Sequential => config.colors.sequential,
        PanelScale::Diverging => config.colors.diverging,
    }
}

/// Draw one panel (title, cells, axes, colorbar) into `outer`.
pub fn draw_heatmap_panel(
    canvas: &mut Canvas,
    outer: &PlotArea,
    panel: &MapPanel,
    config: &VizConfig,
) -> crate::Result<()> {
    let (x_axis, y_axis) = panel_axes(panel, config)?;
    let cmap = colormap(panel, config);
    let cbar_axis = Axis::linear_within(panel.vmin, panel.vmax, config.axes.target_ticks);

    let tick_font = Font::tick(config);
    let widest = |labels: &[String]| {
        labels.iter().map(|l| canvas.measure_text(l, &tick_font).width).fold(0.0_f64, f64::max)
    };
    let tick_room = if config.axes.tick_direction == "in" { 0.0 } else { config.axes.tick_length };
    let colorbar_room = config.panels.colorbar_gap
        + config.panels.colorbar_width
        + tick_room
        + 4.0
        + widest(&cbar_axis.tick_labels)
        + config.font.label_size
        + 6.0;
    let margins = PanelMargins::heatmap(
        widest(&y_axis.tick_labels) + tick_room,
        !y_axis.label.is_empty(),
        !x_axis.label.is_empty(),
        config.font.tick_size + tick_room,
        config.font.label_size,
        colorbar_room,
    );
    let area = outer.inset(margins.left, margins.top, margins.right, margins.bottom, 20.0);

    draw_panel_title(canvas, area.left, area.width, area.top, &panel.title, config);
    canvas.rect(area.left, area.top, area.width, area.height, Paint::Fill(config.colors.background));

    let ny = y_axis.num_cells();
    let annotate =
        config.panels.annotate_max_bins > 0 && panel.values.len() <= config.panels.annotate_max_bins;
    canvas.push_clip(area.left, area.top, area.width, area.height);
    for ix in 0..x_axis.num_cells() {
        let (x0, x1) = x_axis.cell_span(ix, area.left, area.right());
        for iy in 0..ny {
            let Some(value) = panel.values[ix * ny + iy] else {
                continue;
            };
            let (y0, y1) = y_axis.cell_span(iy, area.bottom(), area.top);
            let fill = cmap.map(value, panel.vmin, panel.vmax);
            // Slight overlap hides anti-aliasing seams between cells.
            canvas.rect(x0, y1, (x1 - x0) + 0.3, (y0 - y1) + 0.3, Paint::Fill(fill));
            if annotate {
                let font = Font::new(config.font.tick_size * 0.9, fill.contrasting_text())
                    .placed(Placement::Center);
                canvas.text((x0 + x1) / 2.0, (y0 + y1) / 2.0, &format_value(value), &font);
            }
        }
    }
    canvas.pop_clip();

    draw_axes(canvas, &area, &x_axis, &y_axis, config);
    draw_colorbar(canvas, &area, panel, cmap, &cbar_axis, config);
    Ok(())
}

fn draw_colorbar(
    canvas: &mut Canvas,
    area: &PlotArea,
    panel: &MapPanel,
    cmap: Colormap,
    axis: &Axis,
    config: &VizConfig,
) {
    let bar = PlotArea::manual(
        area.right() + config.panels.colorbar_gap,
        area.top,
        config.panels.colorbar_width,
        area.height,
    );
    let steps = config.panels.colorbar_steps.max(2);
    let step_h = bar.height / steps as f64;
    for i in 0..steps {
        let t = 1.0 - (i as f64 + 0.5) / steps as f64;
        let y = bar.top + i as f64 * step_h;
        canvas.rect(bar.left, y, bar.width, step_h + 0.3, Paint::Fill(cmap.at(t)));
    }
    draw_frame(canvas, &bar, config);

    let tick_stroke = Stroke::tick(config);
    let label_font = Font::tick(config).placed(Placement::RightOf);
    let tl = config.axes.tick_length;
    let out = if config.axes.tick_direction == "in" { 0.0 } else { tl };
    let mut widest = 0.0_f64;
    for (val, label) in axis.tick_positions.iter().zip(&axis.tick_labels) {
        let py = axis.data_to_pixel(*val, bar.bottom(), bar.top);
        if tl > 0.0 {
            canvas.line(bar.right(), py, bar.right() + out.max(tl * 0.5), py, tick_stroke);
        }
        canvas.text(bar.right() + out + 3.0, py, label, &label_font);
        widest = widest.max(canvas.measure_text(label, &label_font).width);
    }

    if !panel.colorbar_label.is_empty() {
        let x = bar.right() + out + 3.0 + widest + config.font.label_size;
        canvas.text_rotated(x, bar.top + bar.height / 2.0, &panel.colorbar_label, &Font::label(config), -90.0);
    }
}

fn format_value(v: f64) -> String {
    let mag = v.abs();
    if mag != 0.0 && !(1e-2..1e4).contains(&mag) {
        format!("{v:.1e}")
    } else if mag >= 100.0 {
        format_tick(v, 1.0)
    } else {
        format!("{v:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_viz::PanelAxis;

    fn axis(name: &str, edges: Vec<f64>) -> PanelAxis {
        PanelAxis { name: name.into(), label: name.into(), bin_edges: edges, bin_names: None, is_log: false }
    }

    fn panel(axes: Vec<PanelAxis>, values: Vec<Option<f64>>) -> MapPanel {
        MapPanel {
            title: "Hypothesis 0: NO".into(),
            colorbar_label: "N_NO".into(),
            scale: PanelScale::Sequential,
            axes,
            values,
            vmin: 0.0,
            vmax: 4.0,
        }
    }

    #[test]
    fn two_dim_panel_draws_every_finite_cell() {
        let cfg = VizConfig::default();
        let p = panel(
            vec![axis("reco_energy", vec![0.0, 1.0, 2.0]), axis("coszen", vec![-1.0, 0.0, 1.0])],
            vec![Some(1.0), None, Some(3.0), Some(4.0)],
        );
        let mut c = Canvas::new(400.0, 300.0);
        draw_heatmap_panel(&mut c, &PlotArea::manual(0.0, 0.0, 400.0, 300.0), &p, &cfg).unwrap();
        let svg = c.finish_svg();
        // afmhot at a quarter and three quarters of the [0, 4] scale.
        assert!(svg.contains(r##"fill="#800000""##));
        assert!(svg.contains(r##"fill="#ffff80""##));
        assert!(svg.contains("Hypothesis 0: NO"));
        assert!(svg.contains("reco_energy"));
        assert!(svg.contains("coszen"));
        assert!(svg.contains("N_NO"));
        assert!(svg.contains("clip-path"));
    }

    #[test]
    fn one_dim_panel_is_a_single_row() {
        let cfg = VizConfig::default();
        let p = panel(vec![axis("pid", vec![0.0, 1.0, 2.0, 3.0])], vec![Some(0.0), Some(2.0), Some(4.0)]);
        let (x, y) = panel_axes(&p, &cfg).unwrap();
        assert_eq!(x.num_cells(), 3);
        assert_eq!(y.num_cells(), 1);
        assert!(y.tick_labels.is_empty());
    }

    #[test]
    fn three_dims_is_a_layout_error() {
        let cfg = VizConfig::default();
        let p = panel(
            vec![axis("a", vec![0.0, 1.0]), axis("b", vec![0.0, 1.0]), axis("c", vec![0.0, 1.0])],
            vec![Some(1.0)],
        );
        assert!(matches!(panel_axes(&p, &cfg), Err(RenderError::Layout(_))));
    }

    #[test]
    fn value_count_mismatch_is_a_layout_error() {
        let cfg = VizConfig::default();
        let p = panel(vec![axis("a", vec![0.0, 1.0, 2.0])], vec![Some(1.0)]);
        assert!(matches!(panel_axes(&p, &cfg), Err(RenderError::Layout(_))));
    }

    #[test]
    fn named_bins_become_categorical_ticks() {
        let cfg = VizConfig::default();
        let mut a = axis("pid", vec![-3.0, 2.0, 1000.0]);
        a.bin_names = Some(vec!["cscd".into(), "trck".into()]);
        let p = panel(vec![a], vec![Some(1.0), Some(2.0)]);
        let (x, _) = panel_axes(&p, &cfg).unwrap();
        assert_eq!(x.tick_labels, vec!["cscd", "trck"]);
        assert_eq!(x.edges, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn annotations_follow_config() {
        let mut cfg = VizConfig::default();
        cfg.panels.annotate_max_bins = 10;
        let p = panel(vec![axis("e", vec![0.0, 1.0, 2.0])], vec![Some(1.25), Some(3.5)]);
        let mut c = Canvas::new(300.0, 200.0);
        draw_heatmap_panel(&mut c, &PlotArea::manual(0.0, 0.0, 300.0, 200.0), &p, &cfg).unwrap();
        let svg = c.finish_svg();
        assert!(svg.contains(">1.25</text>"));
        assert!(svg.contains(">3.50</text>"));
    }

    #[test]
    fn value_formatting() {
        assert_eq!(format_value(2.25), "2.25");
        assert_eq!(format_value(250.0), "250");
        assert_eq!(format_value(0.0), "0.00");
        assert_eq!(format_value(12345.0), "1.2e4");
    }
}
