use ap_viz::AsymmetryArtifact;

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::header::{draw_suptitle, suptitle_height};
use crate::layout::multi_panel::PanelRow;
use crate::plots::heatmap::{draw_heatmap_panel, panel_axes};

/// Render the hypothesis 0 / hypothesis 1 / derived figure.
pub fn render(artifact: &AsymmetryArtifact, config: &VizConfig) -> crate::Result<String> {
    let panels = [&artifact.h0, &artifact.h1, &artifact.derived];
    // Fail before drawing anything.
    for panel in panels {
        panel_axes(panel, config)?;
    }

    let mut canvas = Canvas::new(config.figure.width, config.figure.height);
    let top = suptitle_height(&artifact.title, config);
    let row = PanelRow::new(
        6.0,
        top,
        config.figure.width - 12.0,
        config.figure.height - top - 4.0,
        config.panels.gap,
        panels.len(),
    );

    for (panel, area) in panels.into_iter().zip(&row.panels) {
        draw_heatmap_panel(&mut canvas, area, panel, config)?;
    }
    draw_suptitle(&mut canvas, &artifact.title, config);

    Ok(canvas.finish_svg())
}
