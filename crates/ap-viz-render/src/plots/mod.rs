pub mod comparison;
pub mod heatmap;

mod axes_draw;
