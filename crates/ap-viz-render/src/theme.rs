use crate::color::{Color, Colormap};
use crate::config::*;

/// Built-in theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTheme {
    Default,
    Print,
    Minimal,
}

impl BuiltinTheme {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "print" => Some(Self::Print),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    pub fn base_config(self) -> VizConfig {
        match self {
            Self::Default => default_theme(),
            Self::Print => print(),
            Self::Minimal => minimal(),
        }
    }
}

fn default_theme() -> VizConfig {
    VizConfig {
        theme: "default".into(),
        figure: FigureConfig::default(),
        font: FontConfig::default(),
        axes: AxesConfig::default(),
        colors: ColorsConfig::default(),
        panels: PanelsConfig::default(),
        output: OutputConfig::default(),
    }
}

/// Journal-width figure, inward ticks, bin values annotated on small maps.
fn print() -> VizConfig {
    VizConfig {
        theme: "print".into(),
        figure: FigureConfig { width: 720.0, height: 252.0 },
        font: FontConfig { title_size: 9.0, suptitle_size: 10.5, label_size: 8.5, tick_size: 7.0 },
        axes: AxesConfig {
            tick_direction: "in".into(),
            tick_length: 3.5,
            minor_tick_length: 2.0,
            target_ticks: 4,
            frame_width: 0.6,
        },
        panels: PanelsConfig { gap: 22.0, colorbar_width: 7.0, annotate_max_bins: 25, ..PanelsConfig::default() },
        output: OutputConfig { format: "pdf".into(), dpi: 300 },
        ..default_theme()
    }
}

fn minimal() -> VizConfig {
    VizConfig {
        theme: "minimal".into(),
        axes: AxesConfig { tick_length: 0.0, minor_tick_length: 0.0, frame_width: 0.0, ..AxesConfig::default() },
        colors: ColorsConfig {
            sequential: Colormap::Blues,
            diverging: Colormap::RdBuR,
            background: Color::hex("#f1f5f9"),
            frame: Color::hex("#475569"),
            text: Color::hex("#1e293b"),
        },
        output: OutputConfig { format: "svg".into(), dpi: 150 },
        ..default_theme()
    }
}
