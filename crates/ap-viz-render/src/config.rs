use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;

use crate::color::{Color, Colormap};
use crate::theme::BuiltinTheme;

/// Top-level visualization configuration (YAML or programmatic).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub theme: String,
    pub figure: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub colors: ColorsConfig,
    pub panels: PanelsConfig,
    pub output: OutputConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        BuiltinTheme::Default.base_config()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 1080.0, // 15" * 72
            height: 360.0, // 5" * 72
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub title_size: f64,
    pub suptitle_size: f64,
    pub label_size: f64,
    pub tick_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { title_size: 11.0, suptitle_size: 13.0, label_size: 10.0, tick_size: 8.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: String,
    pub tick_length: f64,
    pub minor_tick_length: f64,
    /// Target number of major ticks on linear axes.
    pub target_ticks: usize,
    pub frame_width: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: "out".into(),
            tick_length: 4.0,
            minor_tick_length: 2.0,
            target_ticks: 5,
            frame_width: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    /// Colormap of the two hypothesis panels.
    pub sequential: Colormap,
    /// Colormap of the derived panel.
    pub diverging: Colormap,
    /// Panel background; shows through non-finite cells.
    pub background: Color,
    pub frame: Color,
    pub text: Color,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            sequential: Colormap::Afmhot,
            diverging: Colormap::Seismic,
            background: Color::rgb(255, 255, 255),
            frame: Color::rgb(0, 0, 0),
            text: Color::rgb(0, 0, 0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelsConfig {
    pub gap: f64,
    pub colorbar_width: f64,
    pub colorbar_gap: f64,
    /// Colorbar gradient resolution.
    pub colorbar_steps: usize,
    /// Write the value into each cell when the map has at most this many bins.
    pub annotate_max_bins: usize,
}

impl Default for PanelsConfig {
    fn default() -> Self {
        Self {
            gap: 28.0,
            colorbar_width: 10.0,
            colorbar_gap: 6.0,
            colorbar_steps: 64,
            annotate_max_bins: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: "pdf".into(), dpi: 150 }
    }
}

/// Resolve a VizConfig from optional YAML string.
/// Priority: user YAML overrides → theme base config (selected by the YAML's `theme` key).
pub fn resolve_config(user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    let Some(yaml) = user_yaml.filter(|y| !y.trim().is_empty()) else {
        return Ok(VizConfig::default());
    };
    let user: Value =
        serde_yaml_ng::from_str(yaml).map_err(|e| crate::RenderError::Config(e.to_string()))?;
    let user = match user {
        Value::Null => return Ok(VizConfig::default()),
        v @ Value::Mapping(_) => v,
        _ => return Err(crate::RenderError::Config("viz config must be a mapping".into())),
    };

    let theme = match user.get("theme") {
        None => BuiltinTheme::Default,
        Some(Value::String(s)) => BuiltinTheme::parse(s)
            .ok_or_else(|| crate::RenderError::Config(format!("unknown theme: {s}")))?,
        Some(other) => {
            return Err(crate::RenderError::Config(format!("theme must be a string, got {other:?}")));
        }
    };

    let mut base = serde_yaml_ng::to_value(theme.base_config())
        .map_err(|e| crate::RenderError::Config(e.to_string()))?;
    merge(&mut base, user);
    serde_yaml_ng::from_value(base).map_err(|e| crate::RenderError::Config(e.to_string()))
}

/// Deep-merge `over` into `base`; mappings merge key-wise, everything else replaces.
fn merge(base: &mut Value, over: Value) {
    match (base, over) {
        (Value::Mapping(b), Value::Mapping(o)) => {
            for (k, v) in o {
                match b.get_mut(&k) {
                    Some(slot) => merge(slot, v),
                    None => {
                        b.insert(k, v);
                    }
                }
            }
        }
        (slot, v) => *slot = v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_yaml_gives_default_theme() {
        let cfg = resolve_config(None).unwrap();
        assert_eq!(cfg.theme, "default");
        assert_eq!(cfg.colors.sequential, Colormap::Afmhot);
        assert_eq!(cfg.colors.diverging, Colormap::Seismic);
        assert_eq!(cfg.output.format, "pdf");
    }

    #[test]
    fn partial_override_keeps_theme_values() {
        let cfg = resolve_config(Some("theme: print\nfont:\n  tick_size: 6.5\n")).unwrap();
        let print = BuiltinTheme::Print.base_config();
        assert_eq!(cfg.theme, "print");
        assert_eq!(cfg.font.tick_size, 6.5);
        assert_eq!(cfg.font.label_size, print.font.label_size);
        assert_eq!(cfg.figure.width, print.figure.width);
    }

    #[test]
    fn colors_parse_from_yaml() {
        let cfg = resolve_config(Some(
            "colors:\n  diverging: rd_bu_r\n  background: '#eeeeee'\n",
        ))
        .unwrap();
        assert_eq!(cfg.colors.diverging, Colormap::RdBuR);
        assert_eq!(cfg.colors.background, Color::rgb(0xee, 0xee, 0xee));
        assert_eq!(cfg.colors.sequential, Colormap::Afmhot);
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(resolve_config(Some("theme: neon\n")).is_err());
    }

    #[test]
    fn non_mapping_is_rejected() {
        assert!(resolve_config(Some("- 1\n- 2\n")).is_err());
    }

    #[test]
    fn empty_yaml_is_default() {
        let cfg = resolve_config(Some("")).unwrap();
        assert_eq!(cfg.theme, "default");
    }
}
