//! SVG/PDF/PNG rendering of asymplot comparison artifacts.
//!
//! Drawing goes through an immediate-mode SVG [`canvas::Canvas`]; PDF and PNG
//! are conversions of that SVG.

pub mod canvas;
pub mod color;
pub mod config;
pub mod header;
pub mod layout;
pub mod output;
pub mod plots;
pub mod primitives;
pub mod text;
pub mod theme;

use std::path::Path;

use ap_viz::AsymmetryArtifact;
use config::VizConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported output format: {0}")]
    UnknownFormat(String),
    #[error("deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    Png(String),
    #[cfg(feature = "pdf")]
    #[error("PDF conversion error: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Output formats compiled into this build.
pub fn supported_formats() -> Vec<&'static str> {
    let mut formats = vec!["svg"];
    if cfg!(feature = "pdf") {
        formats.push("pdf");
    }
    if cfg!(feature = "png") {
        formats.push("png");
    }
    formats
}

/// Render an artifact to an SVG string.
pub fn render_svg(artifact: &AsymmetryArtifact, config: &VizConfig) -> Result<String> {
    plots::comparison::render(artifact, config)
}

/// Render an artifact given as JSON to an SVG string.
pub fn render_svg_json(artifact_json: &str, config: &VizConfig) -> Result<String> {
    let artifact: AsymmetryArtifact = serde_json::from_str(artifact_json)?;
    render_svg(&artifact, config)
}

/// Render an artifact to bytes in the specified format.
pub fn render_to_bytes(
    artifact: &AsymmetryArtifact,
    format: &str,
    config: &VizConfig,
) -> Result<Vec<u8>> {
    let format = format.to_ascii_lowercase();
    if !supported_formats().contains(&format.as_str()) {
        return Err(RenderError::UnknownFormat(format));
    }
    let svg = render_svg(artifact, config)?;
    match format.as_str() {
        #[cfg(feature = "png")]
        "png" => output::png::svg_to_png(&svg, config.output.dpi),
        #[cfg(feature = "pdf")]
        "pdf" => output::pdf::svg_to_pdf(&svg),
        _ => Ok(svg.into_bytes()),
    }
}

/// Render an artifact to a file (format inferred from extension, falling
/// back to `config.output.format`).
pub fn render_to_file(artifact: &AsymmetryArtifact, path: &Path, config: &VizConfig) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or(&config.output.format);
    let bytes = render_to_bytes(artifact, ext, config)?;
    std::fs::write(path, &bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote figure");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_core::{Map, MapSet, MultiDimBinning, OneDimBinning};
    use ap_viz::{AsymmetryKind, ReconcileOptions, asymmetry_artifact, asymmetry_map, reconcile};

    fn artifact() -> AsymmetryArtifact {
        let b = MultiDimBinning::new(vec![
            OneDimBinning::new("reco_energy", vec![5.0, 10.0, 20.0]).unwrap().with_log(true).unwrap(),
            OneDimBinning::new("reco_coszen", vec![-1.0, 0.0, 1.0]).unwrap(),
        ])
        .unwrap();
        let s0 = MapSet::new("h0", vec![Map::new("total", b.clone(), vec![4.0, 9.0, 16.0, 1.0]).unwrap()])
            .unwrap();
        let s1 = MapSet::new("h1", vec![Map::new("total", b, vec![9.0, 16.0, 25.0, 0.0]).unwrap()])
            .unwrap();
        let opts = ReconcileOptions { detector: Some("DeepCore".into()), ..Default::default() };
        let pair = reconcile(&s0, &s1, &opts).unwrap().pairs.remove(0);
        let derived = asymmetry_map(&pair.h0, &pair.h1, AsymmetryKind::Asymmetry).unwrap();
        asymmetry_artifact(&pair, &derived, "NO", "IO", AsymmetryKind::Asymmetry, &[]).unwrap()
    }

    #[test]
    fn three_panels_and_suptitle() {
        let art = artifact();
        let svg = render_svg(&art, &VizConfig::default()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Hypothesis 0: NO"));
        assert!(svg.contains("Hypothesis 1: IO"));
        assert!(svg.contains(">asymmetry</text>"));
        assert!(svg.contains(&art.title));
        assert_eq!(svg.matches("<clipPath").count(), 3);
    }

    #[test]
    fn json_round_trip_renders_same_panels() {
        let art = artifact();
        let json = serde_json::to_string(&art).unwrap();
        let svg = render_svg_json(&json, &VizConfig::default()).unwrap();
        assert_eq!(svg, render_svg(&art, &VizConfig::default()).unwrap());
    }

    #[test]
    fn bad_json_is_a_deserialize_error() {
        assert!(matches!(
            render_svg_json("{\"schema_version\": 1}", &VizConfig::default()),
            Err(RenderError::Deserialize(_))
        ));
    }

    #[test]
    fn unknown_format() {
        let err = render_to_bytes(&artifact(), "bmp", &VizConfig::default()).unwrap_err();
        assert!(matches!(err, RenderError::UnknownFormat(f) if f == "bmp"));
    }

    #[test]
    fn svg_bytes_and_file() {
        let art = artifact();
        let bytes = render_to_bytes(&art, "SVG", &VizConfig::default()).unwrap();
        assert!(bytes.starts_with(b"<svg"));

        let dir = std::env::temp_dir().join(format!("ap_viz_render_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("figure.svg");
        render_to_file(&art, &path, &VizConfig::default()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn pdf_output() {
        let bytes = render_to_bytes(&artifact(), "pdf", &VizConfig::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn svg_is_always_supported() {
        assert!(supported_formats().contains(&"svg"));
    }
}
