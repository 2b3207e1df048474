//! Plot-friendly comparison artifacts (numbers-first).
//!
//! One [`AsymmetryArtifact`] describes the three panels of a comparison
//! figure: hypothesis 0, hypothesis 1 and the derived statistic. Values are
//! flat row-major arrays; non-finite bins are written as `null`.

use std::time::{SystemTime, UNIX_EPOCH};

use ap_core::{Error, Map, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::asymmetry::AsymmetryKind;
use crate::reconcile::ComparisonPair;

pub const SCHEMA_VERSION: &str = "asymplot_asymmetry_v0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsymmetryArtifact {
    pub schema_version: String,
    pub meta: ArtifactMeta,
    pub h0_name: String,
    pub h1_name: String,
    pub kind: AsymmetryKind,
    /// Figure-wide title
    pub title: String,
    pub file_stem: String,
    pub h0: MapPanel,
    pub h1: MapPanel,
    pub derived: MapPanel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMeta {
    pub tool: String,
    pub tool_version: String,
    pub created_unix_ms: u128,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_sha256: Vec<String>,
}

/// Colormap family requested for a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelScale {
    /// Sequential scale from 0 (afmhot)
    Sequential,
    /// Diverging scale symmetric about 0 (seismic)
    Diverging,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelAxis {
    pub name: String,
    pub label: String,
    pub bin_edges: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_names: Option<Vec<String>>,
    #[serde(default)]
    pub is_log: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapPanel {
    pub title: String,
    pub colorbar_label: String,
    pub scale: PanelScale,
    pub axes: Vec<PanelAxis>,
    pub values: Vec<Option<f64>>,
    pub vmin: f64,
    pub vmax: f64,
}

impl MapPanel {
    fn from_map(map: &Map, title: String, colorbar_label: String, scale: PanelScale, limits: (f64, f64)) -> Self {
        let axes = map
            .binning()
            .dimensions()
            .iter()
            .map(|d| PanelAxis {
                name: d.name.clone(),
                label: d.label().to_string(),
                bin_edges: d.bin_edges.clone(),
                bin_names: d.bin_names.clone(),
                is_log: d.is_log,
            })
            .collect();
        let values = map.hist().iter().map(|v| v.is_finite().then_some(*v)).collect();
        Self { title, colorbar_label, scale, axes, values, vmin: limits.0, vmax: limits.1 }
    }

    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(|a| a.bin_edges.len().saturating_sub(1)).collect()
    }
}

fn now_unix_ms() -> Result<u128> {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::Validation(format!("system time error: {}", e)))?;
    Ok(d.as_millis())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Build the three-panel artifact for one reconciled pair.
///
/// The hypothesis panels share `[0, vmax]` with `vmax` the larger of the two
/// maps' NaN-ignoring maxima; the derived panel is symmetric about zero and
/// spans its largest finite magnitude.
pub fn asymmetry_artifact(
    pair: &ComparisonPair,
    derived: &Map,
    h0_name: &str,
    h1_name: &str,
    kind: AsymmetryKind,
    input_sha256: &[String],
) -> Result<AsymmetryArtifact> {
    if derived.binning() != pair.h0.binning() {
        return Err(Error::BinMismatch(format!(
            "derived map '{}' does not share the binning of '{}'",
            derived.name(),
            pair.output
        )));
    }

    let vmax = [pair.h0.nanmax(), pair.h1.nanmax()]
        .into_iter()
        .flatten()
        .reduce(f64::max)
        .filter(|v| v.is_finite())
        .unwrap_or(1.0);
    let limit = derived
        .hist()
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| v.abs())
        .reduce(f64::max)
        .filter(|v| *v > 0.0)
        .unwrap_or(1.0);

    let counts = |name: &str| format!("N_{name}");
    Ok(AsymmetryArtifact {
        schema_version: SCHEMA_VERSION.to_string(),
        meta: ArtifactMeta {
            tool: "asymplot".to_string(),
            tool_version: ap_core::VERSION.to_string(),
            created_unix_ms: now_unix_ms()?,
            input_sha256: input_sha256.to_vec(),
        },
        h0_name: h0_name.to_string(),
        h1_name: h1_name.to_string(),
        kind,
        title: pair.title.clone(),
        file_stem: pair.file_stem.clone(),
        h0: MapPanel::from_map(
            &pair.h0,
            format!("Hypothesis 0: {h0_name}"),
            counts(h0_name),
            PanelScale::Sequential,
            (0.0, vmax),
        ),
        h1: MapPanel::from_map(
            &pair.h1,
            format!("Hypothesis 1: {h1_name}"),
            counts(h1_name),
            PanelScale::Sequential,
            (0.0, vmax),
        ),
        derived: MapPanel::from_map(
            derived,
            kind.as_str().to_string(),
            kind.label(h0_name, h1_name),
            PanelScale::Diverging,
            (-limit, limit),
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asymmetry::asymmetry_map;
    use crate::reconcile::{ReconcileOptions, reconcile};
    use ap_core::{MapSet, MultiDimBinning, OneDimBinning};

    fn pair(h0: Vec<f64>, h1: Vec<f64>) -> ComparisonPair {
        let b = MultiDimBinning::from(
            OneDimBinning::new("reco_energy", vec![1.0, 2.0, 4.0, 8.0]).unwrap().with_log(true).unwrap(),
        );
        let s0 = MapSet::new("h0", vec![Map::new("total", b.clone(), h0).unwrap()]).unwrap();
        let s1 = MapSet::new("h1", vec![Map::new("total", b, h1).unwrap()]).unwrap();
        reconcile(&s0, &s1, &ReconcileOptions::default()).unwrap().pairs.remove(0)
    }

    #[test]
    fn panels_share_hypothesis_scale() {
        let p = pair(vec![4.0, 9.0, 16.0], vec![9.0, 16.0, 25.0]);
        let d = asymmetry_map(&p.h0, &p.h1, AsymmetryKind::Asymmetry).unwrap();
        let art = asymmetry_artifact(&p, &d, "NO", "IO", AsymmetryKind::Asymmetry, &[]).unwrap();

        assert_eq!(art.schema_version, SCHEMA_VERSION);
        assert_eq!(art.h0.vmax, 25.0);
        assert_eq!(art.h1.vmax, 25.0);
        assert_eq!(art.derived.vmax, 2.5);
        assert_eq!(art.derived.vmin, -2.5);
        assert_eq!(art.h0.title, "Hypothesis 0: NO");
        assert_eq!(art.derived.scale, PanelScale::Diverging);
        assert_eq!(art.h0.shape(), vec![3]);
        assert!(art.h0.axes[0].is_log);
    }

    #[test]
    fn hypothesis_scale_skips_nan_bins() {
        let p = pair(vec![f64::NAN, 9.0, 16.0], vec![9.0, f64::NAN, 12.0]);
        let d = asymmetry_map(&p.h0, &p.h1, AsymmetryKind::Difference).unwrap();
        let art = asymmetry_artifact(&p, &d, "NO", "IO", AsymmetryKind::Difference, &[]).unwrap();
        assert_eq!(art.h0.vmax, 16.0);
        assert_eq!(art.h1.vmax, 16.0);
        assert_eq!(art.derived.vmax, 4.0);

        let empty = pair(vec![f64::NAN; 3], vec![f64::NAN; 3]);
        let d = asymmetry_map(&empty.h0, &empty.h1, AsymmetryKind::Difference).unwrap();
        let art = asymmetry_artifact(&empty, &d, "NO", "IO", AsymmetryKind::Difference, &[]).unwrap();
        assert_eq!(art.h0.vmax, 1.0);
        assert_eq!(art.derived.vmax, 1.0);
    }

    #[test]
    fn non_finite_values_become_null() {
        let p = pair(vec![0.0, 9.0, 16.0], vec![1.0, 16.0, 25.0]);
        let d = asymmetry_map(&p.h0, &p.h1, AsymmetryKind::Fraction).unwrap();
        let art = asymmetry_artifact(&p, &d, "NO", "IO", AsymmetryKind::Fraction, &[]).unwrap();
        assert_eq!(art.derived.values[0], None);

        let json = serde_json::to_string(&art).unwrap();
        let back: AsymmetryArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(back.derived.values[0], None);
        assert_eq!(back.kind, AsymmetryKind::Fraction);
    }

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
