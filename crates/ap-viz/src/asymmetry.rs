//! Pointwise comparison statistics between two hypotheses.

use std::fmt;
use std::str::FromStr;

use ap_core::{Error, Map, Result};
use serde::{Deserialize, Serialize};

/// Which statistic to derive from the hypothesis maps `h0` and `h1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsymmetryKind {
    /// `(h1 - h0) / sqrt(h0)`
    #[default]
    Asymmetry,
    /// `h1 - h0`
    Difference,
    /// `(h1 - h0) / h0`
    Fraction,
    /// `(h1 - h0) / h0 * 100`
    Percentage,
}

impl AsymmetryKind {
    /// Every supported kind, in documentation order.
    pub const ALL: [AsymmetryKind; 4] = [
        AsymmetryKind::Asymmetry,
        AsymmetryKind::Difference,
        AsymmetryKind::Fraction,
        AsymmetryKind::Percentage,
    ];

    /// Lower-case name used on the command line and in file names.
    pub fn as_str(self) -> &'static str {
        match self {
            AsymmetryKind::Asymmetry => "asymmetry",
            AsymmetryKind::Difference => "difference",
            AsymmetryKind::Fraction => "fraction",
            AsymmetryKind::Percentage => "percentage",
        }
    }

    /// Colorbar label for the derived panel.
    pub fn label(self, h0_name: &str, h1_name: &str) -> String {
        let diff = format!("N_{h1_name} \u{2212} N_{h0_name}");
        match self {
            AsymmetryKind::Asymmetry => format!("({diff}) / \u{221A}N_{h0_name}"),
            AsymmetryKind::Difference => diff,
            AsymmetryKind::Fraction => format!("({diff}) / N_{h0_name}"),
            AsymmetryKind::Percentage => format!("({diff}) / N_{h0_name} [%]"),
        }
    }

    /// Apply the statistic to a single bin.
    #[inline]
    pub fn apply(self, a0: f64, a1: f64) -> f64 {
        let d = a1 - a0;
        match self {
            AsymmetryKind::Asymmetry => d / a0.sqrt(),
            AsymmetryKind::Difference => d,
            AsymmetryKind::Fraction => d / a0,
            AsymmetryKind::Percentage => d / a0 * 100.0,
        }
    }
}

impl fmt::Display for AsymmetryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AsymmetryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        AsymmetryKind::ALL.into_iter().find(|k| k.as_str() == wanted).ok_or_else(|| {
            Error::Configuration(format!(
                "unknown asymmetry type '{s}'; choose one of asymmetry, difference, fraction, percentage"
            ))
        })
    }
}

/// Elementwise statistic over two equally sized bin arrays.
///
/// Empty or negative `a0` bins yield NaN or ±inf rather than an error.
pub fn compute(a0: &[f64], a1: &[f64], kind: AsymmetryKind) -> Result<Vec<f64>> {
    if a0.len() != a1.len() {
        return Err(Error::Validation(format!(
            "cannot compare arrays of length {} and {}",
            a0.len(),
            a1.len()
        )));
    }
    Ok(a0.iter().zip(a1).map(|(&x0, &x1)| kind.apply(x0, x1)).collect())
}

/// Derived map named after `kind`, on the binning of `h0`.
pub fn asymmetry_map(h0: &Map, h1: &Map, kind: AsymmetryKind) -> Result<Map> {
    if h0.binning() != h1.binning() {
        return Err(Error::BinMismatch(format!(
            "maps '{}' and '{}' do not share a binning",
            h0.name(),
            h1.name()
        )));
    }
    let values = compute(h0.hist(), h1.hist(), kind)?;
    Map::new(kind.as_str(), h0.binning().clone(), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_core::{MultiDimBinning, OneDimBinning};
    use approx::assert_abs_diff_eq;

    const A0: [f64; 4] = [4.0, 9.0, 16.0, 2.5];
    const A1: [f64; 4] = [9.0, 16.0, 25.0, 1.0];

    #[test]
    fn every_kind_keeps_shape() {
        for kind in AsymmetryKind::ALL {
            assert_eq!(compute(&A0, &A1, kind).unwrap().len(), A0.len(), "{kind}");
        }
    }

    #[test]
    fn difference_is_exact() {
        let d = compute(&A0, &A1, AsymmetryKind::Difference).unwrap();
        for i in 0..A0.len() {
            assert_eq!(d[i], A1[i] - A0[i]);
        }
    }

    #[test]
    fn percentage_is_hundred_times_fraction() {
        let f = compute(&A0, &A1, AsymmetryKind::Fraction).unwrap();
        let p = compute(&A0, &A1, AsymmetryKind::Percentage).unwrap();
        for i in 0..A0.len() {
            assert_eq!(p[i], 100.0 * f[i]);
        }
    }

    #[test]
    fn asymmetry_values() {
        let a = compute(&[4.0, 9.0, 16.0], &[9.0, 16.0, 25.0], AsymmetryKind::Asymmetry).unwrap();
        assert_abs_diff_eq!(a[0], 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(a[1], 7.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a[2], 2.25, epsilon = 1e-12);
    }

    #[test]
    fn zero_reference_bin_is_non_finite() {
        let a0 = [0.0, 1.0];
        let a1 = [3.0, 1.0];
        for kind in [AsymmetryKind::Asymmetry, AsymmetryKind::Fraction, AsymmetryKind::Percentage] {
            let v = compute(&a0, &a1, kind).unwrap();
            assert!(!v[0].is_finite(), "{kind}: {}", v[0]);
            assert!(v[1].is_finite());
        }
        let empty = compute(&[0.0], &[0.0], AsymmetryKind::Fraction).unwrap();
        assert!(empty[0].is_nan());
        let negative = compute(&[-4.0], &[1.0], AsymmetryKind::Asymmetry).unwrap();
        assert!(negative[0].is_nan());
    }

    #[test]
    fn length_mismatch_is_an_error() {
        assert!(matches!(
            compute(&[1.0, 2.0], &[1.0], AsymmetryKind::Difference),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn parse_kinds() {
        assert_eq!("asymmetry".parse::<AsymmetryKind>().unwrap(), AsymmetryKind::Asymmetry);
        assert_eq!(" Percentage ".parse::<AsymmetryKind>().unwrap(), AsymmetryKind::Percentage);
        assert!(matches!("ratio".parse::<AsymmetryKind>(), Err(Error::Configuration(_))));
        assert_eq!(AsymmetryKind::default(), AsymmetryKind::Asymmetry);
    }

    #[test]
    fn derived_map_carries_binning() {
        let b = MultiDimBinning::from(OneDimBinning::new("x", vec![0.0, 1.0, 2.0, 3.0]).unwrap());
        let h0 = Map::new("total", b.clone(), vec![4.0, 9.0, 16.0]).unwrap();
        let h1 = Map::new("total", b.clone(), vec![9.0, 16.0, 25.0]).unwrap();
        let m = asymmetry_map(&h0, &h1, AsymmetryKind::Difference).unwrap();
        assert_eq!(m.name(), "difference");
        assert_eq!(m.binning(), &b);
        assert_eq!(m.hist(), &[5.0, 7.0, 9.0]);
    }

    #[test]
    fn derived_map_needs_matching_binning() {
        let b1 = MultiDimBinning::from(OneDimBinning::new("x", vec![0.0, 1.0]).unwrap());
        let b2 = MultiDimBinning::from(OneDimBinning::new("x", vec![0.0, 2.0]).unwrap());
        let h0 = Map::new("m", b1, vec![1.0]).unwrap();
        let h1 = Map::new("m", b2, vec![1.0]).unwrap();
        assert!(matches!(asymmetry_map(&h0, &h1, AsymmetryKind::Asymmetry), Err(Error::BinMismatch(_))));
    }

    #[test]
    fn labels_mention_both_hypotheses() {
        let l = AsymmetryKind::Asymmetry.label("NO", "IO");
        assert!(l.contains("N_IO"));
        assert!(l.contains("N_NO"));
    }
}
