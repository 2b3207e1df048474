//! Binned maps (histograms) over a [`MultiDimBinning`].

use serde::Serialize;

use crate::binning::{BinSelector, MultiDimBinning};
use crate::{Error, Result};

/// A named, multi-dimensional histogram.
///
/// `hist` is stored row-major against `binning`; its length always equals
/// `binning.size()`. The same holds for `error_hist` when present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Map {
    name: String,
    binning: MultiDimBinning,
    hist: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_hist: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tex: Option<String>,
}

impl Map {
    pub fn new(name: impl Into<String>, binning: MultiDimBinning, hist: Vec<f64>) -> Result<Self> {
        let name = name.into();
        check_len(&name, "hist", hist.len(), &binning)?;
        Ok(Self { name, binning, hist, error_hist: None, tex: None })
    }

    /// Attach per-bin uncertainties.
    pub fn with_errors(mut self, errors: Vec<f64>) -> Result<Self> {
        self.set_errors(Some(errors))?;
        Ok(self)
    }

    pub fn with_tex(mut self, tex: impl Into<String>) -> Self {
        self.tex = Some(tex.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tex(&self) -> Option<&str> {
        self.tex.as_deref()
    }

    pub fn binning(&self) -> &MultiDimBinning {
        &self.binning
    }

    pub fn hist(&self) -> &[f64] {
        &self.hist
    }

    pub fn error_hist(&self) -> Option<&[f64]> {
        self.error_hist.as_deref()
    }

    /// Replace (or clear, with `None`) the stored uncertainties.
    pub fn set_errors(&mut self, errors: Option<Vec<f64>>) -> Result<()> {
        if let Some(e) = &errors {
            check_len(&self.name, "error_hist", e.len(), &self.binning)?;
        }
        self.error_hist = errors;
        Ok(())
    }

    pub fn clear_errors(&mut self) {
        self.error_hist = None;
    }

    /// Same contents under a different name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Maximum bin content ignoring NaN. `None` if every bin is NaN.
    pub fn nanmax(&self) -> Option<f64> {
        self.hist.iter().copied().filter(|v| !v.is_nan()).reduce(f64::max)
    }

    /// Select a single bin of dimension `dim`, dropping that dimension.
    pub fn split(&self, dim: &str, bin: &BinSelector) -> Result<Map> {
        let d = self
            .binning
            .index_of(dim)
            .ok_or_else(|| Error::Validation(format!("map '{}' has no dimension '{dim}'", self.name)))?;
        let k = self.binning.dimensions()[d].bin_index(bin)?;
        let binning = self.binning.without(dim)?;

        let stride = self.binning.strides()[d];
        let extent = self.binning.shape()[d];
        let select = |values: &[f64]| -> Vec<f64> {
            values
                .iter()
                .enumerate()
                .filter(|(i, _)| (i / stride) % extent == k)
                .map(|(_, v)| *v)
                .collect()
        };

        Ok(Map {
            name: self.name.clone(),
            hist: select(&self.hist),
            error_hist: self.error_hist.as_deref().map(select),
            binning,
            tex: self.tex.clone(),
        })
    }

    /// Elementwise sum with another map over the identical binning.
    ///
    /// Uncertainties add in quadrature when both maps carry them; otherwise
    /// the result has none.
    pub fn checked_add(&self, other: &Map) -> Result<Map> {
        if self.binning != other.binning {
            return Err(Error::BinMismatch(format!(
                "cannot add map '{}' to map '{}': binnings differ",
                other.name, self.name
            )));
        }
        let hist = self.hist.iter().zip(&other.hist).map(|(a, b)| a + b).collect();
        let error_hist = match (&self.error_hist, &other.error_hist) {
            (Some(a), Some(b)) => Some(a.iter().zip(b).map(|(x, y)| x.hypot(*y)).collect()),
            _ => None,
        };
        Ok(Map { name: self.name.clone(), binning: self.binning.clone(), hist, error_hist, tex: None })
    }
}

fn check_len(name: &str, what: &str, len: usize, binning: &MultiDimBinning) -> Result<()> {
    if len != binning.size() {
        return Err(Error::Validation(format!(
            "map '{name}': {what} has {len} entries but binning {:?} has {} bins",
            binning.shape(),
            binning.size()
        )));
    }
    Ok(())
}
