//! Binning descriptors for multi-dimensional maps.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single named binning dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneDimBinning {
    /// Dimension name (e.g. `reco_energy`, `pid`)
    pub name: String,

    /// Bin edges, strictly increasing (`num_bins + 1` values)
    pub bin_edges: Vec<f64>,

    /// Optional symbolic label per bin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_names: Option<Vec<String>>,

    /// Whether the dimension is logarithmically spaced
    #[serde(default)]
    pub is_log: bool,

    /// Optional display label for axes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tex: Option<String>,
}

impl OneDimBinning {
    /// Create a linear dimension from explicit edges.
    pub fn new(name: impl Into<String>, bin_edges: Vec<f64>) -> Result<Self> {
        let b = Self { name: name.into(), bin_edges, bin_names: None, is_log: false, tex: None };
        b.validate()?;
        Ok(b)
    }

    /// Attach symbolic bin names (one per bin).
    pub fn with_bin_names<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        self.bin_names = Some(names.into_iter().map(Into::into).collect());
        self.validate()?;
        Ok(self)
    }

    /// Mark the dimension as log-spaced.
    pub fn with_log(mut self, is_log: bool) -> Result<Self> {
        self.is_log = is_log;
        self.validate()?;
        Ok(self)
    }

    pub fn num_bins(&self) -> usize {
        self.bin_edges.len().saturating_sub(1)
    }

    /// Axis label: the display label if set, otherwise the name.
    pub fn label(&self) -> &str {
        self.tex.as_deref().unwrap_or(&self.name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("binning dimension name must be non-empty".into()));
        }
        if self.bin_edges.len() < 2 {
            return Err(Error::Validation(format!(
                "dimension '{}' needs at least 2 bin edges, got {}",
                self.name,
                self.bin_edges.len()
            )));
        }
        if self.bin_edges.iter().any(|e| !e.is_finite()) {
            return Err(Error::Validation(format!(
                "dimension '{}' has non-finite bin edges",
                self.name
            )));
        }
        if self.bin_edges.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::Validation(format!(
                "dimension '{}' bin edges must be strictly increasing",
                self.name
            )));
        }
        if self.is_log && self.bin_edges[0] <= 0.0 {
            return Err(Error::Validation(format!(
                "log dimension '{}' must have positive bin edges",
                self.name
            )));
        }
        if let Some(names) = &self.bin_names
            && names.len() != self.num_bins()
        {
            return Err(Error::Validation(format!(
                "dimension '{}' has {} bins but {} bin names",
                self.name,
                self.num_bins(),
                names.len()
            )));
        }
        if let Some(names) = &self.bin_names
            && let Some((i, dup)) =
                names.iter().enumerate().find(|&(i, n)| names[..i].contains(n))
        {
            return Err(Error::Validation(format!(
                "dimension '{}' repeats bin name '{dup}' (bin {i})",
                self.name
            )));
        }
        Ok(())
    }

    /// Resolve a bin selector to a bin index.
    pub fn bin_index(&self, bin: &BinSelector) -> Result<usize> {
        match bin {
            BinSelector::Index(i) => {
                if *i < self.num_bins() {
                    Ok(*i)
                } else {
                    Err(Error::Validation(format!(
                        "bin index {i} out of range for dimension '{}' ({} bins)",
                        self.name,
                        self.num_bins()
                    )))
                }
            }
            BinSelector::Name(n) => {
                let names = self.bin_names.as_ref().ok_or_else(|| {
                    Error::Validation(format!(
                        "dimension '{}' has no bin names; cannot select bin '{n}'",
                        self.name
                    ))
                })?;
                names.iter().position(|x| x == n).ok_or_else(|| {
                    Error::Validation(format!("no bin named '{n}' in dimension '{}'", self.name))
                })
            }
        }
    }
}

/// Selects one bin of a dimension either by its symbolic name or its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinSelector {
    Name(String),
    Index(usize),
}

impl fmt::Display for BinSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinSelector::Name(n) => write!(f, "{n}"),
            BinSelector::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Ordered collection of uniquely named dimensions.
///
/// Map contents are stored row-major against this binning: the last
/// dimension varies fastest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiDimBinning {
    dimensions: Vec<OneDimBinning>,
}

impl MultiDimBinning {
    pub fn new(dimensions: Vec<OneDimBinning>) -> Result<Self> {
        let b = Self { dimensions };
        b.validate()?;
        Ok(b)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dimensions.is_empty() {
            return Err(Error::Validation("binning needs at least one dimension".into()));
        }
        for (i, d) in self.dimensions.iter().enumerate() {
            d.validate()?;
            if self.dimensions[..i].iter().any(|o| o.name == d.name) {
                return Err(Error::Validation(format!("duplicate dimension name '{}'", d.name)));
            }
        }
        Ok(())
    }

    pub fn dimensions(&self) -> &[OneDimBinning] {
        &self.dimensions
    }

    pub fn names(&self) -> Vec<&str> {
        self.dimensions.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.dimensions.iter().map(OneDimBinning::num_bins).collect()
    }

    /// Total number of bins (product of per-dimension bin counts).
    pub fn size(&self) -> usize {
        self.dimensions.iter().map(OneDimBinning::num_bins).product()
    }

    pub fn num_dims(&self) -> usize {
        self.dimensions.len()
    }

    pub fn get(&self, name: &str) -> Option<&OneDimBinning> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Binning with one dimension removed. Removing the last remaining
    /// dimension is an error.
    pub fn without(&self, name: &str) -> Result<Self> {
        let idx = self
            .index_of(name)
            .ok_or_else(|| Error::Validation(format!("binning has no dimension '{name}'")))?;
        let mut dimensions = self.dimensions.clone();
        dimensions.remove(idx);
        Self::new(dimensions)
    }

    /// Row-major strides for each dimension.
    pub fn strides(&self) -> Vec<usize> {
        let shape = self.shape();
        let mut strides = vec![1usize; shape.len()];
        for i in (0..shape.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * shape[i + 1];
        }
        strides
    }
}

impl From<OneDimBinning> for MultiDimBinning {
    fn from(d: OneDimBinning) -> Self {
        Self { dimensions: vec![d] }
    }
}
