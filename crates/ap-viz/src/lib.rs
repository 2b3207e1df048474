//! # ap-viz
//!
//! Comparison logic and visualization data artifacts for asymplot.
//!
//! This crate pairs the outputs of two hypotheses, derives the comparison
//! statistic and emits plot-friendly structures; drawing lives in
//! `ap-viz-render`.

#![warn(clippy::all)]

/// Three-panel comparison artifacts.
pub mod artifact;

/// Pointwise comparison statistics.
pub mod asymmetry;

/// Plot titles and file names.
pub mod labels;

/// Map-set reconciliation.
pub mod reconcile;

pub use artifact::{AsymmetryArtifact, MapPanel, PanelAxis, PanelScale, asymmetry_artifact};
pub use asymmetry::{AsymmetryKind, asymmetry_map, compute};
pub use reconcile::{ComparisonPair, PidLabel, PidMode, ReconcileOptions, Reconciliation, reconcile};
