//! Pairing of two hypotheses' map sets into comparable histograms.
//!
//! PID shows up in one of two shapes: as a separate stage (outputs named
//! like `numu_cc_trck`, `nue_cc_cscd`) or as a `pid` binning dimension
//! inside every output. [`reconcile`] detects which, and decomposes or
//! aggregates the maps so that each [`ComparisonPair`] holds exactly one
//! h0 map and one h1 map over the same binning.

use std::collections::BTreeSet;
use std::fmt;

use ap_core::{BinSelector, Category, CategoryPatterns, Error, Map, MapSet, Result};
use serde::Serialize;

use crate::labels::{LabelContext, output_file_name, sanitize};

/// Name of the PID binning dimension.
pub const PID_DIM: &str = "pid";

/// How PID is realised in the compared outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PidMode {
    /// PID produced separately named track / cascade outputs.
    SeparateStage,
    /// Every output carries a `pid` binning dimension.
    BinningDimension,
    /// No PID information; outputs are compared as-is.
    None,
}

impl fmt::Display for PidMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PidMode::SeparateStage => "separate stage",
            PidMode::BinningDimension => "binning dimension",
            PidMode::None => "none",
        };
        f.write_str(s)
    }
}

/// One bin of the PID dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PidLabel {
    Named(String),
    /// Fallback when the dimension carries no bin names.
    Index(usize),
}

impl PidLabel {
    pub fn selector(&self) -> BinSelector {
        match self {
            PidLabel::Named(n) => BinSelector::Name(n.clone()),
            PidLabel::Index(i) => BinSelector::Index(*i),
        }
    }
}

impl fmt::Display for PidLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PidLabel::Named(n) => f.write_str(n),
            PidLabel::Index(i) => write!(f, "PID Bin {i}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// The maps are summed totals (no per-output comparison requested).
    pub return_total: bool,
    pub detector: Option<String>,
    pub selection: Option<String>,
    pub categories: CategoryPatterns,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self { return_total: true, detector: None, selection: None, categories: CategoryPatterns::default() }
    }
}

/// An h0/h1 map pair ready for statistic computation and rendering.
#[derive(Debug, Clone)]
pub struct ComparisonPair {
    /// Output map name, or the category description in separate-stage mode.
    pub output: String,
    pub category: Category,
    pub pid_label: Option<PidLabel>,
    pub h0: Map,
    pub h1: Map,
    pub title: String,
    pub file_stem: String,
}

impl ComparisonPair {
    pub fn file_name(&self, h0_name: &str, h1_name: &str, kind: &str, ext: &str) -> String {
        output_file_name(&self.file_stem, h0_name, h1_name, kind, ext)
    }
}

#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub mode: PidMode,
    pub pairs: Vec<ComparisonPair>,
    /// Recoverable conditions met on the way (also logged).
    pub warnings: Vec<String>,
}

/// Partition the comparison of `h0` against `h1` into map pairs.
///
/// Fails without partial output when the output names differ, when a summed
/// total is requested although PID is a separate stage, or when PID bin
/// labels disagree.
pub fn reconcile(h0: &MapSet, h1: &MapSet, opts: &ReconcileOptions) -> Result<Reconciliation> {
    let h0_names = h0.sorted_names();
    let h1_names = h1.sorted_names();
    if h0_names != h1_names {
        return Err(Error::MismatchedOutputs { h0: h0_names, h1: h1_names });
    }
    if h0.is_empty() {
        return Err(Error::Configuration("the hypotheses produced no outputs to compare".into()));
    }

    let labels = LabelContext::new(opts.detector.as_deref(), opts.selection.as_deref());
    let mode = detect_mode(h0, &opts.categories);
    tracing::debug!(%mode, outputs = h0.len(), "reconciling map sets");

    let mut warnings = Vec::new();
    let pairs = match mode {
        PidMode::SeparateStage => {
            if opts.return_total {
                return Err(Error::Configuration(
                    "PID is a separate stage but a summed total was requested; \
                     the outputs must be kept separate"
                        .into(),
                ));
            }
            separate_stage_pairs(h0, h1, &opts.categories, &labels)?
        }
        PidMode::BinningDimension => pid_dimension_pairs(h0, h1, &labels, &mut warnings)?,
        PidMode::None => plain_pairs(h0, h1, &labels)?,
    };

    Ok(Reconciliation { mode, pairs, warnings })
}

fn detect_mode(maps: &MapSet, categories: &CategoryPatterns) -> PidMode {
    if maps.iter().any(|m| categories.classify(m.name()) == Category::Track) {
        return PidMode::SeparateStage;
    }
    match maps.iter().next() {
        Some(first) if first.binning().contains(PID_DIM) => PidMode::BinningDimension,
        _ => PidMode::None,
    }
}

fn separate_stage_pairs(
    h0: &MapSet,
    h1: &MapSet,
    categories: &CategoryPatterns,
    labels: &LabelContext,
) -> Result<Vec<ComparisonPair>> {
    [Category::Track, Category::Cascade]
        .into_iter()
        .map(|category| -> Result<ComparisonPair> {
            let patterns = categories.patterns(category);
            let what = category.description();
            Ok(ComparisonPair {
                output: what.to_string(),
                category,
                pid_label: None,
                h0: h0.combine_wildcard(patterns)?.renamed(what),
                h1: h1.combine_wildcard(patterns)?.renamed(what),
                title: labels.title(Some(what)),
                file_stem: format!("{}{}", labels.file_prefix(), category.tag()),
            })
        })
        .collect()
}

fn pid_dimension_pairs(
    h0: &MapSet,
    h1: &MapSet,
    labels: &LabelContext,
    warnings: &mut Vec<String>,
) -> Result<Vec<ComparisonPair>> {
    let mut pairs = Vec::new();
    for name in h0.names() {
        let (m0, m1) = cleared_pair(h0, h1, name)?;
        let bins = pid_labels(&m0, &m1, warnings)?;
        for label in bins {
            let selector = label.selector();
            let shown = label.to_string();
            pairs.push(ComparisonPair {
                output: name.to_string(),
                category: Category::Other,
                h0: m0.split(PID_DIM, &selector)?,
                h1: m1.split(PID_DIM, &selector)?,
                title: labels.title(Some(&shown)),
                file_stem: format!("{name}_{}{}", labels.file_prefix(), sanitize(&shown)),
                pid_label: Some(label),
            });
        }
    }
    Ok(pairs)
}

fn pid_labels(m0: &Map, m1: &Map, warnings: &mut Vec<String>) -> Result<Vec<PidLabel>> {
    let missing = |m: &Map| {
        Error::BinMismatch(format!("map '{}' has no '{PID_DIM}' dimension", m.name()))
    };
    let p0 = m0.binning().get(PID_DIM).ok_or_else(|| missing(m0))?;
    let p1 = m1.binning().get(PID_DIM).ok_or_else(|| missing(m1))?;
    p0.validate()?;
    p1.validate()?;

    let as_set = |names: &Option<Vec<String>>| {
        names.as_ref().map(|n| n.iter().cloned().collect::<BTreeSet<_>>())
    };
    if as_set(&p0.bin_names) != as_set(&p1.bin_names) || p0.num_bins() != p1.num_bins() {
        return Err(Error::BinMismatch(format!(
            "h0 and h1 maps '{}' must have the same PID bin names, got {:?} and {:?}",
            m0.name(),
            p0.bin_names,
            p1.bin_names
        )));
    }

    match &p0.bin_names {
        Some(names) => Ok(names.iter().cloned().map(PidLabel::Named).collect()),
        None => {
            let msg = format!(
                "map '{}': no names are given for the PID bins; they are numbered in titles and file names",
                m0.name()
            );
            tracing::warn!("{msg}");
            warnings.push(msg);
            Ok((0..p0.num_bins()).map(PidLabel::Index).collect())
        }
    }
}

fn plain_pairs(h0: &MapSet, h1: &MapSet, labels: &LabelContext) -> Result<Vec<ComparisonPair>> {
    h0.names()
        .into_iter()
        .map(|name| -> Result<ComparisonPair> {
            let (m0, m1) = cleared_pair(h0, h1, name)?;
            Ok(ComparisonPair {
                output: name.to_string(),
                category: Category::Other,
                pid_label: None,
                h0: m0,
                h1: m1,
                title: labels.title(None),
                file_stem: format!("{name}_{}", labels.file_prefix()),
            })
        })
        .collect()
}

/// Both hypotheses' maps for `name`, with stored errors cleared: the
/// comparison statistics are recomputed, not propagated.
fn cleared_pair(h0: &MapSet, h1: &MapSet, name: &str) -> Result<(Map, Map)> {
    let fetch = |set: &MapSet| {
        set.get(name).cloned().ok_or_else(|| {
            Error::MismatchedOutputs { h0: h0.sorted_names(), h1: h1.sorted_names() }
        })
    };
    let mut m0 = fetch(h0)?;
    let mut m1 = fetch(h1)?;
    m0.clear_errors();
    m1.clear_errors();
    Ok((m0, m1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_core::{MultiDimBinning, OneDimBinning};

    fn energy() -> OneDimBinning {
        OneDimBinning::new("reco_energy", vec![1.0, 10.0, 100.0]).unwrap()
    }

    fn plain(name: &str, hist: Vec<f64>) -> Map {
        Map::new(name, MultiDimBinning::from(energy()), hist).unwrap()
    }

    fn with_pid(name: &str, pid_names: Option<[&str; 2]>, hist: Vec<f64>) -> Map {
        let mut pid = OneDimBinning::new("pid", vec![-3.0, 2.0, 1000.0]).unwrap();
        if let Some(n) = pid_names {
            pid = pid.with_bin_names(n).unwrap();
        }
        let b = MultiDimBinning::new(vec![energy(), pid]).unwrap();
        Map::new(name, b, hist).unwrap().with_errors(vec![1.0; 4]).unwrap()
    }

    fn set(name: &str, maps: Vec<Map>) -> MapSet {
        MapSet::new(name, maps).unwrap()
    }

    fn opts(return_total: bool) -> ReconcileOptions {
        ReconcileOptions { return_total, ..Default::default() }
    }

    #[test]
    fn no_pid_one_pair_per_output() {
        let h0 = set("h0", vec![plain("a", vec![1.0, 2.0]), plain("b", vec![3.0, 4.0])]);
        let h1 = set("h1", vec![plain("b", vec![5.0, 6.0]), plain("a", vec![7.0, 8.0])]);
        let r = reconcile(&h0, &h1, &opts(false)).unwrap();
        assert_eq!(r.mode, PidMode::None);
        assert_eq!(r.pairs.len(), 2);
        assert_eq!(r.pairs[0].output, "a");
        assert_eq!(r.pairs[0].h1.hist(), &[7.0, 8.0]);
        assert_eq!(r.pairs[1].file_stem, "b_");
        assert_eq!(r.pairs[1].title, "events");
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn differing_names_fail() {
        let h0 = set("h0", vec![plain("a", vec![1.0, 2.0]), plain("b", vec![1.0, 2.0])]);
        let h1 = set("h1", vec![plain("a", vec![1.0, 2.0]), plain("c", vec![1.0, 2.0])]);
        match reconcile(&h0, &h1, &opts(false)) {
            Err(Error::MismatchedOutputs { h0, h1 }) => {
                assert_eq!(h0, vec!["a", "b"]);
                assert_eq!(h1, vec!["a", "c"]);
            }
            other => panic!("expected MismatchedOutputs, got {other:?}"),
        }
    }

    #[test]
    fn empty_sets_fail() {
        let r = reconcile(&MapSet::default(), &MapSet::default(), &opts(false));
        assert!(matches!(r, Err(Error::Configuration(_))));
    }

    fn pid_stage_sets() -> (MapSet, MapSet) {
        let h0 = set(
            "h0",
            vec![
                plain("numu_cc_trck", vec![1.0, 2.0]),
                plain("nue_cc_trck", vec![3.0, 4.0]),
                plain("numu_cc_cscd", vec![10.0, 20.0]),
                plain("nue_cc_cscd", vec![30.0, 40.0]),
            ],
        );
        let h1 = set(
            "h1",
            vec![
                plain("nue_cc_cscd", vec![1.0, 1.0]),
                plain("numu_cc_cscd", vec![2.0, 2.0]),
                plain("nue_cc_trck", vec![3.0, 3.0]),
                plain("numu_cc_trck", vec![4.0, 4.0]),
            ],
        );
        (h0, h1)
    }

    #[test]
    fn pid_stage_with_total_is_configuration_error() {
        let (h0, h1) = pid_stage_sets();
        assert!(matches!(reconcile(&h0, &h1, &opts(true)), Err(Error::Configuration(_))));
    }

    #[test]
    fn pid_stage_yields_track_and_cascade() {
        let (h0, h1) = pid_stage_sets();
        let o = ReconcileOptions {
            return_total: false,
            detector: Some("DeepCore".into()),
            ..Default::default()
        };
        let r = reconcile(&h0, &h1, &o).unwrap();
        assert_eq!(r.mode, PidMode::SeparateStage);
        assert_eq!(r.pairs.len(), 2);

        let trck = &r.pairs[0];
        assert_eq!(trck.category, Category::Track);
        assert_eq!(trck.h0.hist(), &[4.0, 6.0]);
        assert_eq!(trck.h1.hist(), &[7.0, 7.0]);
        assert_eq!(trck.title, "DeepCore, events identified as track");
        assert_eq!(trck.file_stem, "DeepCore_trck");

        let cscd = &r.pairs[1];
        assert_eq!(cscd.category, Category::Cascade);
        assert_eq!(cscd.h0.hist(), &[40.0, 60.0]);
        assert_eq!(cscd.h1.hist(), &[3.0, 3.0]);
        assert_eq!(cscd.file_name("NO", "IO", "asymmetry", "pdf"), "DeepCore_cscd_NO_IO_asymmetry.pdf");
    }

    #[test]
    fn pid_dimension_splits_per_bin() {
        let h0 = set("h0", vec![with_pid("total", Some(["cscd", "trck"]), vec![1.0, 2.0, 3.0, 4.0])]);
        let h1 = set("h1", vec![with_pid("total", Some(["cscd", "trck"]), vec![5.0, 6.0, 7.0, 8.0])]);
        let r = reconcile(&h0, &h1, &opts(true)).unwrap();
        assert_eq!(r.mode, PidMode::BinningDimension);
        assert_eq!(r.pairs.len(), 2);

        let cscd = &r.pairs[0];
        assert_eq!(cscd.pid_label, Some(PidLabel::Named("cscd".into())));
        assert_eq!(cscd.h0.hist(), &[1.0, 3.0]);
        assert_eq!(cscd.h1.hist(), &[5.0, 7.0]);
        assert!(cscd.h0.error_hist().is_none());
        assert_eq!(cscd.title, "events identified as cscd");
        assert_eq!(cscd.file_stem, "total_cscd");

        let trck = &r.pairs[1];
        assert_eq!(trck.h0.hist(), &[2.0, 4.0]);
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn pid_dimension_label_mismatch() {
        let h0 = set("h0", vec![with_pid("total", Some(["a", "b"]), vec![1.0; 4])]);
        let h1 = set("h1", vec![with_pid("total", Some(["a", "c"]), vec![1.0; 4])]);
        assert!(matches!(reconcile(&h0, &h1, &opts(false)), Err(Error::BinMismatch(_))));

        let unnamed = set("h1", vec![with_pid("total", None, vec![1.0; 4])]);
        assert!(matches!(reconcile(&h0, &unnamed, &opts(false)), Err(Error::BinMismatch(_))));
    }

    #[test]
    fn repeated_pid_labels_are_rejected() {
        let map = |names: &str, hist: Vec<f64>| {
            let b: MultiDimBinning = serde_json::from_str(&format!(
                r#"[{{"name": "pid", "bin_edges": [0.0, 1.0, 2.0, 3.0], "bin_names": {names}}}]"#
            ))
            .unwrap();
            Map::new("total", b, hist).unwrap()
        };
        let h0 = set("h0", vec![map(r#"["a", "a", "b"]"#, vec![1.0, 2.0, 3.0])]);
        let h1 = set("h1", vec![map(r#"["a", "b", "b"]"#, vec![4.0, 5.0, 6.0])]);
        assert!(matches!(reconcile(&h0, &h1, &opts(false)), Err(Error::Validation(_))));
    }

    #[test]
    fn pid_dimension_label_order_is_irrelevant() {
        let h0 = set("h0", vec![with_pid("total", Some(["a", "b"]), vec![1.0, 2.0, 3.0, 4.0])]);
        let h1 = set("h1", vec![with_pid("total", Some(["b", "a"]), vec![5.0, 6.0, 7.0, 8.0])]);
        let r = reconcile(&h0, &h1, &opts(false)).unwrap();
        assert_eq!(r.pairs[0].pid_label, Some(PidLabel::Named("a".into())));
        assert_eq!(r.pairs[0].h0.hist(), &[1.0, 3.0]);
        assert_eq!(r.pairs[0].h1.hist(), &[6.0, 8.0]);
    }

    #[test]
    fn pid_dimension_without_names_numbers_bins() {
        let h0 = set("h0", vec![with_pid("total", None, vec![1.0, 2.0, 3.0, 4.0])]);
        let h1 = set("h1", vec![with_pid("total", None, vec![1.0, 2.0, 3.0, 4.0])]);
        let r = reconcile(&h0, &h1, &ReconcileOptions { selection: Some("MSU".into()), ..opts(false) })
            .unwrap();
        let shown: Vec<String> =
            r.pairs.iter().map(|p| p.pid_label.as_ref().unwrap().to_string()).collect();
        assert_eq!(shown, vec!["PID Bin 0", "PID Bin 1"]);
        assert_eq!(r.pairs[0].title, "MSU, events identified as PID Bin 0");
        assert_eq!(r.pairs[1].file_stem, "total_MSU_PID_Bin_1");
        assert_eq!(r.warnings.len(), 1);
    }

    #[test]
    fn summed_total_without_pid() {
        let h0 = set("h0", vec![plain("total", vec![4.0, 9.0])]);
        let h1 = set("h1", vec![plain("total", vec![9.0, 16.0])]);
        let r = reconcile(&h0, &h1, &opts(true)).unwrap();
        assert_eq!(r.pairs.len(), 1);
        assert_eq!(r.pairs[0].file_name("NO", "IO", "asymmetry", "pdf"), "total_NO_IO_asymmetry.pdf");
    }
}
