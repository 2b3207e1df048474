//! `asymplot` orchestration: load both hypotheses, reconcile their outputs,
//! render one figure per comparison pair and record a run manifest.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use ap_core::{CategoryPatterns, CategoryPatternsConfig, Error};
use ap_viz::artifact::sha256_hex;
use ap_viz::{AsymmetryKind, PidMode, ReconcileOptions, asymmetry_artifact, asymmetry_map, reconcile};
use ap_viz_render::config::{VizConfig, resolve_config};
use serde::Serialize;

use crate::logging::{LogContext, PHYSICS};
use crate::pipeline::DistributionMaker;
use crate::resources::ResourceLocator;

pub const MANIFEST_FILE: &str = "asymplot_manifest.json";

/// One hypothesis as given on the command line.
#[derive(Debug, Clone)]
pub struct HypothesisArgs {
    pub name: String,
    pub pipelines: Vec<String>,
    pub param_selections: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CompareArgs {
    pub logdir: PathBuf,
    pub h0: HypothesisArgs,
    pub h1: HypothesisArgs,
    pub detector: Option<String>,
    pub selection: Option<String>,
    pub kind: AsymmetryKind,
    pub return_bits: bool,
    pub format: String,
    pub viz_config: Option<PathBuf>,
    pub category_patterns: Option<PathBuf>,
    pub allow_dirty: bool,
    pub allow_no_git_info: bool,
}

/// Comma-separated selectors, trimmed and lower-cased; blanks dropped.
pub fn parse_param_selections(list: Option<&str>) -> Vec<String> {
    list.map(|l| {
        l.split(',').map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()).collect()
    })
    .unwrap_or_default()
}

#[derive(Debug, Clone, Serialize)]
pub struct InputRecord {
    pub path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HypothesisRecord {
    pub name: String,
    pub pipelines: Vec<InputRecord>,
    pub param_selections: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputRecord {
    pub file: String,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid_bin: Option<String>,
    pub title: String,
    pub bytes: u64,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvenanceFlags {
    pub allow_dirty: bool,
    pub allow_no_git_info: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub tool: String,
    pub tool_version: String,
    pub created_unix_ms: u128,
    pub h0: HypothesisRecord,
    pub h1: HypothesisRecord,
    pub kind: AsymmetryKind,
    pub pid_mode: PidMode,
    pub return_bits: bool,
    pub format: String,
    pub viz_theme: String,
    pub provenance: ProvenanceFlags,
    pub files: Vec<OutputRecord>,
    pub warnings: Vec<String>,
}

struct Hypothesis {
    maker: DistributionMaker,
    record: HypothesisRecord,
}

fn load_hypothesis(args: &HypothesisArgs, resources: &ResourceLocator) -> Result<Hypothesis> {
    let paths = resources.find_files_sorted(&args.pipelines)?;
    let selections = parse_param_selections(args.param_selections.as_deref());

    let mut maker = DistributionMaker::from_paths(&args.name, &paths)?;
    if !selections.is_empty() {
        maker.select_params(&selections)?;
    }
    tracing::info!(
        target: "asymplot",
        hypothesis = %args.name,
        pipelines = ?maker.pipeline_names(),
        selections = ?selections,
        "loaded hypothesis"
    );

    let pipelines = paths
        .iter()
        .map(|p| -> Result<InputRecord> {
            let bytes = std::fs::read(p).with_context(|| format!("reading {}", p.display()))?;
            Ok(InputRecord { path: p.display().to_string(), sha256: sha256_hex(&bytes) })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Hypothesis {
        maker,
        record: HypothesisRecord { name: args.name.clone(), pipelines, param_selections: selections },
    })
}

fn load_viz_config(path: Option<&Path>, format: &str) -> Result<VizConfig> {
    let yaml = path
        .map(|p| std::fs::read_to_string(p).with_context(|| format!("reading viz config {}", p.display())))
        .transpose()?;
    let mut config = resolve_config(yaml.as_deref())?;
    config.output.format = format.to_string();
    Ok(config)
}

/// Category wildcard lists from a YAML/JSON file (JSON by extension), or the
/// built-in track/cascade patterns.
fn load_category_patterns(path: Option<&Path>) -> Result<CategoryPatterns> {
    let Some(path) = path else {
        return Ok(CategoryPatterns::default());
    };
    let bytes =
        std::fs::read(path).with_context(|| format!("reading category patterns {}", path.display()))?;
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
    let parsed: Result<CategoryPatternsConfig> = if ext == "json" {
        serde_json::from_slice(&bytes).map_err(Into::into)
    } else {
        serde_yaml_ng::from_slice(&bytes).map_err(Into::into)
    };
    let cfg = parsed.with_context(|| format!("parsing category patterns {}", path.display()))?;
    tracing::debug!(target: "asymplot", track = ?cfg.track, cascade = ?cfg.cascade, "category patterns");
    Ok(CategoryPatterns::from_config(&cfg)?)
}

fn now_unix_ms() -> Result<u128> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis())
}

/// Run one comparison; returns the manifest that was written.
pub fn run(args: &CompareArgs, resources: &ResourceLocator, log: &LogContext) -> Result<RunManifest> {
    let format = args.format.to_ascii_lowercase();
    let supported = ap_viz_render::supported_formats();
    if !supported.contains(&format.as_str()) {
        return Err(Error::Configuration(format!(
            "output format {format:?} is not available; choose one of {supported:?}"
        ))
        .into());
    }
    let viz = load_viz_config(args.viz_config.as_deref(), &format)?;
    let categories = load_category_patterns(args.category_patterns.as_deref())?;

    let (h0, h1) = {
        let _t = log.profile("load hypotheses");
        (load_hypothesis(&args.h0, resources)?, load_hypothesis(&args.h1, resources)?)
    };

    let return_sum = !args.return_bits;
    let (h0_maps, h1_maps) = {
        let _t = log.profile("compute outputs");
        (h0.maker.outputs(return_sum)?, h1.maker.outputs(return_sum)?)
    };

    let opts = ReconcileOptions {
        return_total: return_sum,
        detector: args.detector.clone(),
        selection: args.selection.clone(),
        categories,
    };
    let reconciled = reconcile(&h0_maps, &h1_maps, &opts)?;
    tracing::info!(
        target: "asymplot",
        mode = %reconciled.mode,
        pairs = reconciled.pairs.len(),
        "reconciled outputs"
    );

    std::fs::create_dir_all(&args.logdir)
        .with_context(|| format!("creating output directory {}", args.logdir.display()))?;

    let inputs: Vec<String> =
        h0.record.pipelines.iter().chain(&h1.record.pipelines).map(|r| r.sha256.clone()).collect();

    let mut files = Vec::with_capacity(reconciled.pairs.len());
    for pair in &reconciled.pairs {
        let _t = log.profile(format!("plot {}", pair.file_stem));
        let derived = asymmetry_map(&pair.h0, &pair.h1, args.kind)?;
        tracing::info!(
            target: PHYSICS,
            output = %pair.output,
            pid_bin = %pair.pid_label.as_ref().map(|l| l.to_string()).unwrap_or_default(),
            h0_total = pair.h0.hist().iter().sum::<f64>(),
            h1_total = pair.h1.hist().iter().sum::<f64>(),
            max_abs = derived.hist().iter().filter(|v| v.is_finite()).fold(0.0_f64, |m, v| m.max(v.abs())),
            "{} {}",
            args.kind,
            pair.title
        );

        let artifact =
            asymmetry_artifact(pair, &derived, &args.h0.name, &args.h1.name, args.kind, &inputs)?;
        let file = pair.file_name(&args.h0.name, &args.h1.name, args.kind.as_str(), &format);
        let path = args.logdir.join(&file);
        ap_viz_render::render_to_file(&artifact, &path, &viz)
            .with_context(|| format!("rendering {}", path.display()))?;

        let bytes = std::fs::read(&path)?;
        files.push(OutputRecord {
            file,
            output: pair.output.clone(),
            pid_bin: pair.pid_label.as_ref().map(|l| l.to_string()),
            title: pair.title.clone(),
            bytes: bytes.len() as u64,
            sha256: sha256_hex(&bytes),
        });
    }

    let manifest = RunManifest {
        tool: "asymplot".to_string(),
        tool_version: ap_core::VERSION.to_string(),
        created_unix_ms: now_unix_ms()?,
        h0: h0.record,
        h1: h1.record,
        kind: args.kind,
        pid_mode: reconciled.mode,
        return_bits: args.return_bits,
        format,
        viz_theme: viz.theme.clone(),
        provenance: ProvenanceFlags {
            allow_dirty: args.allow_dirty,
            allow_no_git_info: args.allow_no_git_info,
        },
        files,
        warnings: reconciled.warnings,
    };
    let manifest_path = args.logdir.join(MANIFEST_FILE);
    std::fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;
    tracing::info!(target: "asymplot", path = %manifest_path.display(), files = manifest.files.len(), "done");
    Ok(manifest)
}
