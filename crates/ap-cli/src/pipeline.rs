//! File-backed distribution pipelines.
//!
//! A pipeline config lists the stages it ran and the output maps it produced.
//! Named `variants` replace outputs when their param selector is chosen, e.g.
//! `nh` / `ih` for the two neutrino mass orderings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ap_core::{DistributionPipeline, Error, Map, MapSet, MultiDimBinning, Result};
use serde::Deserialize;

/// Name of the map produced by summing all outputs.
pub const TOTAL: &str = "total";

#[derive(Debug, Clone, Deserialize)]
pub struct MapSpec {
    pub name: String,
    pub binning: MultiDimBinning,
    pub hist: Vec<f64>,
    #[serde(default)]
    pub errors: Option<Vec<f64>>,
    #[serde(default)]
    pub tex: Option<String>,
}

impl MapSpec {
    fn to_map(&self) -> Result<Map> {
        self.binning.validate()?;
        let mut map = Map::new(&self.name, self.binning.clone(), self.hist.clone())?;
        if let Some(errors) = &self.errors {
            map = map.with_errors(errors.clone())?;
        }
        if let Some(tex) = &self.tex {
            map = map.with_tex(tex);
        }
        Ok(map)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    #[serde(default)]
    pub stages: Vec<String>,
    pub outputs: Vec<MapSpec>,
    /// Param selector → replacement outputs.
    #[serde(default)]
    pub variants: BTreeMap<String, Vec<MapSpec>>,
}

/// Read a pipeline config (JSON by extension, YAML otherwise).
pub fn read_pipeline_config(path: &Path) -> Result<PipelineConfig> {
    let bytes = std::fs::read(path)?;
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
    let cfg: PipelineConfig = if ext == "json" {
        serde_json::from_slice(&bytes)?
    } else {
        serde_yaml_ng::from_slice(&bytes)?
    };
    Ok(cfg)
}

#[derive(Debug, Clone)]
pub struct FilePipeline {
    source: PathBuf,
    config: PipelineConfig,
    selected: Vec<String>,
}

impl FilePipeline {
    pub fn from_path(path: &Path) -> Result<Self> {
        let config = read_pipeline_config(path)?;
        tracing::debug!(target: "asymplot", path = %path.display(), name = %config.name, "loaded pipeline");
        Ok(Self::from_config(config, path.to_path_buf()))
    }

    pub fn from_config(config: PipelineConfig, source: PathBuf) -> Self {
        Self { source, config, selected: Vec::new() }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }
}

impl DistributionPipeline for FilePipeline {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn stage_names(&self) -> &[String] {
        &self.config.stages
    }

    fn select_params(&mut self, selectors: &[String]) -> Result<()> {
        if let Some(unknown) = selectors.iter().find(|s| !self.config.variants.contains_key(*s)) {
            return Err(Error::Configuration(format!(
                "pipeline '{}' has no param selector {unknown:?}; available: {:?}",
                self.config.name,
                self.config.variants.keys().collect::<Vec<_>>()
            )));
        }
        self.selected = selectors.to_vec();
        Ok(())
    }

    fn outputs(&self) -> Result<MapSet> {
        let mut specs: Vec<&MapSpec> = self.config.outputs.iter().collect();
        for selector in &self.selected {
            for replacement in &self.config.variants[selector] {
                match specs.iter_mut().find(|s| s.name == replacement.name) {
                    Some(slot) => *slot = replacement,
                    None => specs.push(replacement),
                }
            }
        }
        let maps = specs.into_iter().map(MapSpec::to_map).collect::<Result<Vec<_>>>()?;
        MapSet::new(&self.config.name, maps)
    }
}

/// One hypothesis: one or more pipelines whose outputs are combined.
pub struct DistributionMaker {
    name: String,
    pipelines: Vec<Box<dyn DistributionPipeline>>,
}

impl DistributionMaker {
    pub fn new(name: impl Into<String>, pipelines: Vec<Box<dyn DistributionPipeline>>) -> Result<Self> {
        let name = name.into();
        if pipelines.is_empty() {
            return Err(Error::Configuration(format!("hypothesis '{name}' has no pipelines")));
        }
        Ok(Self { name, pipelines })
    }

    /// Load one [`FilePipeline`] per config path.
    pub fn from_paths(name: impl Into<String>, paths: &[PathBuf]) -> Result<Self> {
        let pipelines = paths
            .iter()
            .map(|p| FilePipeline::from_path(p).map(|fp| Box::new(fp) as Box<dyn DistributionPipeline>))
            .collect::<Result<Vec<_>>>()?;
        Self::new(name, pipelines)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pipeline_names(&self) -> Vec<&str> {
        self.pipelines.iter().map(|p| p.name()).collect()
    }

    pub fn has_pid_stage(&self) -> bool {
        self.pipelines.iter().any(|p| p.has_pid_stage())
    }

    pub fn select_params(&mut self, selectors: &[String]) -> Result<()> {
        for p in &mut self.pipelines {
            p.select_params(selectors)?;
        }
        Ok(())
    }

    /// Summed: one map `total` over all pipelines. Un-summed: the first
    /// pipeline's outputs (further pipelines are ignored with a warning).
    pub fn outputs(&self, return_sum: bool) -> Result<MapSet> {
        if return_sum && self.has_pid_stage() {
            return Err(Error::Configuration(format!(
                "hypothesis '{}' runs PID as a separate stage; its outputs cannot be summed \
                 into a total (keep the outputs separate)",
                self.name
            )));
        }

        if return_sum {
            let mut total: Option<Map> = None;
            for p in &self.pipelines {
                let sum = p.outputs()?.sum(TOTAL)?;
                total = Some(match total {
                    Some(acc) => acc.checked_add(&sum)?,
                    None => sum,
                });
            }
            let total = total
                .ok_or_else(|| Error::Configuration(format!("hypothesis '{}' has no pipelines", self.name)))?;
            return MapSet::new(&self.name, vec![total]);
        }

        if self.pipelines.len() > 1 {
            tracing::warn!(
                target: "asymplot",
                hypothesis = %self.name,
                ignored = self.pipelines.len() - 1,
                "un-summed outputs use only the first pipeline"
            );
        }
        let first = self.pipelines[0].outputs()?;
        MapSet::new(&self.name, first.into_maps())
    }
}
