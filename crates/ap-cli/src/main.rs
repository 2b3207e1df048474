//! asymplot CLI

mod compare;
mod logging;
mod pipeline;
mod resources;

use std::path::PathBuf;

use anyhow::Result;
use ap_viz::AsymmetryKind;
use clap::{ArgAction, Parser};

use compare::{CompareArgs, HypothesisArgs};
use logging::LogContext;
use resources::ResourceLocator;

#[derive(Parser)]
#[command(name = "asymplot")]
#[command(about = "Compare the expected distributions of two hypotheses and plot their asymmetry")]
#[command(version)]
struct Cli {
    /// Directory for figures and the run manifest
    #[arg(short = 'd', long)]
    logdir: PathBuf,

    /// Pipeline config(s) for hypothesis h0 (YAML or JSON)
    #[arg(long = "h0-pipeline", required = true, action = ArgAction::Append)]
    h0_pipeline: Vec<String>,

    /// Comma-separated param selectors applied to h0
    #[arg(long = "h0-param-selections")]
    h0_param_selections: Option<String>,

    /// Name of h0 in titles and file names
    #[arg(long = "h0-name", default_value = "h0")]
    h0_name: String,

    /// Pipeline config(s) for h1. Defaults to the h0 pipelines.
    #[arg(long = "h1-pipeline", action = ArgAction::Append)]
    h1_pipeline: Vec<String>,

    /// Comma-separated param selectors applied to h1
    #[arg(long = "h1-param-selections")]
    h1_param_selections: Option<String>,

    /// Name of h1 in titles and file names
    #[arg(long = "h1-name", default_value = "h1")]
    h1_name: String,

    /// Detector label, e.g. DeepCore
    #[arg(long)]
    detector: Option<String>,

    /// Event selection label
    #[arg(long)]
    selection: Option<String>,

    /// Statistic: asymmetry, difference, fraction or percentage
    #[arg(long, default_value = "asymmetry")]
    atype: AsymmetryKind,

    /// Keep pipeline outputs separate instead of summing them into a total
    #[arg(long)]
    return_bits: bool,

    /// Figure format (pdf, svg, png)
    #[arg(long, default_value = "pdf")]
    format: String,

    /// YAML overrides for the figure style
    #[arg(long)]
    viz_config: Option<PathBuf>,

    /// Track/cascade wildcard lists (YAML or JSON) for separate PID outputs
    #[arg(long)]
    category_patterns: Option<PathBuf>,

    /// Record that a dirty working tree was accepted
    #[arg(long)]
    allow_dirty: bool,

    /// Record that missing git info was accepted
    #[arg(long)]
    allow_no_git_info: bool,

    /// Verbosity: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// `-v` count, or `None` when the flag was not given.
    fn verbosity(&self) -> Option<u8> {
        (self.verbose > 0).then_some(self.verbose)
    }

    fn compare_args(self) -> CompareArgs {
        let h1_pipelines =
            if self.h1_pipeline.is_empty() { self.h0_pipeline.clone() } else { self.h1_pipeline };
        CompareArgs {
            logdir: self.logdir,
            h0: HypothesisArgs {
                name: self.h0_name,
                pipelines: self.h0_pipeline,
                param_selections: self.h0_param_selections,
            },
            h1: HypothesisArgs {
                name: self.h1_name,
                pipelines: h1_pipelines,
                param_selections: self.h1_param_selections,
            },
            detector: self.detector,
            selection: self.selection,
            kind: self.atype,
            return_bits: self.return_bits,
            format: self.format,
            viz_config: self.viz_config,
            category_patterns: self.category_patterns,
            allow_dirty: self.allow_dirty,
            allow_no_git_info: self.allow_no_git_info,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let resources = ResourceLocator::from_env();
    let log = LogContext::from_resources(&resources, cli.verbosity())?;
    log.init();

    let manifest = compare::run(&cli.compare_args(), &resources, &log)?;
    for f in &manifest.files {
        println!("{}", f.file);
    }
    Ok(())
}
