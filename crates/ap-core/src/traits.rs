//! Collaborator traits for asymplot
//!
//! Reconciliation and rendering only consume [`MapSet`]s; where they come
//! from is behind [`DistributionPipeline`], so a file-backed pipeline and a
//! full simulation chain are interchangeable.

use crate::Result;
use crate::map_set::MapSet;

/// Stage name that marks particle identification as a separate output stage.
pub const PID_STAGE: &str = "pid";

/// Source of named output maps for one hypothesis.
pub trait DistributionPipeline {
    /// Pipeline name (for logs and manifests)
    fn name(&self) -> &str;

    /// Ordered stage names of the pipeline
    fn stage_names(&self) -> &[String];

    /// Select configuration variants by param selector (lower-case names)
    fn select_params(&mut self, selectors: &[String]) -> Result<()>;

    /// Compute (or load) the output maps under the current selection
    fn outputs(&self) -> Result<MapSet>;

    /// Whether PID runs as its own stage and therefore produces separate
    /// named outputs.
    fn has_pid_stage(&self) -> bool {
        self.stage_names().iter().any(|s| s == PID_STAGE)
    }
}
