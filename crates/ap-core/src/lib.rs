//! # ap-core
//!
//! Core data model for asymplot: binnings, maps, map sets, wildcard
//! categories, the error taxonomy and the pipeline collaborator trait.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Binning descriptors.
#[allow(missing_docs)]
pub mod binning;
/// Error taxonomy.
pub mod error;
/// Binned maps.
#[allow(missing_docs)]
pub mod map;
/// Map collections.
#[allow(missing_docs)]
pub mod map_set;
/// Wildcards and output categories.
#[allow(missing_docs)]
pub mod pattern;
/// Collaborator traits.
pub mod traits;

pub use binning::{BinSelector, MultiDimBinning, OneDimBinning};
pub use error::{Error, Result};
pub use map::Map;
pub use map_set::MapSet;
pub use pattern::{Category, CategoryPatterns, CategoryPatternsConfig, GlobPattern};
pub use traits::{DistributionPipeline, PID_STAGE};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
