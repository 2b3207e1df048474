//! Logging setup for the three asymplot channels.
//!
//! - `asymplot`: general progress (`opening file x`, `doing this now`)
//! - `asymplot::physics`: physics output worth keeping (`have x many events`)
//! - `asymplot::tprofile`: step timings as `start <label>` / `stop <label>`
//!
//! Levels come from `settings/logging/logging.json` found under
//! `ASYMPLOT_RESOURCES` (first match wins), or from a built-in default.
//! The `-v` count then overrides the general and timing channels.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ap_core::{Error, Result};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::resources::ResourceLocator;

pub const GENERAL: &str = "asymplot";
pub const PHYSICS: &str = "asymplot::physics";
pub const TPROFILE: &str = "asymplot::tprofile";

/// Library crates whose events follow the general channel.
const LIBRARY_TARGETS: [&str; 3] = ["ap_core", "ap_viz", "ap_viz_render"];

const LOGGING_JSON: &str = "settings/logging/logging.json";

const DEFAULT_CONFIG: &str = r#"{
  "version": 1,
  "loggers": {
    "asymplot": { "level": "WARN" },
    "asymplot.physics": { "level": "WARN" },
    "asymplot.tprofile": { "level": "WARN" }
  }
}"#;

/// `logging.json`: the `loggers` section of a dictConfig-style file.
/// Formatter and handler sections are accepted and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub loggers: BTreeMap<String, LoggerConfig>,
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggerConfig {
    pub level: String,
}

impl LoggingConfig {
    pub fn builtin() -> Result<Self> {
        serde_json::from_str::<Self>(DEFAULT_CONFIG)?.checked()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice::<Self>(&bytes)?.checked()
    }

    fn checked(self) -> Result<Self> {
        if self.version != 1 {
            return Err(Error::Configuration(format!(
                "unsupported logging config version {}",
                self.version
            )));
        }
        Ok(self)
    }

    /// First `settings/logging/logging.json` under the resource dirs, if any.
    pub fn locate(resources: &ResourceLocator) -> Option<PathBuf> {
        resources.search_dirs().iter().map(|d| d.join(LOGGING_JSON)).find(|p| p.is_file())
    }

    /// Level of a channel; `asymplot.physics` and `asymplot::physics` are the same channel.
    fn level(&self, channel: &str) -> Result<Option<LevelFilter>> {
        let dotted = channel.replace("::", ".");
        self.loggers
            .get(&dotted)
            .or_else(|| self.loggers.get(channel))
            .map(|l| parse_level(&l.level))
            .transpose()
    }
}

fn parse_level(s: &str) -> Result<LevelFilter> {
    match s.trim().to_ascii_uppercase().as_str() {
        "TRACE" => Ok(LevelFilter::TRACE),
        "DEBUG" => Ok(LevelFilter::DEBUG),
        "INFO" => Ok(LevelFilter::INFO),
        "WARN" | "WARNING" => Ok(LevelFilter::WARN),
        "ERROR" | "CRITICAL" => Ok(LevelFilter::ERROR),
        "OFF" => Ok(LevelFilter::OFF),
        other => Err(Error::Configuration(format!("unknown log level {other:?}"))),
    }
}

/// `-v` count to level: 0 → warn, 1 → info, 2 → debug, 3 → trace.
pub fn verbosity_level(verbosity: u8) -> Result<LevelFilter> {
    match verbosity {
        0 => Ok(LevelFilter::WARN),
        1 => Ok(LevelFilter::INFO),
        2 => Ok(LevelFilter::DEBUG),
        3 => Ok(LevelFilter::TRACE),
        v => Err(Error::Configuration(format!(
            "verbosity specified is {v} but must be one of 0, 1, 2, 3"
        ))),
    }
}

/// Resolved per-channel levels; installs the global subscriber once.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub general: LevelFilter,
    pub physics: LevelFilter,
    pub tprofile: LevelFilter,
}

impl LogContext {
    pub fn new(config: &LoggingConfig, verbosity: Option<u8>) -> Result<Self> {
        let mut ctx = Self {
            general: config.level(GENERAL)?.unwrap_or(LevelFilter::WARN),
            physics: config.level(PHYSICS)?.unwrap_or(LevelFilter::WARN),
            tprofile: config.level(TPROFILE)?.unwrap_or(LevelFilter::WARN),
        };
        if let Some(v) = verbosity {
            let level = verbosity_level(v)?;
            ctx.general = level;
            ctx.tprofile = level;
        }
        Ok(ctx)
    }

    /// Load `logging.json` from the resource dirs (or the built-in default);
    /// `verbosity`, when given, overrides the general and timing channels.
    pub fn from_resources(resources: &ResourceLocator, verbosity: Option<u8>) -> Result<Self> {
        let config = match LoggingConfig::locate(resources) {
            Some(path) => LoggingConfig::from_file(&path)?,
            None => LoggingConfig::builtin()?,
        };
        Self::new(&config, verbosity)
    }

    pub fn targets(&self) -> Targets {
        let mut targets = Targets::new()
            .with_target(GENERAL, self.general)
            .with_target(PHYSICS, self.physics)
            .with_target(TPROFILE, self.tprofile)
            .with_target("ap_cli", self.general);
        for t in LIBRARY_TARGETS {
            targets = targets.with_target(t, self.general);
        }
        targets
    }

    /// Install the fmt subscriber filtered per channel.
    pub fn init(&self) {
        let fmt = tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr);
        tracing_subscriber::registry().with(fmt).with(self.targets()).init();
    }

    /// Timing guard: logs `start <label>` now and `stop <label>` when dropped.
    pub fn profile(&self, label: impl Into<String>) -> ProfileGuard {
        let label = label.into();
        tracing::info!(target: TPROFILE, "start {label}");
        ProfileGuard { label, started: Instant::now() }
    }
}

#[must_use = "the stop line is logged when the guard is dropped"]
pub struct ProfileGuard {
    label: String,
    started: Instant,
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1e3;
        tracing::info!(target: TPROFILE, elapsed_ms, "stop {}", self.label);
    }
}
