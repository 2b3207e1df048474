//! Resolution of user-supplied resource paths.
//!
//! A resource is looked up as given (after `~` and `$VAR` expansion), then
//! relative to each directory listed in `ASYMPLOT_RESOURCES`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use ap_core::{Error, Result};
use regex::{Captures, Regex};

/// Environment variable holding the colon-separated resource search path.
pub const RESOURCES_ENV: &str = "ASYMPLOT_RESOURCES";

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
        .expect("valid env var pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    File,
    Dir,
}

impl ResourceKind {
    fn accepts(self, path: &Path) -> bool {
        match self {
            ResourceKind::File => path.is_file(),
            ResourceKind::Dir => path.is_dir(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResourceLocator {
    search_dirs: Vec<PathBuf>,
}

impl ResourceLocator {
    /// Search path from `ASYMPLOT_RESOURCES`.
    pub fn from_env() -> Self {
        let dirs = std::env::var(RESOURCES_ENV).unwrap_or_default();
        Self::with_search_path(&dirs)
    }

    /// Search path from a colon-separated list; empty entries are skipped.
    pub fn with_search_path(list: &str) -> Self {
        let search_dirs =
            list.split(':').filter(|s| !s.trim().is_empty()).map(|s| PathBuf::from(expand(s))).collect();
        Self { search_dirs }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    pub fn find(&self, resource: &str, kind: ResourceKind) -> Result<PathBuf> {
        let expanded = PathBuf::from(expand(resource));
        if kind.accepts(&expanded) {
            return Ok(expanded);
        }
        if expanded.is_relative() {
            for dir in &self.search_dirs {
                let candidate = dir.join(&expanded);
                if kind.accepts(&candidate) {
                    tracing::trace!(target: "asymplot", path = %candidate.display(), "resolved resource");
                    return Ok(candidate);
                }
            }
        }
        Err(Error::ResourceNotFound(format!(
            "{resource} ({}) not found as given or under {RESOURCES_ENV}={:?}",
            match kind {
                ResourceKind::File => "file",
                ResourceKind::Dir => "directory",
            },
            self.search_dirs
        )))
    }

    pub fn find_file(&self, resource: &str) -> Result<PathBuf> {
        self.find(resource, ResourceKind::File)
    }

    /// Resolve every resource and return the paths sorted.
    pub fn find_files_sorted(&self, resources: &[String]) -> Result<Vec<PathBuf>> {
        let mut paths = resources.iter().map(|r| self.find_file(r)).collect::<Result<Vec<_>>>()?;
        paths.sort();
        Ok(paths)
    }
}

/// Expand a leading `~` and `$VAR` / `${VAR}` references; unknown variables are left as written.
pub fn expand(s: &str) -> String {
    let s = s.trim();
    let vars = ENV_VAR.replace_all(s, |caps: &Captures<'_>| {
        let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        std::env::var(name).unwrap_or_else(|_| caps[0].to_string())
    });
    match (vars.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            format!("{}{}", home.display(), rest)
        }
        _ => vars.into_owned(),
    }
}
