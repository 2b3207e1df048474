//! Name-indexed collections of maps from one hypothesis run.

use crate::map::Map;
use crate::pattern::GlobPattern;
use crate::{Error, Result};

/// Maps sharing an origin (one hypothesis, one pipeline run).
///
/// Names are unique; iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct MapSet {
    name: String,
    maps: Vec<Map>,
}

impl MapSet {
    pub fn new(name: impl Into<String>, maps: Vec<Map>) -> Result<Self> {
        let mut set = Self { name: name.into(), maps: Vec::with_capacity(maps.len()) };
        for m in maps {
            set.insert(m)?;
        }
        Ok(set)
    }

    pub fn insert(&mut self, map: Map) -> Result<()> {
        if self.get(map.name()).is_some() {
            return Err(Error::Validation(format!(
                "map set '{}' already contains a map named '{}'",
                self.name,
                map.name()
            )));
        }
        self.maps.push(map);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.maps.iter().map(Map::name).collect()
    }

    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.maps.iter().map(|m| m.name().to_string()).collect();
        names.sort();
        names
    }

    pub fn get(&self, name: &str) -> Option<&Map> {
        self.maps.iter().find(|m| m.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Map> {
        self.maps.iter()
    }

    pub fn into_maps(self) -> Vec<Map> {
        self.maps
    }

    /// Sum every map whose name matches at least one of `patterns` into one
    /// map named after the patterns (`a|b`). No match is a configuration error.
    pub fn combine_wildcard(&self, patterns: &[GlobPattern]) -> Result<Map> {
        let label = patterns.iter().map(GlobPattern::as_str).collect::<Vec<_>>().join("|");
        let matching: Vec<&Map> =
            self.maps.iter().filter(|m| patterns.iter().any(|p| p.matches(m.name()))).collect();
        sum_maps(&matching, &label).map_err(|e| match e {
            Error::Configuration(_) => Error::Configuration(format!(
                "no map in set '{}' matches '{label}' (have {:?})",
                self.name,
                self.names()
            )),
            other => other,
        })
    }

    /// Sum of all maps in the set.
    pub fn sum(&self, name: &str) -> Result<Map> {
        let all: Vec<&Map> = self.maps.iter().collect();
        sum_maps(&all, name)
    }
}

fn sum_maps(maps: &[&Map], name: &str) -> Result<Map> {
    let (first, rest) = maps
        .split_first()
        .ok_or_else(|| Error::Configuration(format!("nothing to sum for '{name}'")))?;
    let mut total = (*first).clone();
    for m in rest {
        total = total.checked_add(m)?;
    }
    Ok(total.renamed(name))
}
