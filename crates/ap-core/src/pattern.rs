//! Shell-style wildcard patterns and output category classification.

use regex::Regex;
use serde::Deserialize;

use crate::{Error, Result};

/// A compiled shell-style wildcard (`*`, `?`, `[abc]`, `[!abc]`).
///
/// Matching ignores case, and whitespace is stripped from the candidate
/// name first: `"numu_CC_ Trck"` matches `*_tr*ck*`.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    raw: String,
    re: Regex,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let re = Regex::new(&glob_to_regex(pattern))
            .map_err(|e| Error::Configuration(format!("invalid wildcard '{pattern}': {e}")))?;
        Ok(Self { raw: pattern.to_string(), re })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, name: &str) -> bool {
        let normalized: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        self.re.is_match(&normalized)
    }
}

fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("(?i)^");
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                let negated = chars.get(i + 1) == Some(&'!');
                let start = if negated { i + 2 } else { i + 1 };
                // A `]` first in the class is a member, not the terminator.
                let search_from = if chars.get(start) == Some(&']') { start + 1 } else { start };
                let close = chars.get(search_from..).and_then(|rest| rest.iter().position(|&c| c == ']'));
                match close {
                    Some(p) => {
                        let end = search_from + p;
                        out.push_str(&class_to_regex(&chars[start..end], negated));
                        i = end;
                    }
                    None => out.push_str(r"\["),
                }
            }
            c => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }
    out.push('$');
    out
}

/// Translate the members of a `[...]` class. Class metacharacters are escaped
/// so `&&`, `--` and `~~` stay literal members; `a-z` is the only range
/// syntax, and reversed ranges match nothing.
fn class_to_regex(body: &[char], negated: bool) -> String {
    let member = |c: char| {
        if matches!(c, '\\' | '[' | ']' | '^' | '-' | '&' | '~') { format!("\\{c}") } else { c.to_string() }
    };
    let mut items = String::new();
    let mut j = 0;
    while j < body.len() {
        if j + 2 < body.len() && body[j + 1] == '-' {
            let (lo, hi) = (body[j], body[j + 2]);
            if lo <= hi {
                items.push_str(&format!("{}-{}", member(lo), member(hi)));
            }
            j += 3;
        } else {
            items.push_str(&member(body[j]));
            j += 1;
        }
    }
    match (items.is_empty(), negated) {
        (true, false) => r"[^\x00-\x{10FFFF}]".to_string(),
        (true, true) => ".".to_string(),
        (false, false) => format!("[{items}]"),
        (false, true) => format!("[^{items}]"),
    }
}

/// Output category when PID is realised as separate named outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Track,
    Cascade,
    Other,
}

impl Category {
    /// Short tag used in file names.
    pub fn tag(self) -> &'static str {
        match self {
            Category::Track => "trck",
            Category::Cascade => "cscd",
            Category::Other => "other",
        }
    }

    /// Human-readable name used in titles.
    pub fn description(self) -> &'static str {
        match self {
            Category::Track => "track",
            Category::Cascade => "cascade",
            Category::Other => "other",
        }
    }
}

/// Raw pattern lists, as read from configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CategoryPatternsConfig {
    pub track: Vec<String>,
    pub cascade: Vec<String>,
}

impl Default for CategoryPatternsConfig {
    fn default() -> Self {
        Self { track: vec!["*_tr*ck*".into()], cascade: vec!["*_c*sc*d*".into()] }
    }
}

/// Compiled classifier mapping output names to a [`Category`].
#[derive(Debug, Clone)]
pub struct CategoryPatterns {
    track: Vec<GlobPattern>,
    cascade: Vec<GlobPattern>,
}

impl CategoryPatterns {
    pub fn from_config(cfg: &CategoryPatternsConfig) -> Result<Self> {
        let compile = |list: &[String]| -> Result<Vec<GlobPattern>> {
            list.iter().map(|p| GlobPattern::new(p)).collect()
        };
        Ok(Self { track: compile(&cfg.track)?, cascade: compile(&cfg.cascade)? })
    }

    /// Track patterns are tested before cascade patterns.
    pub fn classify(&self, name: &str) -> Category {
        if self.track.iter().any(|p| p.matches(name)) {
            Category::Track
        } else if self.cascade.iter().any(|p| p.matches(name)) {
            Category::Cascade
        } else {
            Category::Other
        }
    }

    pub fn patterns(&self, category: Category) -> &[GlobPattern] {
        match category {
            Category::Track => &self.track,
            Category::Cascade => &self.cascade,
            Category::Other => &[],
        }
    }
}

impl Default for CategoryPatterns {
    fn default() -> Self {
        Self::from_config(&CategoryPatternsConfig::default())
            .expect("built-in category patterns are valid")
    }
}
