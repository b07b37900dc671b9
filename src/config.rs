//! Project configuration: `<root>/.code-index/config.json` (spec §6),
//! merged with the built-in ignore list and path-tier table. A malformed or
//! missing config file degrades to defaults with a logged warning — never
//! a hard failure (matching the teacher's `CodeGraphConfig::load` style).

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

pub const CONFIG_PATH: &str = ".code-index/config.json";

/// Built-in ignore patterns, always active regardless of project config
/// (spec §6): dependency directories, build output, VCS/tool caches, and
/// common scratch paths.
pub const BUILTIN_IGNORES: &[&str] = &[
    "node_modules",
    "vendor",
    ".venv",
    "venv",
    "target/debug",
    "target/release",
    "site-packages",
    "dist",
    "build",
    "out",
    "coverage",
    ".git",
    ".code-index",
    ".code-graph",
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".tox",
    "tmp",
    "temp",
];

/// Default path-tier multipliers (spec §4.5): fractional weight applied to
/// a symbol's rank score when its file falls under one of these prefixes.
/// Matched as a path prefix or a `/`-separated segment prefix; first match
/// wins. Project config entries are checked before these defaults.
pub const DEFAULT_PATH_TIERS: &[(&str, f64)] = &[
    ("tests/", 0.2),
    ("test/", 0.2),
    ("scripts/", 0.3),
    ("deploy/", 0.3),
    ("tmp/", 0.2),
    ("qa/", 0.2),
];

#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    ignore: Vec<String>,
    #[serde(default, rename = "pathTiers")]
    path_tiers: HashMap<String, f64>,
}

#[derive(Debug, Clone, Default)]
pub struct IndexConfig {
    /// Project-specific ignore patterns, appended to `BUILTIN_IGNORES`.
    pub ignore: Vec<String>,
    /// Project-specific path-tier overrides, checked before
    /// `DEFAULT_PATH_TIERS`.
    pub path_tiers: HashMap<String, f64>,
}

impl IndexConfig {
    /// Load `<root>/.code-index/config.json`. A missing file yields the
    /// empty config (builtin defaults still apply); a malformed file logs a
    /// warning and also yields the empty config.
    pub fn load(root: &Path) -> Self {
        let path = root.join(CONFIG_PATH);
        if !path.exists() {
            return Self::default();
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read config, using defaults");
                return Self::default();
            }
        };

        match serde_json::from_str::<RawConfig>(&contents) {
            Ok(raw) => IndexConfig {
                ignore: raw.ignore,
                path_tiers: raw.path_tiers,
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to parse config, using defaults");
                Self::default()
            }
        }
    }

    /// The effective path-tier weight for a relative file path: the first
    /// matching project override, else the first matching built-in
    /// default, else 1.0.
    pub fn path_weight(&self, relative_path: &Path) -> f64 {
        let path_str = relative_path.to_string_lossy().replace('\\', "/");

        for (prefix, weight) in &self.path_tiers {
            if matches_prefix(&path_str, prefix) {
                return *weight;
            }
        }
        for &(prefix, weight) in DEFAULT_PATH_TIERS {
            if matches_prefix(&path_str, prefix) {
                return weight;
            }
        }
        1.0
    }

    /// All ignore patterns: built-ins plus this project's additions.
    pub fn all_ignore_patterns(&self) -> Vec<String> {
        let mut patterns: Vec<String> = BUILTIN_IGNORES.iter().map(|s| s.to_string()).collect();
        patterns.extend(self.ignore.iter().cloned());
        patterns
    }
}

fn matches_prefix(path_str: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    path_str == prefix
        || path_str.starts_with(&format!("{prefix}/"))
        || path_str
            .split('/')
            .any(|segment| segment == prefix)
}
