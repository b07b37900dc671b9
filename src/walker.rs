//! File discovery: walk `projectRoot`, collect files whose extension has a
//! registered grammar and that don't match any ignore pattern (spec
//! §4.3 step 1 / §6).

use std::path::{Path, PathBuf};

use crate::config::IndexConfig;
use crate::language::GrammarRegistry;

/// Recursively discover source files under `root`. Honors `.gitignore`
/// (even outside a git repository), the built-in ignore list, and the
/// project's `.code-index/config.json` ignore patterns. A file is only
/// returned if its extension resolves to a registered grammar.
pub fn discover(root: &Path, config: &IndexConfig) -> Vec<PathBuf> {
    let patterns = config.all_ignore_patterns();
    let registry = GrammarRegistry::global();

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(true)
        .require_git(false)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!(error = %err, "walk error, skipping entry");
                continue;
            }
        };

        if entry.file_type().is_none_or(|ft| !ft.is_file()) {
            continue;
        }

        let path = entry.path();

        if matches_any_ignore(path, root, &patterns) {
            continue;
        }

        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if registry.resolve(ext).is_none() {
            continue;
        }

        files.push(path.to_path_buf());
    }

    files
}

fn matches_any_ignore(path: &Path, root: &Path, patterns: &[String]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let components: Vec<&str> = relative
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    let relative_str = components.join("/");

    for pattern in patterns {
        if let Ok(glob) = glob::Pattern::new(pattern) {
            if glob.matches(&relative_str) {
                return true;
            }
            if components.iter().any(|&segment| glob.matches(segment)) {
                return true;
            }
        } else if components.iter().any(|&segment| segment == pattern) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_source_files_and_skips_node_modules() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.rs"), "fn a() {}").unwrap();
        std::fs::create_dir_all(tmp.path().join("node_modules/pkg")).unwrap();
        std::fs::write(tmp.path().join("node_modules/pkg/b.js"), "function b() {}").unwrap();

        let config = IndexConfig::default();
        let files = discover(tmp.path(), &config);

        assert!(files.iter().any(|p| p.ends_with("a.rs")));
        assert!(!files.iter().any(|p| p.to_string_lossy().contains("node_modules")));
    }

    #[test]
    fn skips_unsupported_extensions() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("readme.md"), "hello").unwrap();
        let config = IndexConfig::default();
        let files = discover(tmp.path(), &config);
        assert!(files.is_empty());
    }

    #[test]
    fn honors_project_ignore_pattern() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("generated.rs"), "fn g() {}").unwrap();
        std::fs::write(tmp.path().join("real.rs"), "fn r() {}").unwrap();

        let mut config = IndexConfig::default();
        config.ignore.push("generated.rs".to_string());
        let files = discover(tmp.path(), &config);

        assert!(files.iter().any(|p| p.ends_with("real.rs")));
        assert!(!files.iter().any(|p| p.ends_with("generated.rs")));
    }
}
