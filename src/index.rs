//! Index session (spec §4.3): owns the one graph instance for a project
//! root, the on-disk cache, and the in-memory rank cache, and reconciles
//! the working tree against what was last indexed.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::builder;
use crate::cache::{self, FileMeta};
use crate::config::IndexConfig;
use crate::error::{IndexError, IndexResult};
use crate::graph::CodeGraph;
use crate::parser::{self, FileSymbols};
use crate::rank::{self, RankCache, RankedSymbol};
use crate::walker;

/// Summary returned from `ensure`/`reindex`, mirroring the teacher's
/// `IndexStats` shape (files/symbols/edges plus what changed this pass).
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    pub files_total: usize,
    pub symbols_total: usize,
    pub edges_total: usize,
    pub files_added: usize,
    pub files_changed: usize,
    pub files_removed: usize,
}

/// A live indexing session bound to one project root.
pub struct CodeIndex {
    root: PathBuf,
    config: IndexConfig,
    graph: CodeGraph,
    file_mtimes: HashMap<PathBuf, FileMeta>,
    rank_cache: RankCache,
}

impl CodeIndex {
    /// Open a session: load the on-disk cache if present and compatible,
    /// otherwise start from an empty graph. Does not touch the filesystem
    /// beyond reading the cache file — call `ensure` to reconcile against
    /// the working tree.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let config = IndexConfig::load(&root);

        match cache::load_cache(&root) {
            Some(envelope) => CodeIndex {
                root,
                config,
                graph: envelope.graph,
                file_mtimes: envelope.file_mtimes,
                rank_cache: RankCache::default(),
            },
            None => CodeIndex {
                root,
                config,
                graph: CodeGraph::new(),
                file_mtimes: HashMap::new(),
                rank_cache: RankCache::default(),
            },
        }
    }

    /// Build a session directly from an in-memory graph, bypassing disk
    /// I/O entirely. Used by query-operator unit tests that only care
    /// about ranking/traversal over a hand-built graph.
    #[cfg(test)]
    pub fn from_graph_for_test(graph: CodeGraph) -> Self {
        CodeIndex {
            root: PathBuf::from("."),
            config: IndexConfig::default(),
            graph,
            file_mtimes: HashMap::new(),
            rank_cache: RankCache::default(),
        }
    }

    /// Override the session root after construction — lets query-operator
    /// tests point a hand-built graph at a real (possibly non-repo) temp
    /// directory for VCS-backed operators (`diff`, `history`).
    #[cfg(test)]
    pub fn set_root_for_test(&mut self, root: impl Into<PathBuf>) {
        self.root = root.into();
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn graph(&self) -> &CodeGraph {
        &self.graph
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Reconcile the graph against the current working tree: discover
    /// files, classify each as added/changed/unchanged by mtime+size
    /// against the last-known snapshot, drop files that disappeared,
    /// extract + merge the added/changed set, and persist the result
    /// (spec §4.3 steps 1-5).
    pub fn ensure(&mut self) -> IndexResult<IndexStats> {
        let discovered = walker::discover(&self.root, &self.config);
        let discovered_set: HashSet<PathBuf> = discovered.iter().cloned().collect();

        let deleted: Vec<PathBuf> = self
            .file_mtimes
            .keys()
            .filter(|p| !discovered_set.contains(*p))
            .cloned()
            .collect();

        // Nodes to drop from the graph before merging: files gone from disk
        // plus files that changed, since a changed file is remove-then-re-add
        // (spec §3 Lifecycles: nodes are "dropped wholesale" when a file is
        // re-parsed) — otherwise its stale definitions/edges linger alongside
        // the freshly merged ones.
        let mut to_drop = deleted.clone();

        let mut to_extract = Vec::new();
        let mut added_count = 0;
        let mut changed_count = 0;
        for path in &discovered {
            match self.classify(path) {
                Classification::Unchanged => {}
                Classification::Added => {
                    added_count += 1;
                    to_extract.push(path.clone());
                }
                Classification::Changed => {
                    changed_count += 1;
                    to_extract.push(path.clone());
                    to_drop.push(path.clone());
                }
            }
        }

        let has_changes = !to_drop.is_empty() || !to_extract.is_empty();

        if has_changes {
            let records = parser::extract_many(&to_extract, read_file);
            builder::update(&mut self.graph, &to_drop, &records);

            for path in &deleted {
                self.file_mtimes.remove(path);
            }
            for record in &records {
                if let Some(meta) = file_meta(&record.file) {
                    self.file_mtimes.insert(record.file.clone(), meta);
                }
            }

            self.rank_cache.invalidate();
            cache::save_cache(&self.root, &self.graph)?;
        }

        Ok(IndexStats {
            files_total: self.graph.file_count(),
            symbols_total: self.graph.symbol_count(),
            edges_total: self.graph.edge_count(),
            files_added: added_count,
            files_changed: changed_count,
            files_removed: deleted.len(),
        })
    }

    /// Force a full rebuild, discarding the existing graph and cache.
    pub fn reindex(&mut self) -> IndexResult<IndexStats> {
        let discovered = walker::discover(&self.root, &self.config);
        let records = parser::extract_many(&discovered, read_file);

        self.graph = builder::cold_build(&records);
        self.file_mtimes = records
            .iter()
            .filter_map(|r| file_meta(&r.file).map(|m| (r.file.clone(), m)))
            .collect();
        self.rank_cache.invalidate();
        cache::save_cache(&self.root, &self.graph)?;

        Ok(IndexStats {
            files_total: self.graph.file_count(),
            symbols_total: self.graph.symbol_count(),
            edges_total: self.graph.edge_count(),
            files_added: self.graph.file_count(),
            files_changed: 0,
            files_removed: 0,
        })
    }

    /// Symbol ranking. Only the unfocused case is cached; a non-empty
    /// focus list always recomputes (spec §4.5).
    pub fn rank(&mut self, focus_files: &[PathBuf]) -> Vec<RankedSymbol> {
        if focus_files.is_empty() {
            self.rank_cache.symbol_scores(&self.graph, &self.config).to_vec()
        } else {
            rank::rank(&self.graph, focus_files, &self.config)
        }
    }

    pub fn file_scores(&mut self, focus_files: &[PathBuf]) -> HashMap<PathBuf, f64> {
        if focus_files.is_empty() {
            self.rank_cache.file_scores(&self.graph, &self.config).clone()
        } else {
            rank::file_scores(&self.graph, focus_files, &self.config)
        }
    }

    fn classify(&self, path: &Path) -> Classification {
        let Some(current) = file_meta(path) else {
            return Classification::Added;
        };
        match self.file_mtimes.get(path) {
            None => Classification::Added,
            Some(previous) if previous.mtime_secs == current.mtime_secs && previous.size == current.size => {
                Classification::Unchanged
            }
            Some(_) => Classification::Changed,
        }
    }
}

enum Classification {
    Unchanged,
    Added,
    Changed,
}

fn file_meta(path: &Path) -> Option<FileMeta> {
    let metadata = std::fs::metadata(path).ok()?;
    let mtime_secs = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Some(FileMeta {
        mtime_secs,
        size: metadata.len(),
    })
}

fn read_file(path: &Path) -> std::io::Result<Vec<u8>> {
    std::fs::read(path)
}

/// Resolve a user-supplied file path (absolute, root-relative, or bare
/// name) against the graph's file index, returning up to 5 suggestions
/// when nothing matches (shared with the query engine's `UnknownFile`).
pub fn resolve_file(graph: &CodeGraph, given: &str) -> IndexResult<PathBuf> {
    let candidate = PathBuf::from(given);
    if graph.file_index_of(&candidate).is_some() {
        return Ok(candidate);
    }

    let suggestions = suggest_files(graph, given);
    Err(IndexError::UnknownFile {
        path: given.to_string(),
        suggestions,
    })
}

fn suggest_files(graph: &CodeGraph, given: &str) -> Vec<String> {
    let needle = given.to_lowercase();
    graph
        .file_nodes()
        .map(|(path, _)| path)
        .filter(|path| {
            let s = path.to_string_lossy().to_lowercase();
            s.contains(&needle)
                || path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_lowercase().contains(&needle))
                    .unwrap_or(false)
        })
        .take(5)
        .map(|p| p.display().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(tmp: &std::path::Path, name: &str, contents: &str) {
        std::fs::write(tmp.join(name), contents).unwrap();
    }

    #[test]
    fn ensure_indexes_new_files_and_persists_cache() {
        let tmp = tempfile::tempdir().unwrap();
        unsafe { std::env::set_var("CODE_INDEX_CACHE_DIR", tmp.path().join("cache")) };
        write(tmp.path(), "a.rs", "fn a() {}\nfn b() { a(); }\n");

        let mut index = CodeIndex::open(tmp.path());
        let stats = index.ensure().unwrap();
        assert_eq!(stats.files_total, 1);
        assert_eq!(stats.files_added, 1);
        assert_eq!(stats.symbols_total, 2);

        unsafe { std::env::remove_var("CODE_INDEX_CACHE_DIR") };
    }

    #[test]
    fn ensure_is_idempotent_when_nothing_changed() {
        let tmp = tempfile::tempdir().unwrap();
        unsafe { std::env::set_var("CODE_INDEX_CACHE_DIR", tmp.path().join("cache")) };
        write(tmp.path(), "a.rs", "fn a() {}\n");

        let mut index = CodeIndex::open(tmp.path());
        index.ensure().unwrap();
        let second = index.ensure().unwrap();
        assert_eq!(second.files_added, 0);
        assert_eq!(second.files_changed, 0);
        assert_eq!(second.files_total, 1);

        unsafe { std::env::remove_var("CODE_INDEX_CACHE_DIR") };
    }

    #[test]
    fn ensure_detects_removed_file() {
        let tmp = tempfile::tempdir().unwrap();
        unsafe { std::env::set_var("CODE_INDEX_CACHE_DIR", tmp.path().join("cache")) };
        write(tmp.path(), "a.rs", "fn a() {}\n");

        let mut index = CodeIndex::open(tmp.path());
        index.ensure().unwrap();
        std::fs::remove_file(tmp.path().join("a.rs")).unwrap();
        let stats = index.ensure().unwrap();
        assert_eq!(stats.files_removed, 1);
        assert_eq!(stats.files_total, 0);

        unsafe { std::env::remove_var("CODE_INDEX_CACHE_DIR") };
    }

    #[test]
    fn ensure_drops_stale_symbols_from_a_changed_file() {
        // A changed file must be remove-then-re-add: a definition dropped
        // from the new version (and its edges) must not linger (spec §3
        // Lifecycles, invariant I4).
        let tmp = tempfile::tempdir().unwrap();
        unsafe { std::env::set_var("CODE_INDEX_CACHE_DIR", tmp.path().join("cache")) };
        write(tmp.path(), "a.rs", "fn a() {}\nfn stale() {}\n");

        let mut index = CodeIndex::open(tmp.path());
        index.ensure().unwrap();
        assert!(index.graph.symbol_index_of(Path::new("a.rs"), "stale").is_some());

        write(tmp.path(), "a.rs", "fn a() {}\n");
        let stats = index.ensure().unwrap();
        assert_eq!(stats.files_changed, 1);
        assert_eq!(stats.files_removed, 0, "a changed file is not a deletion");
        assert!(index.graph.symbol_index_of(Path::new("a.rs"), "stale").is_none());
        assert!(index.graph.symbol_index_of(Path::new("a.rs"), "a").is_some());
        assert_eq!(stats.symbols_total, 1);

        unsafe { std::env::remove_var("CODE_INDEX_CACHE_DIR") };
    }

    #[test]
    fn resolve_unknown_file_yields_suggestions() {
        let mut graph = CodeGraph::new();
        graph.upsert_file(Path::new("src/widget.rs"));
        let err = resolve_file(&graph, "widget").unwrap_err();
        match err {
            IndexError::UnknownFile { suggestions, .. } => {
                assert!(suggestions.iter().any(|s| s.contains("widget.rs")))
            }
            _ => panic!("expected UnknownFile"),
        }
    }
}
