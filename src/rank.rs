//! Ranker (C5): PageRank over a working copy of the graph, optionally
//! focus-biased, with path-tier dampening applied to symbol scores only
//! (spec §4.5).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use petgraph::Direction;
use petgraph::stable_graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::config::IndexConfig;
use crate::graph::CodeGraph;
use crate::graph::node::symbol_key;

const DAMPING: f64 = 0.85;
const MAX_ITERATIONS: usize = 100;
const TOLERANCE: f64 = 1e-6;
const FOCUS_EDGE_WEIGHT: f64 = 10.0;

/// One ranked symbol, keyed the same way as `CodeGraph`'s symbol index.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSymbol {
    pub symbol_key: String,
    pub score: f64,
}

/// Run PageRank on `graph`, biased toward `focus_files` if non-empty, and
/// return symbol scores sorted descending with path-tier dampening
/// applied. Never mutates `graph` itself (spec: "work on a copy of the
/// graph" — here, a side table of scores rather than a cloned graph,
/// since the topology itself is read-only).
pub fn rank(graph: &CodeGraph, focus_files: &[PathBuf], config: &IndexConfig) -> Vec<RankedSymbol> {
    let raw_scores = pagerank(graph, focus_files);

    let mut ranked: Vec<RankedSymbol> = graph
        .symbol_nodes()
        .filter_map(|idx| {
            let symbol = graph.node(idx)?.as_symbol()?;
            let base_score = *raw_scores.get(&idx)?;
            let weight = config.path_weight(&symbol.file);
            Some(RankedSymbol {
                symbol_key: symbol_key(&symbol.file, &symbol.name),
                score: base_score * weight,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

/// File-level score: the sum of its symbols' (path-tier-dampened) scores.
pub fn file_scores(graph: &CodeGraph, focus_files: &[PathBuf], config: &IndexConfig) -> HashMap<PathBuf, f64> {
    let mut totals: HashMap<PathBuf, f64> = HashMap::new();
    for ranked in rank(graph, focus_files, config) {
        let Some((file, _)) = ranked.symbol_key.rsplit_once("::") else {
            continue;
        };
        *totals.entry(PathBuf::from(file)).or_insert(0.0) += ranked.score;
    }
    totals
}

/// Core weighted PageRank power iteration. Returns raw (un-dampened)
/// scores for every node in `graph`, including file nodes — callers that
/// only want symbols filter afterward (spec step 5).
fn pagerank(graph: &CodeGraph, focus_files: &[PathBuf]) -> HashMap<NodeIndex, f64> {
    let inner = graph.inner();
    let nodes: Vec<NodeIndex> = inner.node_indices().collect();
    let n = nodes.len();
    if n == 0 {
        return HashMap::new();
    }

    let focus_targets: Vec<NodeIndex> = focus_files
        .iter()
        .filter_map(|f| graph.file_index_of(f))
        .collect();
    let has_focus = !focus_targets.is_empty();
    let total_nodes = n + usize::from(has_focus);
    let base = (1.0 - DAMPING) / total_nodes as f64;

    let out_degree: HashMap<NodeIndex, usize> = nodes
        .iter()
        .map(|&idx| (idx, inner.edges_directed(idx, Direction::Outgoing).count()))
        .collect();

    let mut scores: HashMap<NodeIndex, f64> =
        nodes.iter().map(|&idx| (idx, 1.0 / total_nodes as f64)).collect();
    let mut focus_score = 1.0 / total_nodes as f64;

    for _ in 0..MAX_ITERATIONS {
        let mut next: HashMap<NodeIndex, f64> = nodes.iter().map(|&idx| (idx, base)).collect();

        for &idx in &nodes {
            let score = scores[&idx];
            let degree = out_degree[&idx];
            if degree == 0 {
                // Dangling node: redistribute its mass uniformly, the
                // standard PageRank fix for sinks.
                let share = score * DAMPING / n as f64;
                for &target in &nodes {
                    *next.get_mut(&target).unwrap() += share;
                }
                continue;
            }
            let share = score * DAMPING / degree as f64;
            for edge in inner.edges_directed(idx, Direction::Outgoing) {
                *next.get_mut(&edge.target()).unwrap() += share;
            }
        }

        if has_focus {
            let per_target = focus_score * DAMPING * FOCUS_EDGE_WEIGHT
                / (focus_targets.len() as f64 * FOCUS_EDGE_WEIGHT);
            for &target in &focus_targets {
                *next.get_mut(&target).unwrap() += per_target;
            }
        }
        let next_focus_score = base;

        let delta: f64 = nodes.iter().map(|idx| (next[idx] - scores[idx]).abs()).sum::<f64>()
            + (next_focus_score - focus_score).abs();

        scores = next;
        focus_score = next_focus_score;

        if delta < TOLERANCE {
            break;
        }
    }

    scores
}

/// Session-level rank cache (spec §4.5 / §9): only the unfocused ranking
/// is cached, and the cache is invalidated wholesale whenever the query
/// engine observes a change or deletion. No reactive machinery — callers
/// flip `invalidate()` themselves after a changed/deleted `ensure()`.
#[derive(Default)]
pub struct RankCache {
    symbols: Option<Vec<RankedSymbol>>,
    files: Option<HashMap<PathBuf, f64>>,
}

impl RankCache {
    pub fn invalidate(&mut self) {
        self.symbols = None;
        self.files = None;
    }

    pub fn symbol_scores(&mut self, graph: &CodeGraph, config: &IndexConfig) -> &[RankedSymbol] {
        if self.symbols.is_none() {
            self.symbols = Some(rank(graph, &[], config));
        }
        self.symbols.as_deref().unwrap_or(&[])
    }

    pub fn file_scores(&mut self, graph: &CodeGraph, config: &IndexConfig) -> &HashMap<PathBuf, f64> {
        if self.files.is_none() {
            self.files = Some(self::file_scores(graph, &[], config));
        }
        self.files.get_or_insert_with(HashMap::new)
    }
}

pub fn symbol_file(symbol_key: &str) -> Option<&Path> {
    symbol_key.rsplit_once("::").map(|(file, _)| Path::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::{SymbolInfo, SymbolKind};

    fn sym(file: &str, name: &str) -> SymbolInfo {
        SymbolInfo {
            name: name.to_string(),
            kind: SymbolKind::Function,
            file: PathBuf::from(file),
            line_start: 1,
            line_end: 1,
            signature: format!("fn {name}()"),
        }
    }

    #[test]
    fn empty_graph_ranks_to_nothing() {
        let graph = CodeGraph::new();
        let config = IndexConfig::default();
        assert!(rank(&graph, &[], &config).is_empty());
    }

    #[test]
    fn isolated_file_symbols_get_positive_scores() {
        let mut graph = CodeGraph::new();
        let f = graph.upsert_file(Path::new("a.rs"));
        graph.upsert_symbol(f, sym("a.rs", "solo"));
        let config = IndexConfig::default();
        let ranked = rank(&graph, &[], &config);
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].score > 0.0);
    }

    #[test]
    fn focus_file_increases_its_own_symbol_score() {
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(Path::new("a.rs"));
        let b = graph.upsert_file(Path::new("b.rs"));
        let c = graph.upsert_file(Path::new("c.rs"));
        let d = graph.upsert_file(Path::new("d.rs"));
        graph.upsert_symbol(a, sym("a.rs", "a_fn"));
        graph.upsert_symbol(b, sym("b.rs", "b_fn"));
        graph.upsert_symbol(c, sym("c.rs", "c_fn"));
        graph.upsert_symbol(d, sym("d.rs", "d_fn"));
        graph.add_imports_edge(b, a);
        graph.add_imports_edge(c, a);
        graph.add_imports_edge(d, a);

        let config = IndexConfig::default();
        let unfocused = rank(&graph, &[], &config);
        let focused = rank(&graph, &[PathBuf::from("c.rs")], &config);

        let score_of = |ranked: &[RankedSymbol], key: &str| {
            ranked.iter().find(|r| r.symbol_key == key).map(|r| r.score).unwrap()
        };

        let c_unfocused = score_of(&unfocused, "c.rs::c_fn");
        let c_focused = score_of(&focused, "c.rs::c_fn");
        assert!(c_focused > c_unfocused, "focused score must strictly increase");
    }

    #[test]
    fn path_tier_dampens_test_directory_symbol() {
        let mut graph = CodeGraph::new();
        let src = graph.upsert_file(Path::new("src/foo.rs"));
        let test = graph.upsert_file(Path::new("tests/foo.rs"));
        graph.upsert_symbol(src, sym("src/foo.rs", "a"));
        graph.upsert_symbol(test, sym("tests/foo.rs", "b"));

        let config = IndexConfig::default();
        let ranked = rank(&graph, &[], &config);
        let src_score = ranked.iter().find(|r| r.symbol_key == "src/foo.rs::a").unwrap().score;
        let test_score = ranked.iter().find(|r| r.symbol_key == "tests/foo.rs::b").unwrap().score;
        // Isolated, topologically-symmetric nodes get equal raw PageRank;
        // the 0.2 default test-tier weight should be the only difference.
        assert!((test_score / src_score - 0.2).abs() < 1e-9);
    }
}
