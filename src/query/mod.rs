//! Query Engine (C6): the user-visible read-only operators layered on top
//! of the graph and ranker. Every list-returning operator accepts the same
//! `{offset, limit, count}` shape and applies pagination *after* ranking
//! (spec §4.6).

pub mod callers;
pub mod context;
pub mod deps;
pub mod diff;
pub mod history;
pub mod map;
pub mod neighborhood;
pub mod orphans;
pub mod search;
pub mod stats;
pub mod symbols;
pub mod trace;

use std::collections::HashSet;
use std::path::Path;

use petgraph::stable_graph::NodeIndex;

use crate::graph::CodeGraph;
use crate::rank::RankedSymbol;

/// Shared pagination input. `limit = None` means "no cap".
#[derive(Debug, Clone, Default)]
pub struct PageParams {
    pub offset: usize,
    pub limit: Option<usize>,
    pub count: bool,
}

impl PageParams {
    pub fn apply<T>(&self, items: Vec<T>) -> (Vec<T>, usize) {
        let total = items.len();
        let shown = if self.count {
            Vec::new()
        } else {
            items
                .into_iter()
                .skip(self.offset)
                .take(self.limit.unwrap_or(usize::MAX))
                .collect()
        };
        (shown, total)
    }
}

/// Case-insensitive basename/substring match over known files, capped at 5,
/// unranked, first-seen order (spec §7/§9's one suggestion helper, shared
/// by every operator that reports `UnknownFile`).
pub fn suggest_files(graph: &CodeGraph, given: &str) -> Vec<String> {
    let needle = given.to_lowercase();
    graph
        .file_nodes()
        .map(|(path, _)| path)
        .filter(|path| {
            let full = path.to_string_lossy().to_lowercase();
            full.contains(&needle)
                || path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_lowercase().contains(&needle))
                    .unwrap_or(false)
        })
        .take(5)
        .map(|p| p.display().to_string())
        .collect()
}

/// Same shape for symbol names (`UnknownSymbol`).
pub fn suggest_symbols(graph: &CodeGraph, given: &str) -> Vec<String> {
    let needle = given.to_lowercase();
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for idx in graph.symbol_nodes() {
        let Some(symbol) = graph.node(idx).and_then(|n| n.as_symbol()) else {
            continue;
        };
        if !symbol.name.to_lowercase().contains(&needle) {
            continue;
        }
        if seen.insert(symbol.name.clone()) {
            out.push(symbol.name.clone());
            if out.len() == 5 {
                break;
            }
        }
    }
    out
}

/// Every symbol node named `name`, optionally narrowed to one owning file —
/// shared by `context`, `trace`, and `callers` (spec §4.6).
pub fn candidates_named(graph: &CodeGraph, name: &str, file: Option<&Path>) -> Vec<NodeIndex> {
    graph
        .symbols_named(name)
        .into_iter()
        .filter(|&idx| match (file, graph.node(idx).and_then(|n| n.as_symbol())) {
            (Some(f), Some(sym)) => sym.file == f,
            (None, _) => true,
            (Some(_), None) => false,
        })
        .collect()
}

/// Break ties among ambiguous candidates by unfocused PageRank, highest
/// first (spec §4.6's "Resolve one target symbol (ambiguity broken by
/// PageRank)").
pub fn best_by_rank(graph: &CodeGraph, ranked: &[RankedSymbol], candidates: &[NodeIndex]) -> Option<NodeIndex> {
    if candidates.is_empty() {
        return None;
    }
    if candidates.len() == 1 {
        return Some(candidates[0]);
    }
    let rank_of = |idx: NodeIndex| -> f64 {
        graph
            .node(idx)
            .and_then(|n| n.as_symbol())
            .and_then(|s| {
                let key = crate::graph::node::symbol_key(&s.file, &s.name);
                ranked.iter().find(|r| r.symbol_key == key)
            })
            .map(|r| r.score)
            .unwrap_or(0.0)
    };
    candidates
        .iter()
        .copied()
        .max_by(|&a, &b| rank_of(a).partial_cmp(&rank_of(b)).unwrap_or(std::cmp::Ordering::Equal))
}
