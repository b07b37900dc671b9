//! `neighborhood`: the BFS-reachable file set around a starting file on
//! `IMPORTS` edges, scored and capped (spec §4.6).

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;

use petgraph::Direction;
use petgraph::stable_graph::NodeIndex;

use crate::graph::edge::EdgeKind;
use crate::graph::node::SymbolKind;
use crate::index::CodeIndex;

#[derive(Debug, Clone)]
pub struct NeighborhoodFile {
    pub file: PathBuf,
    pub hop: usize,
    pub is_direct: bool,
}

#[derive(Debug, Clone)]
pub struct NeighborhoodEdge {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone)]
pub struct NeighborhoodSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub file: PathBuf,
    pub line_start: usize,
    pub signature: String,
}

#[derive(Debug, Clone, Default)]
pub struct NeighborhoodResult {
    pub files: Vec<NeighborhoodFile>,
    pub edges: Vec<NeighborhoodEdge>,
    pub symbols: Vec<NeighborhoodSymbol>,
    pub total_files: usize,
    pub total_symbols: usize,
    pub total_edges: usize,
    pub total_visited: usize,
}

pub struct NeighborhoodParams {
    pub hops: usize,
    pub include_dependents: bool,
    pub max_files: usize,
    pub count: bool,
}

impl Default for NeighborhoodParams {
    fn default() -> Self {
        NeighborhoodParams { hops: 2, include_dependents: true, max_files: 15, count: false }
    }
}

pub fn neighborhood(index: &mut CodeIndex, file: &PathBuf, params: &NeighborhoodParams) -> Option<NeighborhoodResult> {
    let graph = index.graph();
    let start_idx = graph.file_index_of(file)?;

    // Forward BFS on IMPORTS up to `hops` depth.
    let mut file_hops: HashMap<NodeIndex, usize> = HashMap::new();
    file_hops.insert(start_idx, 0);
    let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::new();
    queue.push_back((start_idx, 0));
    while let Some((current, depth)) = queue.pop_front() {
        if depth >= params.hops {
            continue;
        }
        for next in graph.edges_of_kind(current, Direction::Outgoing, EdgeKind::Imports) {
            if !file_hops.contains_key(&next) {
                file_hops.insert(next, depth + 1);
                queue.push_back((next, depth + 1));
            }
        }
    }

    let direct_outgoing: HashSet<NodeIndex> =
        graph.edges_of_kind(start_idx, Direction::Outgoing, EdgeKind::Imports).collect();
    let direct_dependents: HashSet<NodeIndex> = if params.include_dependents {
        graph.edges_of_kind(start_idx, Direction::Incoming, EdgeKind::Imports).collect()
    } else {
        HashSet::new()
    };

    for &dep in &direct_dependents {
        file_hops.entry(dep).or_insert(1);
    }

    let direct_files: HashSet<NodeIndex> = std::iter::once(start_idx)
        .chain(direct_outgoing.iter().copied())
        .chain(direct_dependents.iter().copied())
        .collect();

    let total_visited = file_hops.len();

    drop(graph);
    let focus_scores = index.file_scores(&[file.clone()]);
    let graph = index.graph();

    let mut scored: Vec<(NodeIndex, f64, usize, bool)> = file_hops
        .iter()
        .map(|(&idx, &hop)| {
            let is_direct = direct_files.contains(&idx);
            let path = graph.node(idx).and_then(|n| n.as_file()).map(|f| f.path.clone());
            let pr = path.and_then(|p| focus_scores.get(&p).copied()).unwrap_or(0.0);
            let score = if is_direct { 1e6 } else { 0.0 } + pr * 1e4 - hop as f64;
            (idx, score, hop, is_direct)
        })
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(params.max_files);

    let kept: HashSet<NodeIndex> = scored.iter().map(|(idx, ..)| *idx).collect();

    let mut files: Vec<NeighborhoodFile> = scored
        .iter()
        .filter_map(|&(idx, _, hop, is_direct)| {
            graph.node(idx).and_then(|n| n.as_file()).map(|f| NeighborhoodFile {
                file: f.path.clone(),
                hop,
                is_direct,
            })
        })
        .collect();
    files.sort_by(|a, b| a.hop.cmp(&b.hop).then_with(|| a.file.cmp(&b.file)));

    let mut edges = Vec::new();
    for target in graph.edges_of_kind(start_idx, Direction::Outgoing, EdgeKind::Imports) {
        if kept.contains(&target) {
            if let (Some(from), Some(to)) = (
                graph.node(start_idx).and_then(|n| n.as_file()),
                graph.node(target).and_then(|n| n.as_file()),
            ) {
                edges.push(NeighborhoodEdge { from: from.path.clone(), to: to.path.clone() });
            }
        }
    }
    for source in graph.edges_of_kind(start_idx, Direction::Incoming, EdgeKind::Imports) {
        if kept.contains(&source) {
            if let (Some(from), Some(to)) = (
                graph.node(source).and_then(|n| n.as_file()),
                graph.node(start_idx).and_then(|n| n.as_file()),
            ) {
                edges.push(NeighborhoodEdge { from: from.path.clone(), to: to.path.clone() });
            }
        }
    }

    let ranked_symbols = {
        drop(graph);
        index.rank(&[file.clone()])
    };
    let graph = index.graph();

    let kept_paths: HashSet<PathBuf> = kept
        .iter()
        .filter_map(|&idx| graph.node(idx).and_then(|n| n.as_file()).map(|f| f.path.clone()))
        .collect();

    let symbols: Vec<NeighborhoodSymbol> = ranked_symbols
        .iter()
        .filter_map(|r| {
            let (file_str, name) = r.symbol_key.rsplit_once("::")?;
            let f = PathBuf::from(file_str);
            if !kept_paths.contains(&f) {
                return None;
            }
            let idx = graph.symbol_index_of(&f, name)?;
            let symbol = graph.node(idx)?.as_symbol()?;
            Some(NeighborhoodSymbol {
                name: symbol.name.clone(),
                kind: symbol.kind,
                file: symbol.file.clone(),
                line_start: symbol.line_start,
                signature: symbol.signature.clone(),
            })
        })
        .collect();

    let total_symbols = symbols.len();
    let total_edges = edges.len();
    let total_files = files.len();

    if params.count {
        return Some(NeighborhoodResult {
            files: Vec::new(),
            edges: Vec::new(),
            symbols: Vec::new(),
            total_files,
            total_symbols,
            total_edges,
            total_visited,
        });
    }

    Some(NeighborhoodResult { files, edges, symbols, total_files, total_symbols, total_edges, total_visited })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::{SymbolInfo, SymbolKind};
    use crate::graph::CodeGraph;
    use std::path::Path;

    fn sym(file: &str, name: &str) -> SymbolInfo {
        SymbolInfo {
            name: name.into(),
            kind: SymbolKind::Function,
            file: file.into(),
            line_start: 1,
            line_end: 1,
            signature: format!("fn {name}()"),
        }
    }

    #[test]
    fn direct_neighbors_always_kept() {
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(Path::new("a.rs"));
        let b = graph.upsert_file(Path::new("b.rs"));
        let c = graph.upsert_file(Path::new("c.rs"));
        graph.upsert_symbol(a, sym("a.rs", "a_fn"));
        graph.upsert_symbol(b, sym("b.rs", "b_fn"));
        graph.upsert_symbol(c, sym("c.rs", "c_fn"));
        graph.add_imports_edge(a, b);
        graph.add_imports_edge(c, a);

        let mut index = CodeIndex::from_graph_for_test(graph);
        let params = NeighborhoodParams::default();
        let result = neighborhood(&mut index, &PathBuf::from("a.rs"), &params).unwrap();

        assert!(result.files.iter().any(|f| f.file == Path::new("b.rs") && f.is_direct));
        assert!(result.files.iter().any(|f| f.file == Path::new("c.rs") && f.is_direct));
    }

    #[test]
    fn unknown_file_returns_none() {
        let mut graph = CodeGraph::new();
        graph.upsert_file(Path::new("a.rs"));
        let mut index = CodeIndex::from_graph_for_test(graph);
        assert!(neighborhood(&mut index, &PathBuf::from("missing.rs"), &NeighborhoodParams::default()).is_none());
    }
}
