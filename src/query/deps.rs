//! `dependencies` / `dependents`: direct `IMPORTS` neighbors of a file,
//! ranked by file-level PageRank (spec §4.6).

use std::path::PathBuf;

use petgraph::Direction;

use crate::graph::edge::EdgeKind;
use crate::index::CodeIndex;
use crate::query::PageParams;

#[derive(Debug, Clone)]
pub struct DepFile {
    pub file: PathBuf,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DepsResult {
    pub files: Vec<DepFile>,
    pub total: usize,
}

/// Outgoing `IMPORTS` neighbors of `file`: the files it depends on.
pub fn dependencies(index: &mut CodeIndex, file: &PathBuf, page: &PageParams) -> DepsResult {
    neighbors(index, file, Direction::Outgoing, page)
}

/// Incoming `IMPORTS` neighbors of `file`: the files that depend on it.
pub fn dependents(index: &mut CodeIndex, file: &PathBuf, page: &PageParams) -> DepsResult {
    neighbors(index, file, Direction::Incoming, page)
}

fn neighbors(index: &mut CodeIndex, file: &PathBuf, dir: Direction, page: &PageParams) -> DepsResult {
    let Some(file_idx) = index.graph().file_index_of(file) else {
        return DepsResult::default();
    };

    let neighbor_paths: Vec<PathBuf> = index
        .graph()
        .edges_of_kind(file_idx, dir, EdgeKind::Imports)
        .filter_map(|idx| index.graph().node(idx).and_then(|n| n.as_file()).map(|f| f.path.clone()))
        .collect();

    let scores = index.file_scores(&[]);
    let mut entries: Vec<DepFile> = neighbor_paths
        .into_iter()
        .map(|f| {
            let score = *scores.get(&f).unwrap_or(&0.0);
            DepFile { file: f, score }
        })
        .collect();
    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let (files, total) = page.apply(entries);
    DepsResult { files, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CodeGraph;
    use std::path::Path;

    #[test]
    fn dependencies_lists_outgoing_imports() {
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(Path::new("a.rs"));
        let b = graph.upsert_file(Path::new("b.rs"));
        graph.add_imports_edge(a, b);
        let mut index = CodeIndex::from_graph_for_test(graph);

        let result = dependencies(&mut index, &PathBuf::from("a.rs"), &PageParams::default());
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].file, PathBuf::from("b.rs"));
    }

    #[test]
    fn dependents_lists_incoming_imports() {
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(Path::new("a.rs"));
        let b = graph.upsert_file(Path::new("b.rs"));
        graph.add_imports_edge(a, b);
        let mut index = CodeIndex::from_graph_for_test(graph);

        let result = dependents(&mut index, &PathBuf::from("b.rs"), &PageParams::default());
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].file, PathBuf::from("a.rs"));
    }

    #[test]
    fn unknown_file_yields_empty_result() {
        let mut graph = CodeGraph::new();
        graph.upsert_file(Path::new("a.rs"));
        let mut index = CodeIndex::from_graph_for_test(graph);
        let result = dependencies(&mut index, &PathBuf::from("missing.rs"), &PageParams::default());
        assert!(result.files.is_empty());
    }
}
