//! `history`: the revision history of the lines spanning a symbol's
//! definition (SPEC_FULL §3 — named in the CLI surface of spec §6 without
//! an operator body of its own; implemented here as a thin VCS-backed
//! helper alongside `diff`, sharing its timeout/error contract).

use std::path::Path;

use crate::error::{IndexError, IndexResult};
use crate::index::CodeIndex;
use crate::vcs::{self, LogEntry};

pub fn history(
    index: &CodeIndex,
    symbol: &str,
    file: Option<&Path>,
    offset: usize,
    limit: usize,
) -> IndexResult<Vec<LogEntry>> {
    let candidates = crate::query::candidates_named(index.graph(), symbol, file);
    let Some(&idx) = candidates.first() else {
        return Err(IndexError::UnknownSymbol {
            name: symbol.to_string(),
            suggestions: crate::query::suggest_symbols(index.graph(), symbol),
        });
    };
    let info = index.graph().node(idx).and_then(|n| n.as_symbol()).expect("symbol node");

    vcs::line_history(index.root(), &info.file, info.line_start, info.line_end, offset, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CodeGraph;
    use crate::graph::node::{SymbolInfo, SymbolKind};
    use std::path::Path;

    #[test]
    fn unknown_symbol_yields_suggestions() {
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(Path::new("a.rs"));
        graph.upsert_symbol(
            a,
            SymbolInfo {
                name: "helperFn".into(),
                kind: SymbolKind::Function,
                file: "a.rs".into(),
                line_start: 1,
                line_end: 1,
                signature: "fn helperFn()".into(),
            },
        );
        let index = CodeIndex::from_graph_for_test(graph);
        let err = history(&index, "helper", None, 0, 10).unwrap_err();
        match err {
            IndexError::UnknownSymbol { suggestions, .. } => {
                assert!(suggestions.contains(&"helperFn".to_string()))
            }
            _ => panic!("expected UnknownSymbol"),
        }
    }

    #[test]
    fn non_repo_returns_vcs_unavailable() {
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(Path::new("a.rs"));
        graph.upsert_symbol(
            a,
            SymbolInfo {
                name: "foo".into(),
                kind: SymbolKind::Function,
                file: "a.rs".into(),
                line_start: 1,
                line_end: 1,
                signature: "fn foo()".into(),
            },
        );
        let tmp = tempfile::tempdir().unwrap();
        let mut index = CodeIndex::from_graph_for_test(graph);
        index.set_root_for_test(tmp.path());
        let err = history(&index, "foo", None, 0, 10).unwrap_err();
        assert!(matches!(err, IndexError::VcsUnavailable { .. }));
    }
}
