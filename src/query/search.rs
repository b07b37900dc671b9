//! `search`: case-insensitive substring match against symbol name or
//! signature, optionally narrowed by kind, ranked by unfocused PageRank
//! (spec §4.6).

use std::path::PathBuf;

use crate::graph::node::SymbolKind;
use crate::index::CodeIndex;
use crate::query::PageParams;

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub name: String,
    pub kind: SymbolKind,
    pub file: PathBuf,
    pub line_start: usize,
    pub line_end: usize,
    pub signature: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub hits: Vec<SearchHit>,
    pub total: usize,
}

pub fn search(
    index: &mut CodeIndex,
    query: &str,
    kind: Option<SymbolKind>,
    page: &PageParams,
) -> SearchResult {
    let needle = query.to_lowercase();
    let ranked = index.rank(&[]);
    let graph = index.graph();

    let matches: Vec<SearchHit> = ranked
        .iter()
        .filter_map(|r| {
            let (file_str, name) = r.symbol_key.rsplit_once("::")?;
            let idx = graph.symbol_index_of(&PathBuf::from(file_str), name)?;
            let symbol = graph.node(idx)?.as_symbol()?;
            if let Some(want) = kind {
                if symbol.kind != want {
                    return None;
                }
            }
            let haystack_matches = symbol.name.to_lowercase().contains(&needle)
                || symbol.signature.to_lowercase().contains(&needle);
            if !haystack_matches {
                return None;
            }
            Some(SearchHit {
                name: symbol.name.clone(),
                kind: symbol.kind,
                file: symbol.file.clone(),
                line_start: symbol.line_start,
                line_end: symbol.line_end,
                signature: symbol.signature.clone(),
                score: r.score,
            })
        })
        .collect();

    let (hits, total) = page.apply(matches);
    SearchResult { hits, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::SymbolInfo;
    use crate::graph::CodeGraph;
    use std::path::Path;

    fn sym(file: &str, name: &str, sig: &str, kind: SymbolKind) -> SymbolInfo {
        SymbolInfo {
            name: name.into(),
            kind,
            file: file.into(),
            line_start: 1,
            line_end: 1,
            signature: sig.into(),
        }
    }

    #[test]
    fn matches_name_or_signature_case_insensitively() {
        let mut graph = CodeGraph::new();
        let f = graph.upsert_file(Path::new("a.rs"));
        graph.upsert_symbol(f, sym("a.rs", "FetchUser", "fn FetchUser() -> User", SymbolKind::Function));
        graph.upsert_symbol(f, sym("a.rs", "other", "fn other()", SymbolKind::Function));
        let mut index = CodeIndex::from_graph_for_test(graph);

        let result = search(&mut index, "fetchuser", None, &PageParams::default());
        assert_eq!(result.hits.len(), 1);
        assert_eq!(result.hits[0].name, "FetchUser");
    }

    #[test]
    fn kind_filter_excludes_non_matching() {
        let mut graph = CodeGraph::new();
        let f = graph.upsert_file(Path::new("a.rs"));
        graph.upsert_symbol(f, sym("a.rs", "Widget", "struct Widget", SymbolKind::Class));
        graph.upsert_symbol(f, sym("a.rs", "widget_fn", "fn widget_fn()", SymbolKind::Function));
        let mut index = CodeIndex::from_graph_for_test(graph);

        let result = search(&mut index, "widget", Some(SymbolKind::Class), &PageParams::default());
        assert_eq!(result.hits.len(), 1);
        assert_eq!(result.hits[0].name, "Widget");
    }
}
