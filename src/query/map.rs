//! `map`: the repository's symbols in rank order, grouped by file (spec
//! §4.6).

use std::path::PathBuf;

use crate::graph::node::SymbolKind;
use crate::index::CodeIndex;
use crate::query::PageParams;

#[derive(Debug, Clone)]
pub struct MapSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub line_start: usize,
    pub line_end: usize,
    pub signature: String,
}

#[derive(Debug, Clone)]
pub struct MapFile {
    pub file: PathBuf,
    pub symbols: Vec<MapSymbol>,
}

#[derive(Debug, Clone, Default)]
pub struct MapResult {
    pub files: Vec<MapFile>,
    pub shown_files: usize,
    pub shown_symbols: usize,
    pub total_files: usize,
    pub total_symbols: usize,
}

/// Rank every symbol (optionally focus-biased), paginate the flat ranked
/// list, then regroup the paginated window by file, preserving the order
/// each file first appears in rank order.
pub fn map(index: &mut CodeIndex, focus_files: &[PathBuf], page: &PageParams) -> MapResult {
    let total_files = index.graph().file_count();
    let total_symbols = index.graph().symbol_count();

    let ranked = index.rank(focus_files);
    let (window, _) = page.apply(ranked);

    if page.count {
        return MapResult {
            files: Vec::new(),
            shown_files: 0,
            shown_symbols: 0,
            total_files,
            total_symbols,
        };
    }

    let graph = index.graph();
    let mut files: Vec<MapFile> = Vec::new();
    let mut shown_symbols = 0;

    for ranked_symbol in &window {
        let Some((file_str, name)) = ranked_symbol.symbol_key.rsplit_once("::") else {
            continue;
        };
        let file = PathBuf::from(file_str);
        let Some(idx) = graph.symbol_index_of(&file, name) else {
            continue;
        };
        let Some(symbol) = graph.node(idx).and_then(|n| n.as_symbol()) else {
            continue;
        };

        let entry = match files.iter_mut().find(|f| f.file == file) {
            Some(entry) => entry,
            None => {
                files.push(MapFile { file: file.clone(), symbols: Vec::new() });
                files.last_mut().unwrap()
            }
        };
        entry.symbols.push(MapSymbol {
            name: symbol.name.clone(),
            kind: symbol.kind,
            line_start: symbol.line_start,
            line_end: symbol.line_end,
            signature: symbol.signature.clone(),
        });
        shown_symbols += 1;
    }

    MapResult {
        shown_files: files.len(),
        shown_symbols,
        total_files,
        total_symbols,
        files,
    }
}

/// Render the "text" shape: one file header per group, then one
/// `"  {lineStart:>4}│ {signature}"` line per symbol (spec §4.6).
pub fn render_text(result: &MapResult) -> String {
    let mut out = String::new();
    for file in &result.files {
        out.push_str(&file.file.display().to_string());
        out.push('\n');
        for symbol in &file.symbols {
            out.push_str(&format!("  {:>4}│ {}\n", symbol.line_start, symbol.signature));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::{SymbolInfo, SymbolKind};
    use crate::graph::CodeGraph;

    fn index_with_graph(graph: CodeGraph) -> CodeIndex {
        CodeIndex::from_graph_for_test(graph)
    }

    #[test]
    fn groups_by_file_in_rank_order() {
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(std::path::Path::new("a.rs"));
        let b = graph.upsert_file(std::path::Path::new("b.rs"));
        graph.upsert_symbol(
            a,
            SymbolInfo {
                name: "a_fn".into(),
                kind: SymbolKind::Function,
                file: "a.rs".into(),
                line_start: 1,
                line_end: 1,
                signature: "fn a_fn()".into(),
            },
        );
        graph.upsert_symbol(
            b,
            SymbolInfo {
                name: "b_fn".into(),
                kind: SymbolKind::Function,
                file: "b.rs".into(),
                line_start: 1,
                line_end: 1,
                signature: "fn b_fn()".into(),
            },
        );
        graph.add_imports_edge(b, a);

        let mut index = index_with_graph(graph);
        let result = map(&mut index, &[], &PageParams::default());
        assert_eq!(result.total_files, 2);
        assert_eq!(result.total_symbols, 2);
        assert_eq!(result.shown_symbols, 2);
        // `a.rs` is imported by `b.rs`, so it should out-rank it and come first.
        assert_eq!(result.files[0].file, std::path::PathBuf::from("a.rs"));
    }

    #[test]
    fn count_mode_reports_totals_without_rendering() {
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(std::path::Path::new("a.rs"));
        graph.upsert_symbol(
            a,
            SymbolInfo {
                name: "a_fn".into(),
                kind: SymbolKind::Function,
                file: "a.rs".into(),
                line_start: 1,
                line_end: 1,
                signature: "fn a_fn()".into(),
            },
        );
        let mut index = index_with_graph(graph);
        let page = PageParams { count: true, ..Default::default() };
        let result = map(&mut index, &[], &page);
        assert!(result.files.is_empty());
        assert_eq!(result.total_symbols, 1);
    }
}
