//! `symbols`: enumerate symbol nodes with optional `file`/`kind` filters,
//! ranked by unfocused PageRank (spec §4.6).

use std::path::PathBuf;

use crate::graph::node::SymbolKind;
use crate::index::CodeIndex;
use crate::query::PageParams;

#[derive(Debug, Clone)]
pub struct SymbolEntry {
    pub name: String,
    pub kind: SymbolKind,
    pub file: PathBuf,
    pub line_start: usize,
    pub line_end: usize,
    pub signature: String,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolsResult {
    pub symbols: Vec<SymbolEntry>,
    pub total: usize,
}

pub fn symbols(
    index: &mut CodeIndex,
    file: Option<&PathBuf>,
    kind: Option<SymbolKind>,
    page: &PageParams,
) -> SymbolsResult {
    let ranked = index.rank(&[]);
    let graph = index.graph();

    let matches: Vec<SymbolEntry> = ranked
        .iter()
        .filter_map(|r| {
            let (file_str, sym_name) = r.symbol_key.rsplit_once("::")?;
            let symbol_file = PathBuf::from(file_str);
            if let Some(want) = file {
                if &symbol_file != want {
                    return None;
                }
            }
            let idx = graph.symbol_index_of(&symbol_file, sym_name)?;
            let symbol = graph.node(idx)?.as_symbol()?;
            if let Some(want) = kind {
                if symbol.kind != want {
                    return None;
                }
            }
            Some(SymbolEntry {
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

    let (symbols, total) = page.apply(matches);
    SymbolsResult { symbols, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::SymbolInfo;
    use crate::graph::CodeGraph;
    use std::path::Path;

    fn sym(file: &str, name: &str, kind: SymbolKind) -> SymbolInfo {
        SymbolInfo {
            name: name.into(),
            kind,
            file: file.into(),
            line_start: 1,
            line_end: 1,
            signature: format!("fn {name}()"),
        }
    }

    #[test]
    fn file_filter_narrows_to_one_file() {
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(Path::new("a.rs"));
        let b = graph.upsert_file(Path::new("b.rs"));
        graph.upsert_symbol(a, sym("a.rs", "a_fn", SymbolKind::Function));
        graph.upsert_symbol(b, sym("b.rs", "b_fn", SymbolKind::Function));
        let mut index = CodeIndex::from_graph_for_test(graph);

        let result = symbols(&mut index, Some(&PathBuf::from("a.rs")), None, &PageParams::default());
        assert_eq!(result.symbols.len(), 1);
        assert_eq!(result.symbols[0].name, "a_fn");
    }
}
