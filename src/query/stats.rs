//! `stats`: aggregate counts over the current graph — files by language,
//! symbols by kind, edges by kind (SPEC_FULL §3, grounded in the teacher's
//! `IndexStats`/summary printer).

use std::collections::HashMap;

use crate::graph::CodeGraph;
use crate::graph::edge::EdgeKind;
use crate::graph::node::SymbolKind;
use crate::language::{GrammarRegistry, LanguageId};

#[derive(Debug, Clone, Default)]
pub struct ProjectStats {
    pub file_count: usize,
    pub symbol_count: usize,
    pub files_by_language: HashMap<LanguageId, usize>,
    pub symbols_by_kind: HashMap<SymbolKind, usize>,
    pub defines_edges: usize,
    pub references_edges: usize,
    pub imports_edges: usize,
}

pub fn project_stats(graph: &CodeGraph) -> ProjectStats {
    let registry = GrammarRegistry::global();

    let mut files_by_language: HashMap<LanguageId, usize> = HashMap::new();
    for (path, _) in graph.file_nodes() {
        let language = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| registry.resolve(ext))
            .map(|handle| handle.language_id);
        if let Some(language) = language {
            *files_by_language.entry(language).or_insert(0) += 1;
        }
    }

    let mut defines_edges = 0;
    let mut references_edges = 0;
    let mut imports_edges = 0;
    for edge in graph.inner().edge_weights() {
        match edge {
            EdgeKind::Defines => defines_edges += 1,
            EdgeKind::References => references_edges += 1,
            EdgeKind::Imports => imports_edges += 1,
        }
    }

    ProjectStats {
        file_count: graph.file_count(),
        symbol_count: graph.symbol_count(),
        files_by_language,
        symbols_by_kind: graph.symbols_by_kind(),
        defines_edges,
        references_edges,
        imports_edges,
    }
}
