//! `context`: the full context of one symbol — its source, the other
//! symbols its body mentions, short previews of any capitalized
//! class/type tokens in its signature, and its external callers (spec
//! §4.6).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use petgraph::Direction;
use regex::Regex;

use crate::error::{IndexError, IndexResult};
use crate::graph::edge::EdgeKind;
use crate::graph::node::SymbolKind;
use crate::index::CodeIndex;

/// Generic identifiers that are never worth reporting as "used symbols" —
/// control-flow keywords and the handful of stdlib/builtin names common
/// enough across languages to be noise (spec §4.6/§9: "advisory" results).
const STOPWORDS: &[&str] = &[
    "if", "else", "for", "while", "return", "true", "false", "null", "nil", "none", "self", "this",
    "cls", "super", "new", "let", "const", "var", "fn", "def", "class", "struct", "enum", "impl",
    "match", "switch", "case", "break", "continue", "in", "of", "as", "is", "not", "and", "or",
    "try", "catch", "finally", "throw", "raise", "yield", "await", "async", "string", "int",
    "bool", "float", "void", "print", "println", "len", "push", "pop", "get", "set",
];

#[derive(Debug, Clone)]
pub struct UsedSymbol {
    pub name: String,
    pub file: PathBuf,
    pub line_start: usize,
    pub signature: String,
}

#[derive(Debug, Clone)]
pub struct TypePreview {
    pub name: String,
    pub file: PathBuf,
    pub lines: Vec<String>,
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct ContextResult {
    pub name: String,
    pub kind: SymbolKind,
    pub file: PathBuf,
    pub line_start: usize,
    pub line_end: usize,
    pub signature: String,
    pub source: Vec<String>,
    pub used_symbols: Vec<UsedSymbol>,
    pub type_previews: Vec<TypePreview>,
    pub external_callers: Vec<PathBuf>,
}

const PREVIEW_LINES: usize = 15;

pub fn context<F>(index: &CodeIndex, name: &str, file: Option<&Path>, read: F) -> IndexResult<ContextResult>
where
    F: Fn(&Path) -> std::io::Result<String>,
{
    let graph = index.graph();
    let candidates = crate::query::candidates_named(graph, name, file);
    if candidates.is_empty() {
        return Err(IndexError::UnknownSymbol {
            name: name.to_string(),
            suggestions: crate::query::suggest_symbols(graph, name),
        });
    }

    let ranked = crate::rank::rank(graph, &[], index.config());
    let best = crate::query::best_by_rank(graph, &ranked, &candidates).expect("non-empty candidates");
    let symbol = graph.node(best).and_then(|n| n.as_symbol()).expect("symbol node");

    let source_lines: Vec<String> = read(&symbol.file)
        .map(|s| s.lines().map(|l| l.to_string()).collect())
        .unwrap_or_default();
    let body: Vec<String> = source_lines
        .iter()
        .enumerate()
        .filter(|(i, _)| *i + 1 >= symbol.line_start && *i + 1 <= symbol.line_end)
        .map(|(_, l)| l.clone())
        .collect();
    let body_text = body.join("\n");

    let word_re = Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\b").unwrap();
    let mut seen = HashSet::new();
    let mut used_symbols = Vec::new();
    for word in word_re.find_iter(&body_text).map(|m| m.as_str()) {
        if word == symbol.name.as_str() || word.len() <= 2 {
            continue;
        }
        if STOPWORDS.contains(&word.to_lowercase().as_str()) {
            continue;
        }
        if !seen.insert(word.to_string()) {
            continue;
        }
        let candidates = crate::query::candidates_named(graph, word, None);
        if candidates.is_empty() {
            continue;
        }
        let same_file = candidates
            .iter()
            .copied()
            .find(|&idx| graph.node(idx).and_then(|n| n.as_symbol()).is_some_and(|s| s.file == symbol.file));
        let chosen = same_file.or_else(|| crate::query::best_by_rank(graph, &ranked, &candidates));
        if let Some(idx) = chosen {
            if let Some(s) = graph.node(idx).and_then(|n| n.as_symbol()) {
                used_symbols.push(UsedSymbol {
                    name: s.name.clone(),
                    file: s.file.clone(),
                    line_start: s.line_start,
                    signature: s.signature.clone(),
                });
            }
        }
    }

    let cap_re = Regex::new(r"\b[A-Z][A-Za-z0-9_]*\b").unwrap();
    let mut preview_seen = HashSet::new();
    let mut type_previews = Vec::new();
    for token in cap_re.find_iter(&symbol.signature).map(|m| m.as_str()) {
        if !preview_seen.insert(token.to_string()) {
            continue;
        }
        let candidates: Vec<_> = crate::query::candidates_named(graph, token, None)
            .into_iter()
            .filter(|&idx| {
                graph
                    .node(idx)
                    .and_then(|n| n.as_symbol())
                    .is_some_and(|s| matches!(s.kind, SymbolKind::Class | SymbolKind::Type))
            })
            .collect();
        let Some(chosen) = crate::query::best_by_rank(graph, &ranked, &candidates) else { continue };
        let Some(s) = graph.node(chosen).and_then(|n| n.as_symbol()) else { continue };
        let Ok(src) = read(&s.file) else { continue };
        let all_lines: Vec<&str> = src.lines().collect();
        let body_range = s.line_start.saturating_sub(1)..s.line_end.min(all_lines.len());
        let full_len = body_range.len();
        let preview: Vec<String> = all_lines[body_range].iter().take(PREVIEW_LINES).map(|l| l.to_string()).collect();
        type_previews.push(TypePreview {
            name: s.name.clone(),
            file: s.file.clone(),
            truncated: full_len > PREVIEW_LINES,
            lines: preview,
        });
    }

    let mut external_callers: Vec<PathBuf> = Vec::new();
    for &idx in &candidates {
        let Some(owner) = graph.node(idx).and_then(|n| n.as_symbol()).map(|s| s.file.clone()) else { continue };
        for caller_idx in graph.edges_of_kind(idx, Direction::Incoming, EdgeKind::References) {
            if let Some(info) = graph.node(caller_idx).and_then(|n| n.as_file()) {
                if info.path != owner && !external_callers.contains(&info.path) {
                    external_callers.push(info.path.clone());
                }
            }
        }
    }

    Ok(ContextResult {
        name: symbol.name.clone(),
        kind: symbol.kind,
        file: symbol.file.clone(),
        line_start: symbol.line_start,
        line_end: symbol.line_end,
        signature: symbol.signature.clone(),
        source: body,
        used_symbols,
        type_previews,
        external_callers,
    })
}
