//! `orphans`: files with no `IMPORTS` edges, or symbols referenced only
//! from their own file, after false-positive filtering (spec §4.6/§6).

use std::path::{Path, PathBuf};

use petgraph::Direction;

use crate::graph::edge::EdgeKind;
use crate::graph::node::SymbolKind;
use crate::index::CodeIndex;
use crate::language::LanguageId;
use crate::query::PageParams;

/// File stems excluded as likely entry points / config, never orphans
/// even with zero `IMPORTS` edges (spec §6).
const EXCLUDED_FILE_STEMS: &[&str] = &[
    "index", "main", "app", "server", "cli", "mod", "lib", "manage", "wsgi", "asgi", "handler",
    "lambda", "__init__", "__main__", "config", "settings", "conf", "conftest", "setup", "gulpfile",
    "gruntfile", "makefile", "rakefile", "taskfile",
];

const TEST_DIR_SEGMENTS: &[&str] = &["test", "tests", "__tests__", "spec", "specs"];

/// Symbol names excluded as likely entry points / lifecycle hooks, never
/// orphans even with no external `REFERENCES` (spec §6).
const EXCLUDED_SYMBOL_NAMES: &[&str] = &[
    "main", "run", "start", "serve", "handler", "execute", "app", "setup", "teardown", "setUp",
    "tearDown", "beforeAll", "afterAll", "beforeEach", "afterEach", "before", "after", "constructor",
    "init", "initialize", "configure", "register", "middleware", "plugin", "default", "module",
    "exports",
];

fn is_false_positive_file(path: &Path) -> bool {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    if path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.starts_with('.')) {
        return true;
    }
    if path.to_string_lossy().ends_with(".d.ts") {
        return true;
    }
    if EXCLUDED_FILE_STEMS.contains(&stem) {
        return true;
    }
    if stem.ends_with(".config") || stem.ends_with(".rc") {
        return true;
    }
    if path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|s| TEST_DIR_SEGMENTS.contains(&s))
    }) {
        return true;
    }
    if stem.starts_with("test_") || stem.starts_with("test.") {
        return true;
    }
    if stem.ends_with(".test") || stem.ends_with(".spec") || stem.ends_with("_test") || stem.ends_with("_spec") {
        return true;
    }
    false
}

fn is_false_positive_symbol(name: &str, file: &Path, signature: &str) -> bool {
    if EXCLUDED_SYMBOL_NAMES.contains(&name) {
        return true;
    }
    if name.len() <= 2 {
        return true;
    }
    if name.starts_with("__") && name.ends_with("__") {
        return true;
    }
    if file.file_stem().and_then(|s| s.to_str()) == Some(name) {
        return true;
    }
    looks_like_method(signature, language_of(file))
}

fn language_of(file: &Path) -> Option<LanguageId> {
    file.extension().and_then(|e| e.to_str()).and_then(LanguageId::from_extension)
}

/// Heuristic: no `function` keyword in a brace-language signature, or a
/// `self`/`cls` first parameter in an indentation-language signature —
/// either way a strong signal the definition is a method, not a free
/// orphan-able function (spec §6).
fn looks_like_method(signature: &str, language: Option<LanguageId>) -> bool {
    let Some(paren_start) = signature.find('(') else {
        return false;
    };
    if let Some(after) = signature.get(paren_start + 1..) {
        let first_param = after.split(&[',', ')'][..]).next().unwrap_or("").trim();
        if first_param == "self" || first_param == "cls" {
            return true;
        }
    }

    // Brace-language half: a signature with no free-function keyword reads
    // as a method (e.g. TS/JS class method shorthand `doThing() {`, vs. a
    // free `function doThing() {}`). Skip languages where methods and free
    // functions are spelled with the *same* keyword (`fn`/`func`/`fun`) —
    // there, "keyword absent" would never distinguish the two and checking
    // for it would just flag every definition as a method.
    match language {
        None => false,
        Some(lang) if lang.is_indentation_defined() => false,
        Some(LanguageId::Rust | LanguageId::Go | LanguageId::Kotlin) => false,
        Some(_) => !signature.contains("function"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanLevel {
    File,
    Symbol,
}

#[derive(Debug, Clone)]
pub struct OrphanFile {
    pub file: PathBuf,
    pub symbol_count: usize,
}

#[derive(Debug, Clone)]
pub struct OrphanSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub file: PathBuf,
    pub line_start: usize,
}

#[derive(Debug, Clone, Default)]
pub struct OrphansResult {
    pub files: Vec<OrphanFile>,
    pub symbols: Vec<OrphanSymbol>,
    pub total: usize,
}

pub fn orphans(index: &CodeIndex, level: OrphanLevel, kind: Option<SymbolKind>, page: &PageParams) -> OrphansResult {
    let graph = index.graph();
    match level {
        OrphanLevel::File => {
            let mut files: Vec<OrphanFile> = graph
                .file_nodes()
                .filter(|(path, idx)| {
                    !is_false_positive_file(path)
                        && graph.edges_of_kind(*idx, Direction::Outgoing, EdgeKind::Imports).next().is_none()
                        && graph.edges_of_kind(*idx, Direction::Incoming, EdgeKind::Imports).next().is_none()
                })
                .filter_map(|(path, idx)| {
                    graph.node(idx).and_then(|n| n.as_file()).map(|f| OrphanFile {
                        file: path,
                        symbol_count: f.symbol_count,
                    })
                })
                .collect();
            files.sort_by(|a, b| b.symbol_count.cmp(&a.symbol_count).then_with(|| a.file.cmp(&b.file)));
            let (files, total) = page.apply(files);
            OrphansResult { files, symbols: Vec::new(), total }
        }
        OrphanLevel::Symbol => {
            let mut symbols: Vec<OrphanSymbol> = graph
                .symbol_nodes()
                .filter_map(|idx| {
                    let symbol = graph.node(idx)?.as_symbol()?;
                    if let Some(want) = kind {
                        if symbol.kind != want {
                            return None;
                        }
                    }
                    if is_false_positive_file(&symbol.file) || is_false_positive_symbol(&symbol.name, &symbol.file, &symbol.signature) {
                        return None;
                    }
                    let only_self_refs = graph
                        .edges_of_kind(idx, Direction::Incoming, EdgeKind::References)
                        .all(|file_idx| graph.node(file_idx).and_then(|n| n.as_file()).is_some_and(|f| f.path == symbol.file));
                    if !only_self_refs {
                        return None;
                    }
                    Some(OrphanSymbol { name: symbol.name.clone(), kind: symbol.kind, file: symbol.file.clone(), line_start: symbol.line_start })
                })
                .collect();
            symbols.sort_by(|a, b| a.file.cmp(&b.file).then_with(|| a.line_start.cmp(&b.line_start)));
            let (symbols, total) = page.apply(symbols);
            OrphansResult { files: Vec::new(), symbols, total }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::SymbolInfo;
    use crate::graph::CodeGraph;

    fn sym(file: &str, name: &str) -> SymbolInfo {
        SymbolInfo {
            name: name.into(),
            kind: SymbolKind::Function,
            file: file.into(),
            line_start: 1,
            line_end: 1,
            signature: format!("function {name}()"),
        }
    }

    #[test]
    fn file_with_no_imports_edges_is_an_orphan() {
        let mut graph = CodeGraph::new();
        graph.upsert_file(Path::new("widget.rs"));
        let index = CodeIndex::from_graph_for_test(graph);
        let result = orphans(&index, OrphanLevel::File, None, &PageParams::default());
        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn main_stem_is_excluded_even_without_imports() {
        let mut graph = CodeGraph::new();
        graph.upsert_file(Path::new("main.rs"));
        let index = CodeIndex::from_graph_for_test(graph);
        let result = orphans(&index, OrphanLevel::File, None, &PageParams::default());
        assert!(result.files.is_empty());
    }

    #[test]
    fn symbol_referenced_only_from_own_file_is_an_orphan() {
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(Path::new("a.rs"));
        let f = graph.upsert_symbol(a, sym("a.rs", "helper"));
        graph.add_reference_edge(a, f);
        let index = CodeIndex::from_graph_for_test(graph);
        let result = orphans(&index, OrphanLevel::Symbol, None, &PageParams::default());
        assert!(result.symbols.iter().any(|s| s.name == "helper"));
    }

    #[test]
    fn ts_class_method_is_filtered_as_a_false_positive() {
        // A brace-language method (no `function` keyword) referenced only
        // within its own file must not be reported: the engine never
        // resolves `obj.method(...)` calls, so every genuine method would
        // otherwise look like an orphan (spec §6).
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(Path::new("widget.ts"));
        let f = graph.upsert_symbol(
            a,
            SymbolInfo {
                name: "doThing".into(),
                kind: SymbolKind::Function,
                file: "widget.ts".into(),
                line_start: 1,
                line_end: 1,
                signature: "doThing()".into(),
            },
        );
        graph.add_reference_edge(a, f);
        let index = CodeIndex::from_graph_for_test(graph);
        let result = orphans(&index, OrphanLevel::Symbol, None, &PageParams::default());
        assert!(!result.symbols.iter().any(|s| s.name == "doThing"));
    }

    #[test]
    fn ts_free_function_with_no_external_refs_is_still_an_orphan() {
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(Path::new("widget.ts"));
        let f = graph.upsert_symbol(
            a,
            SymbolInfo {
                name: "computeThing".into(),
                kind: SymbolKind::Function,
                file: "widget.ts".into(),
                line_start: 1,
                line_end: 1,
                signature: "function computeThing()".into(),
            },
        );
        graph.add_reference_edge(a, f);
        let index = CodeIndex::from_graph_for_test(graph);
        let result = orphans(&index, OrphanLevel::Symbol, None, &PageParams::default());
        assert!(result.symbols.iter().any(|s| s.name == "computeThing"));
    }

    #[test]
    fn rust_method_like_signature_is_not_suppressed_by_keyword_absence() {
        // Rust/Go/Kotlin spell methods and free functions with the same
        // keyword, so the brace "no function keyword" heuristic must not
        // apply to them (only the self/cls first-parameter check does).
        assert!(!looks_like_method("fn bar(&self)", Some(LanguageId::Rust)));
        assert!(!looks_like_method("func Bar()", Some(LanguageId::Go)));
    }

    #[test]
    fn java_method_without_keyword_is_filtered() {
        assert!(looks_like_method("public int getValue()", Some(LanguageId::Java)));
    }

    #[test]
    fn symbol_with_external_reference_is_not_an_orphan() {
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(Path::new("a.rs"));
        let b = graph.upsert_file(Path::new("b.rs"));
        let f = graph.upsert_symbol(a, sym("a.rs", "helper"));
        graph.add_reference_edge(b, f);
        let index = CodeIndex::from_graph_for_test(graph);
        let result = orphans(&index, OrphanLevel::Symbol, None, &PageParams::default());
        assert!(!result.symbols.iter().any(|s| s.name == "helper"));
    }
}
