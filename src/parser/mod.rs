//! File Extractor (C2): `extract(path, source) -> FileSymbols | none`.
//!
//! Resolves a grammar by extension, parses the buffer, runs the
//! definition and reference queries, and renders each definition's
//! signature. A grammar/query failure for one file is never fatal — the
//! caller gets `None` (or fewer symbols than expected) and indexing
//! continues with the next file (spec §4.1/§7).

pub mod kind;
pub mod signature;

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tree_sitter::{Parser, QueryCursor, StreamingIterator};

use crate::graph::node::SymbolKind;
use crate::language::{GrammarRegistry, LanguageId};

/// One extracted declaration (spec §3's `Definition`).
#[derive(Debug, Clone)]
pub struct Definition {
    pub name: String,
    pub kind: SymbolKind,
    pub file: PathBuf,
    pub line_start: usize,
    pub line_end: usize,
    pub signature: String,
}

/// One extracted mention of an identifier (spec §3's `Reference`).
#[derive(Debug, Clone)]
pub struct Reference {
    pub name: String,
    pub file: PathBuf,
    pub line: usize,
}

/// The per-file extraction output consumed by the graph builder.
#[derive(Debug, Clone, Default)]
pub struct FileSymbols {
    pub file: PathBuf,
    pub definitions: Vec<Definition>,
    pub references: Vec<Reference>,
}

thread_local! {
    static PARSERS: RefCell<HashMap<&'static str, Parser>> = RefCell::new(HashMap::new());
}

fn parse(language_id: LanguageId, language: &tree_sitter::Language, source: &[u8]) -> Option<tree_sitter::Tree> {
    PARSERS.with(|cell| {
        let mut parsers = cell.borrow_mut();
        if !parsers.contains_key(language_id.name()) {
            let mut p = Parser::new();
            if let Err(err) = p.set_language(language) {
                // A grammar/query failure for one file is never fatal
                // (spec §4.1) — warn and let the caller treat this file as
                // unparseable rather than panicking the whole extraction.
                tracing::warn!(language = language_id.name(), error = %err, "grammar language version mismatch, skipping file");
                return None;
            }
            parsers.insert(language_id.name(), p);
        }
        let parser = parsers.get_mut(language_id.name())?;
        parser.parse(source, None)
    })
}

/// Extract definitions and references from one file. Returns `None` when
/// the extension has no registered grammar or tree-sitter fails to produce
/// a tree at all; a query that compiles but matches nothing still yields
/// `Some` with empty vectors (spec B1: empty file -> zero symbols, not an
/// error).
pub fn extract(path: &Path, source: &[u8]) -> Option<FileSymbols> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    let handle = GrammarRegistry::global().resolve(ext)?;

    let tree = match parse(handle.language_id, &handle.language, source) {
        Some(tree) => tree,
        None => {
            tracing::debug!(path = %path.display(), "tree-sitter returned no tree");
            return None;
        }
    };

    let definitions = extract_definitions(&handle, &tree, source, path);
    let references = extract_references(&handle, &tree, source, path);

    Some(FileSymbols {
        file: path.to_path_buf(),
        definitions,
        references,
    })
}

/// Parallel fan-out over many files — the file-parsing hotspot spec §5
/// calls out as the only parallelizable stage. `reader` loads one file's
/// bytes; an I/O failure for a single path is logged and skipped, never
/// fatal to the batch.
pub fn extract_many<F>(paths: &[PathBuf], reader: F) -> Vec<FileSymbols>
where
    F: Fn(&Path) -> std::io::Result<Vec<u8>> + Sync,
{
    paths
        .par_iter()
        .filter_map(|path| match reader(path) {
            Ok(source) => extract(path, &source),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "failed to read file, skipping");
                None
            }
        })
        .collect()
}

fn extract_definitions(
    handle: &crate::language::GrammarHandle,
    tree: &tree_sitter::Tree,
    source: &[u8],
    path: &Path,
) -> Vec<Definition> {
    let query = &handle.def_query;
    let Some(name_idx) = query.capture_index_for_name("name") else {
        return Vec::new();
    };
    let definition_idx = query.capture_index_for_name("definition");

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source);

    let mut out = Vec::new();
    while let Some(m) = matches.next() {
        let mut name_node = None;
        let mut definition_node = None;
        for capture in m.captures {
            if capture.index == name_idx {
                name_node = Some(capture.node);
            } else if Some(capture.index) == definition_idx {
                definition_node = Some(capture.node);
            }
        }
        let Some(name_node) = name_node else { continue };
        // Falls back to the name node when the pattern has no @definition
        // capture (spec §4.2).
        let def_node = definition_node.unwrap_or(name_node);

        let Ok(name) = name_node.utf8_text(source) else { continue };
        let Ok(def_text) = def_node.utf8_text(source) else { continue };

        let line_start = def_node.start_position().row + 1;
        let line_end = def_node.end_position().row + 1;
        let symbol_kind = kind::symbol_kind(handle.language_id, def_node.kind());
        let signature = signature::extract(def_text, handle.language_id.is_indentation_defined());

        out.push(Definition {
            name: name.to_string(),
            kind: symbol_kind,
            file: path.to_path_buf(),
            line_start,
            line_end,
            signature,
        });
    }
    out
}

fn extract_references(
    handle: &crate::language::GrammarHandle,
    tree: &tree_sitter::Tree,
    source: &[u8],
    path: &Path,
) -> Vec<Reference> {
    let query = &handle.ref_query;
    let Some(name_idx) = query.capture_index_for_name("name") else {
        return Vec::new();
    };

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source);

    let mut out = Vec::new();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            if capture.index != name_idx {
                continue;
            }
            let Ok(name) = capture.node.utf8_text(source) else { continue };
            out.push(Reference {
                name: name.to_string(),
                file: path.to_path_buf(),
                line: capture.node.start_position().row + 1,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_rust_function_definition() {
        let src = b"fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n";
        let result = extract(Path::new("lib.rs"), src).expect("rust grammar is registered");
        assert_eq!(result.definitions.len(), 1);
        let def = &result.definitions[0];
        assert_eq!(def.name, "add");
        assert_eq!(def.kind, SymbolKind::Function);
        assert_eq!(def.line_start, 1);
        assert_eq!(def.line_end, 3);
        assert!(def.signature.starts_with("fn add(a: i32, b: i32) -> i32"));
    }

    #[test]
    fn extracts_rust_call_reference() {
        let src = b"fn add(a: i32, b: i32) -> i32 { a + b }\nfn main() { add(1, 2); }\n";
        let result = extract(Path::new("lib.rs"), src).unwrap();
        assert!(result.references.iter().any(|r| r.name == "add" && r.line == 2));
    }

    #[test]
    fn empty_file_has_no_symbols() {
        let result = extract(Path::new("empty.rs"), b"").unwrap();
        assert!(result.definitions.is_empty());
        assert!(result.references.is_empty());
    }

    #[test]
    fn unsupported_extension_returns_none() {
        assert!(extract(Path::new("data.txt"), b"hello").is_none());
    }

    #[test]
    fn extracts_python_function_with_colon_signature() {
        let src = b"def add(a, b):\n    return a + b\n";
        let result = extract(Path::new("m.py"), src).unwrap();
        assert_eq!(result.definitions.len(), 1);
        assert_eq!(result.definitions[0].signature, "def add(a, b)");
    }
}
