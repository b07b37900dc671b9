use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Closed set of symbol categories. Every language's richer native
/// distinctions (interface, trait, enum, type alias, struct, ...) collapse
/// into one of these six via a fixed per-language mapping in
/// `crate::parser::kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Function,
    Class,
    Type,
    Variable,
    Namespace,
    Other,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
            SymbolKind::Type => "type",
            SymbolKind::Variable => "variable",
            SymbolKind::Namespace => "namespace",
            SymbolKind::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<SymbolKind> {
        Some(match s {
            "function" => SymbolKind::Function,
            "class" => SymbolKind::Class,
            "type" => SymbolKind::Type,
            "variable" => SymbolKind::Variable,
            "namespace" => SymbolKind::Namespace,
            "other" => SymbolKind::Other,
            _ => return None,
        })
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `file` node. Id is the project-relative path; the only attribute is
/// the number of definitions the file owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: PathBuf,
    pub symbol_count: usize,
}

/// A `symbol` node. Id is `"<file>::<name>"`, built by `symbol_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,
    pub file: PathBuf,
    pub line_start: usize,
    pub line_end: usize,
    pub signature: String,
}

impl SymbolInfo {
    pub fn key(&self) -> String {
        symbol_key(&self.file, &self.name)
    }
}

/// Build the `"<file>::<name>"` symbol key used for the graph's symbol index.
pub fn symbol_key(file: &std::path::Path, name: &str) -> String {
    format!("{}::{}", file.display(), name)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GraphNode {
    File(FileInfo),
    Symbol(SymbolInfo),
}

impl GraphNode {
    pub fn as_file(&self) -> Option<&FileInfo> {
        match self {
            GraphNode::File(f) => Some(f),
            GraphNode::Symbol(_) => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&SymbolInfo> {
        match self {
            GraphNode::Symbol(s) => Some(s),
            GraphNode::File(_) => None,
        }
    }
}
