use serde::{Deserialize, Serialize};

/// The three edge kinds of the heterogeneous graph.
///
/// At most one edge of a given kind exists between any ordered node pair —
/// enforced by `CodeGraph`'s `add_*_edge` methods, not by the underlying
/// `StableGraph` (which is a true multigraph and would otherwise happily
/// accept duplicates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// File -> Symbol: the file declares this symbol. Every symbol node has
    /// exactly one incoming edge of this kind.
    Defines,
    /// File -> Symbol: some reference in the source file resolved to this
    /// symbol (same file or another).
    References,
    /// File -> File: some reference in the source file resolved to a symbol
    /// owned by the target file. Never a self-loop.
    Imports,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Defines => "DEFINES",
            EdgeKind::References => "REFERENCES",
            EdgeKind::Imports => "IMPORTS",
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
