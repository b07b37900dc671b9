use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// A structural code-indexing engine: parses a source tree into a
/// heterogeneous symbol graph and answers structural queries ranked by
/// PageRank.
#[derive(Parser, Debug)]
#[command(
    name = "structgraph",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    /// Project root to index and query.
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Report only the total result count, without the result list.
    #[arg(long, global = true)]
    pub count: bool,

    /// Number of leading results to skip.
    #[arg(long, global = true, default_value_t = 0)]
    pub offset: usize,

    /// Maximum number of results to return.
    #[arg(long, global = true)]
    pub limit: Option<usize>,

    /// Emit results as JSON instead of the default compact text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Symbol category filter, mirroring the closed `SymbolKind` set.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum SymbolKindArg {
    Function,
    Class,
    Type,
    Variable,
    Namespace,
    Other,
}

impl SymbolKindArg {
    pub fn to_domain(self) -> crate::graph::node::SymbolKind {
        use crate::graph::node::SymbolKind;
        match self {
            SymbolKindArg::Function => SymbolKind::Function,
            SymbolKindArg::Class => SymbolKind::Class,
            SymbolKindArg::Type => SymbolKind::Type,
            SymbolKindArg::Variable => SymbolKind::Variable,
            SymbolKindArg::Namespace => SymbolKind::Namespace,
            SymbolKindArg::Other => SymbolKind::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum OrphanLevelArg {
    #[default]
    File,
    Symbol,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// The repository's symbols in rank order, grouped by file.
    Map {
        /// Bias ranking toward these files (repeatable).
        #[arg(long = "focus")]
        focus: Vec<PathBuf>,
    },

    /// Case-insensitive substring match against symbol name or signature.
    Search {
        query: String,
        #[arg(long, value_enum)]
        kind: Option<SymbolKindArg>,
    },

    /// Enumerate symbol nodes with optional file/kind filters.
    Symbols {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, value_enum)]
        kind: Option<SymbolKindArg>,
    },

    /// Files that reference a named symbol, ranked by file-level PageRank.
    Callers {
        symbol: String,
        #[arg(long)]
        file: Option<PathBuf>,
        /// Lines of surrounding context per call site (0 disables).
        #[arg(long, default_value_t = 0)]
        context: usize,
    },

    /// Outgoing IMPORTS neighbors of a file.
    Deps { file: PathBuf },

    /// Incoming IMPORTS neighbors of a file.
    Dependents { file: PathBuf },

    /// The BFS-reachable file neighborhood of a file on IMPORTS edges.
    Neighborhood {
        file: PathBuf,
        #[arg(long, default_value_t = 2)]
        hops: usize,
        #[arg(long)]
        no_dependents: bool,
        #[arg(long, default_value_t = 15)]
        max_files: usize,
    },

    /// Files or symbols with no external references.
    Orphans {
        #[arg(long, value_enum, default_value_t = OrphanLevelArg::File)]
        level: OrphanLevelArg,
        #[arg(long, value_enum)]
        kind: Option<SymbolKindArg>,
    },

    /// Structured, per-directory overview of the whole repository's symbol
    /// map (the "structured" shape of `map`).
    Structure {
        #[arg(long = "focus")]
        focus: Vec<PathBuf>,
    },

    /// The full context of one symbol: source, used symbols, type
    /// previews, and external callers.
    Context {
        symbol: String,
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Walk upward through the call graph from a symbol.
    Trace {
        symbol: String,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, default_value_t = 3)]
        depth: usize,
    },

    /// Definitions added, removed, or signature-modified versus a base
    /// revision.
    Diff {
        #[arg(long, default_value = "HEAD")]
        base_ref: String,
    },

    /// Revision history of the lines spanning a symbol's definition.
    History {
        symbol: String,
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// One file's outline, with leaf-definition bodies collapsed.
    Outline {
        file: PathBuf,
        /// Print full text for these symbols instead of collapsing them.
        #[arg(long = "expand")]
        expand: Vec<String>,
    },

    /// Force a full rebuild, discarding the existing graph and cache.
    Reindex,

    /// Aggregate counts over the current graph: files by language, symbols
    /// by kind, edges by kind.
    Stats,

    /// A terse, human-facing summary of the project (stats plus the
    /// highest-ranked files) — a one-shot overview, not a live dashboard.
    Ui,
}
