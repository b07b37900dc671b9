pub mod edge;
pub mod node;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use petgraph::Directed;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use edge::EdgeKind;
use node::{FileInfo, GraphNode, SymbolInfo, SymbolKind, symbol_key};

/// The in-memory code graph: a `file`/`symbol` heterogeneous multigraph with
/// O(1) lookup indexes, matching the data model in full:
///
/// - node kinds `file` (id = relative path) and `symbol` (id =
///   `"<file>::<name>"`);
/// - edge kinds `DEFINES`, `REFERENCES`, `IMPORTS`, each at most once per
///   ordered node pair (`add_*_edge` enforce this — the underlying
///   `StableGraph` is a true multigraph and would not reject duplicates on
///   its own).
#[derive(Clone, Serialize, Deserialize)]
pub struct CodeGraph {
    graph: StableGraph<GraphNode, EdgeKind, Directed>,
    file_index: HashMap<PathBuf, NodeIndex>,
    /// Keyed by the `"<file>::<name>"` symbol key (§3's symbol node id).
    symbol_index: HashMap<String, NodeIndex>,
}

impl CodeGraph {
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            file_index: HashMap::new(),
            symbol_index: HashMap::new(),
        }
    }

    pub fn inner(&self) -> &StableGraph<GraphNode, EdgeKind, Directed> {
        &self.graph
    }

    // -- file nodes ----------------------------------------------------

    /// Upsert a `file` node for `path`. `symbolCount` is set to 0; callers
    /// update it via `set_symbol_count` once all of the file's definitions
    /// have been added (or it is recomputed from the live edge count).
    pub fn upsert_file(&mut self, path: &Path) -> NodeIndex {
        if let Some(&idx) = self.file_index.get(path) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode::File(FileInfo {
            path: path.to_path_buf(),
            symbol_count: 0,
        }));
        self.file_index.insert(path.to_path_buf(), idx);
        idx
    }

    pub fn file_index_of(&self, path: &Path) -> Option<NodeIndex> {
        self.file_index.get(path).copied()
    }

    pub fn set_symbol_count(&mut self, file_idx: NodeIndex, count: usize) {
        if let GraphNode::File(info) = &mut self.graph[file_idx] {
            info.symbol_count = count;
        }
    }

    /// Remove a file node and every symbol node it owns, along with all
    /// incident edges (invariant I4 / spec §3's node-removal rule).
    pub fn remove_file(&mut self, path: &Path) {
        let Some(file_idx) = self.file_index.remove(path) else {
            return;
        };

        let owned_symbols: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| {
                self.graph[idx]
                    .as_symbol()
                    .is_some_and(|s| s.file == path)
            })
            .collect();

        for sym_idx in owned_symbols {
            if let Some(GraphNode::Symbol(info)) = self.graph.node_weight(sym_idx) {
                self.symbol_index.remove(&info.key());
            }
            self.graph.remove_node(sym_idx);
        }

        self.graph.remove_node(file_idx);
    }

    // -- symbol nodes ----------------------------------------------------

    /// Upsert a `symbol` node keyed `"<file>::<name>"` and its `DEFINES`
    /// edge from the owning file (invariant I1: exactly one `DEFINES` edge
    /// per symbol). Returns the symbol's node index.
    pub fn upsert_symbol(&mut self, file_idx: NodeIndex, info: SymbolInfo) -> NodeIndex {
        let key = info.key();
        if let Some(&existing) = self.symbol_index.get(&key) {
            self.graph[existing] = GraphNode::Symbol(info);
            return existing;
        }
        let idx = self.graph.add_node(GraphNode::Symbol(info));
        self.graph.add_edge(file_idx, idx, EdgeKind::Defines);
        self.symbol_index.insert(key, idx);
        idx
    }

    pub fn symbol_index_of(&self, file: &Path, name: &str) -> Option<NodeIndex> {
        self.symbol_index.get(&symbol_key(file, name)).copied()
    }

    /// All symbol node indices sharing `name`, across every file.
    pub fn symbols_named(&self, name: &str) -> Vec<NodeIndex> {
        self.symbol_index
            .iter()
            .filter(|(key, _)| key.rsplit("::").next() == Some(name))
            .map(|(_, &idx)| idx)
            .collect()
    }

    // -- reference / import edges ---------------------------------------

    /// Add a `REFERENCES` edge (file -> symbol) if one doesn't already
    /// exist between this pair.
    pub fn add_reference_edge(&mut self, file_idx: NodeIndex, symbol_idx: NodeIndex) {
        if self.has_edge_kind(file_idx, symbol_idx, EdgeKind::References) {
            return;
        }
        self.graph.add_edge(file_idx, symbol_idx, EdgeKind::References);
    }

    /// Add an `IMPORTS` edge (file -> file) if one doesn't already exist
    /// between this pair. Self-loops are rejected (spec: "no `IMPORTS(F,F)`
    /// ever exists").
    pub fn add_imports_edge(&mut self, from_file: NodeIndex, to_file: NodeIndex) {
        if from_file == to_file {
            return;
        }
        if self.has_edge_kind(from_file, to_file, EdgeKind::Imports) {
            return;
        }
        self.graph.add_edge(from_file, to_file, EdgeKind::Imports);
    }

    fn has_edge_kind(&self, from: NodeIndex, to: NodeIndex, kind: EdgeKind) -> bool {
        self.graph
            .edges_connecting(from, to)
            .any(|e| *e.weight() == kind)
    }

    // -- traversal helpers ------------------------------------------------

    pub fn node(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.graph.node_weight(idx)
    }

    pub fn edges_of_kind(
        &self,
        idx: NodeIndex,
        dir: Direction,
        kind: EdgeKind,
    ) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .edges_directed(idx, dir)
            .filter(move |e| *e.weight() == kind)
            .map(move |e| if dir == Direction::Outgoing { e.target() } else { e.source() })
    }

    pub fn file_nodes(&self) -> impl Iterator<Item = (PathBuf, NodeIndex)> + '_ {
        self.file_index.iter().map(|(p, &i)| (p.clone(), i))
    }

    pub fn symbol_nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .node_indices()
            .filter(|&i| matches!(self.graph[i], GraphNode::Symbol(_)))
    }

    pub fn file_count(&self) -> usize {
        self.file_index.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn symbols_by_kind(&self) -> HashMap<SymbolKind, usize> {
        let mut map: HashMap<SymbolKind, usize> = HashMap::new();
        for idx in self.graph.node_indices() {
            if let GraphNode::Symbol(ref info) = self.graph[idx] {
                *map.entry(info.kind).or_insert(0) += 1;
            }
        }
        map
    }

    /// Rebuild `name -> [symbolKey]` over all current symbol nodes, used
    /// fresh by the builder before every reference-resolution pass (spec
    /// §3: "always rebuilt from current symbol nodes before reference
    /// resolution").
    pub fn name_index(&self) -> HashMap<String, Vec<NodeIndex>> {
        let mut index: HashMap<String, Vec<NodeIndex>> = HashMap::new();
        for idx in self.graph.node_indices() {
            if let GraphNode::Symbol(ref info) = self.graph[idx] {
                index.entry(info.name.clone()).or_default().push(idx);
            }
        }
        index
    }
}

impl Default for CodeGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::SymbolKind;

    fn sym(file: &Path, name: &str, kind: SymbolKind) -> SymbolInfo {
        SymbolInfo {
            name: name.to_string(),
            kind,
            file: file.to_path_buf(),
            line_start: 1,
            line_end: 1,
            signature: format!("fn {name}()"),
        }
    }

    #[test]
    fn upsert_file_is_idempotent() {
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(Path::new("a.rs"));
        let b = graph.upsert_file(Path::new("a.rs"));
        assert_eq!(a, b);
        assert_eq!(graph.file_count(), 1);
    }

    #[test]
    fn upsert_symbol_adds_single_defines_edge() {
        let mut graph = CodeGraph::new();
        let f = graph.upsert_file(Path::new("a.rs"));
        let s = graph.upsert_symbol(f, sym(Path::new("a.rs"), "foo", SymbolKind::Function));
        assert_eq!(graph.symbol_count(), 1);
        assert_eq!(
            graph.edges_of_kind(s, Direction::Incoming, EdgeKind::Defines).count(),
            1
        );
    }

    #[test]
    fn reference_edges_dedup_per_pair() {
        let mut graph = CodeGraph::new();
        let f = graph.upsert_file(Path::new("a.rs"));
        let s = graph.upsert_symbol(f, sym(Path::new("a.rs"), "foo", SymbolKind::Function));
        graph.add_reference_edge(f, s);
        graph.add_reference_edge(f, s);
        assert_eq!(graph.edge_count(), 2, "one Defines + one deduped References");
    }

    #[test]
    fn imports_edge_rejects_self_loop() {
        let mut graph = CodeGraph::new();
        let f = graph.upsert_file(Path::new("a.rs"));
        graph.add_imports_edge(f, f);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn imports_edges_dedup_per_pair() {
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(Path::new("a.rs"));
        let b = graph.upsert_file(Path::new("b.rs"));
        graph.add_imports_edge(a, b);
        graph.add_imports_edge(a, b);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn remove_file_drops_owned_symbols_and_edges() {
        let mut graph = CodeGraph::new();
        let a = graph.upsert_file(Path::new("a.rs"));
        let b = graph.upsert_file(Path::new("b.rs"));
        let foo = graph.upsert_symbol(a, sym(Path::new("a.rs"), "foo", SymbolKind::Function));
        graph.add_reference_edge(b, foo);
        graph.add_imports_edge(b, a);

        graph.remove_file(Path::new("a.rs"));

        assert_eq!(graph.file_count(), 1);
        assert_eq!(graph.symbol_count(), 0);
        assert!(graph.symbol_index_of(Path::new("a.rs"), "foo").is_none());
        assert!(graph.node(foo).is_none());
    }

    #[test]
    fn symbols_by_kind_counts_correctly() {
        let mut graph = CodeGraph::new();
        let f = graph.upsert_file(Path::new("m.rs"));
        graph.upsert_symbol(f, sym(Path::new("m.rs"), "a", SymbolKind::Function));
        graph.upsert_symbol(f, sym(Path::new("m.rs"), "b", SymbolKind::Function));
        graph.upsert_symbol(f, sym(Path::new("m.rs"), "C", SymbolKind::Class));
        let breakdown = graph.symbols_by_kind();
        assert_eq!(breakdown.get(&SymbolKind::Function), Some(&2));
        assert_eq!(breakdown.get(&SymbolKind::Class), Some(&1));
    }
}
