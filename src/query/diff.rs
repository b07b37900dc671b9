//! `diff`: for every file changed versus a base revision, the definitions
//! added, removed, or signature-modified, with external caller counts for
//! anything that disappeared or changed (spec §4.6).

use std::collections::HashMap;
use std::path::PathBuf;

use petgraph::Direction;

use crate::error::IndexResult;
use crate::graph::edge::EdgeKind;
use crate::graph::node::SymbolKind;
use crate::index::CodeIndex;
use crate::parser::{self, Definition};
use crate::vcs;

#[derive(Debug, Clone)]
pub struct DiffAddition {
    pub name: String,
    pub kind: SymbolKind,
    pub signature: String,
}

#[derive(Debug, Clone)]
pub struct DiffRemoval {
    pub name: String,
    pub kind: SymbolKind,
    pub signature: String,
    pub caller_count: usize,
}

#[derive(Debug, Clone)]
pub struct DiffModification {
    pub name: String,
    pub kind: SymbolKind,
    pub old_signature: String,
    pub new_signature: String,
    pub caller_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DiffFile {
    pub file: PathBuf,
    pub added: Vec<DiffAddition>,
    pub removed: Vec<DiffRemoval>,
    pub modified: Vec<DiffModification>,
}

impl DiffFile {
    fn max_caller_count(&self) -> usize {
        self.removed
            .iter()
            .map(|r| r.caller_count)
            .chain(self.modified.iter().map(|m| m.caller_count))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    pub changed: Vec<DiffFile>,
    pub total_callers: usize,
}

/// `read_working` loads the current on-disk bytes of a changed file;
/// `git show <base_ref>:<file>` supplies the committed side (spec §4.6/§6).
pub fn diff<F>(index: &CodeIndex, base_ref: &str, read_working: F) -> IndexResult<DiffResult>
where
    F: Fn(&std::path::Path) -> std::io::Result<Vec<u8>>,
{
    let mut files = vcs::changed_files(index.root(), base_ref)?;
    for untracked in vcs::untracked_files(index.root())? {
        if !files.contains(&untracked) {
            files.push(untracked);
        }
    }

    let graph = index.graph();
    let mut changed = Vec::new();
    let mut total_callers = 0usize;

    for file in files {
        let current_defs = read_working(&file)
            .ok()
            .and_then(|bytes| parser::extract(&file, &bytes))
            .map(|fs| fs.definitions)
            .unwrap_or_default();

        let committed_defs = vcs::show_file(index.root(), base_ref, &file)
            .ok()
            .and_then(|bytes| parser::extract(&file, &bytes))
            .map(|fs| fs.definitions)
            .unwrap_or_default();

        let current_by_name: HashMap<&str, &Definition> =
            current_defs.iter().map(|d| (d.name.as_str(), d)).collect();
        let committed_by_name: HashMap<&str, &Definition> =
            committed_defs.iter().map(|d| (d.name.as_str(), d)).collect();

        let mut entry = DiffFile { file: file.clone(), ..Default::default() };

        for def in &current_defs {
            if !committed_by_name.contains_key(def.name.as_str()) {
                entry.added.push(DiffAddition {
                    name: def.name.clone(),
                    kind: def.kind,
                    signature: def.signature.clone(),
                });
            }
        }

        for def in &committed_defs {
            match current_by_name.get(def.name.as_str()) {
                None => {
                    let caller_count = external_caller_count(graph, &file, &def.name);
                    entry.removed.push(DiffRemoval {
                        name: def.name.clone(),
                        kind: def.kind,
                        signature: def.signature.clone(),
                        caller_count,
                    });
                }
                Some(current) if current.signature != def.signature => {
                    let caller_count = external_caller_count(graph, &file, &def.name);
                    entry.modified.push(DiffModification {
                        name: def.name.clone(),
                        kind: def.kind,
                        old_signature: def.signature.clone(),
                        new_signature: current.signature.clone(),
                        caller_count,
                    });
                }
                Some(_) => {}
            }
        }

        if entry.added.is_empty() && entry.removed.is_empty() && entry.modified.is_empty() {
            continue;
        }

        total_callers += entry.max_caller_count();
        changed.push(entry);
    }

    changed.sort_by(|a, b| b.max_caller_count().cmp(&a.max_caller_count()).then_with(|| a.file.cmp(&b.file)));

    Ok(DiffResult { changed, total_callers })
}

/// Count of distinct files referencing `name` (as defined in `owner`) that
/// are not `owner` itself — the "external caller count" spec §4.6 ranks
/// removed/modified definitions by.
fn external_caller_count(graph: &crate::graph::CodeGraph, owner: &std::path::Path, name: &str) -> usize {
    let mut count = 0;
    for idx in graph.symbols_named(name) {
        let Some(symbol) = graph.node(idx).and_then(|n| n.as_symbol()) else { continue };
        if symbol.file != owner {
            continue;
        }
        for caller in graph.edges_of_kind(idx, Direction::Incoming, EdgeKind::References) {
            if let Some(info) = graph.node(caller).and_then(|n| n.as_file()) {
                if info.path != *owner {
                    count += 1;
                }
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::SymbolInfo;
    use std::path::Path;

    #[test]
    fn external_caller_count_excludes_owning_file() {
        let mut graph = crate::graph::CodeGraph::new();
        let a = graph.upsert_file(Path::new("a.rs"));
        let b = graph.upsert_file(Path::new("b.rs"));
        let foo = graph.upsert_symbol(
            a,
            SymbolInfo {
                name: "foo".into(),
                kind: SymbolKind::Function,
                file: "a.rs".into(),
                line_start: 1,
                line_end: 1,
                signature: "fn foo()".into(),
            },
        );
        graph.add_reference_edge(a, foo);
        graph.add_reference_edge(b, foo);

        assert_eq!(external_caller_count(&graph, Path::new("a.rs"), "foo"), 1);
    }
}
