//! Graph Builder (C4): merges `FileSymbols` records into the heterogeneous
//! graph and resolves references to definitions via the name index and the
//! disambiguation policy (spec §4.4).
//!
//! Cold build and incremental update share the same merge routine —
//! `merge` — so the two paths are guaranteed to produce identical graphs
//! on equivalent inputs (spec R1/I4: "the two paths must produce identical
//! final graphs").

use std::collections::HashMap;

use petgraph::stable_graph::NodeIndex;

use crate::graph::CodeGraph;
use crate::parser::FileSymbols;

/// Above this many same-named candidates (with no same-file winner), a
/// reference is too ambiguous to wire at all (spec §4.4).
pub const AMBIGUITY_CAP: usize = 5;

/// Build a fresh graph from a full set of `FileSymbols`.
pub fn cold_build(records: &[FileSymbols]) -> CodeGraph {
    let mut graph = CodeGraph::new();
    merge(&mut graph, records);
    graph
}

/// Apply an incremental update: drop every node belonging to a removed
/// path, then merge the new records using the same routine as a cold
/// build. `removed` and `added` may reference the same path (a changed
/// file is expressed as remove-then-re-add).
pub fn update(graph: &mut CodeGraph, removed: &[std::path::PathBuf], added: &[FileSymbols]) {
    for path in removed {
        graph.remove_file(path);
    }
    merge(graph, added);
}

/// Shared three/four-step merge: upsert file + symbol nodes for every
/// record, rebuild the name index over the *entire* current graph (surviving
/// nodes plus the newly added ones), then resolve every reference in every
/// record against that index.
fn merge(graph: &mut CodeGraph, records: &[FileSymbols]) {
    for record in records {
        let file_idx = graph.upsert_file(&record.file);
        for def in &record.definitions {
            graph.upsert_symbol(
                file_idx,
                crate::graph::node::SymbolInfo {
                    name: def.name.clone(),
                    kind: def.kind,
                    file: def.file.clone(),
                    line_start: def.line_start,
                    line_end: def.line_end,
                    signature: def.signature.clone(),
                },
            );
        }
        graph.set_symbol_count(file_idx, record.definitions.len());
    }

    // Name index is always rebuilt from current symbol nodes before
    // reference resolution (spec §3).
    let name_index = graph.name_index();

    for record in records {
        let Some(file_idx) = graph.file_index_of(&record.file) else {
            continue;
        };
        for reference in &record.references {
            let targets = resolve(graph, &name_index, reference);
            for target_idx in targets {
                graph.add_reference_edge(file_idx, target_idx);
                if let Some(target_file_idx) = owning_file(graph, target_idx) {
                    if target_file_idx != file_idx {
                        graph.add_imports_edge(file_idx, target_file_idx);
                    }
                }
            }
        }
    }
}

fn owning_file(graph: &CodeGraph, symbol_idx: NodeIndex) -> Option<NodeIndex> {
    let symbol = graph.node(symbol_idx)?.as_symbol()?;
    graph.file_index_of(&symbol.file)
}

/// The three-branch disambiguation policy: unique match wins outright;
/// otherwise same-file candidates suppress cross-file ones; otherwise an
/// over-ambiguous name (no same-file winner, more than `AMBIGUITY_CAP`
/// candidates) resolves to nothing; otherwise wire to every candidate.
fn resolve(
    graph: &CodeGraph,
    name_index: &HashMap<String, Vec<NodeIndex>>,
    reference: &crate::parser::Reference,
) -> Vec<NodeIndex> {
    let Some(candidates) = name_index.get(&reference.name) else {
        return Vec::new();
    };

    if candidates.len() == 1 {
        return candidates.clone();
    }

    let same_file: Vec<NodeIndex> = candidates
        .iter()
        .copied()
        .filter(|&idx| {
            graph
                .node(idx)
                .and_then(|n| n.as_symbol())
                .is_some_and(|s| s.file == reference.file)
        })
        .collect();
    if !same_file.is_empty() {
        return same_file;
    }

    if candidates.len() > AMBIGUITY_CAP {
        return Vec::new();
    }

    candidates.clone()
}
