//! `trace`: walk upward through the call graph from a symbol, reporting
//! the containing definition at each caller site (spec §4.6).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use petgraph::Direction;
use regex::Regex;

use crate::graph::edge::EdgeKind;
use crate::index::CodeIndex;

#[derive(Debug, Clone)]
pub struct TraceNode {
    /// `None` for the synthetic `<module>` node used when no containing
    /// definition could be located in a caller file.
    pub name: Option<String>,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub children: Vec<TraceNode>,
}

pub fn trace<F>(index: &CodeIndex, name: &str, file: Option<&Path>, depth: usize, read: F) -> Vec<TraceNode>
where
    F: Fn(&Path) -> std::io::Result<String> + Copy,
{
    let mut visited = HashSet::new();
    walk(index, name, file, depth, &read, &mut visited)
}

fn walk<F>(
    index: &CodeIndex,
    name: &str,
    file: Option<&Path>,
    remaining_depth: usize,
    read: &F,
    visited: &mut HashSet<(PathBuf, String)>,
) -> Vec<TraceNode>
where
    F: Fn(&Path) -> std::io::Result<String> + Copy,
{
    let targets = crate::query::candidates_named(index.graph(), name, file);
    if targets.is_empty() || remaining_depth == 0 {
        return Vec::new();
    }

    let call_regex = Regex::new(&format!(r"\b{}\s*\(", regex::escape(name))).ok();

    let mut caller_files: Vec<PathBuf> = Vec::new();
    for &target in &targets {
        for file_idx in index.graph().edges_of_kind(target, Direction::Incoming, EdgeKind::References) {
            if let Some(info) = index.graph().node(file_idx).and_then(|n| n.as_file()) {
                if !caller_files.iter().any(|f| f == &info.path) {
                    caller_files.push(info.path.clone());
                }
            }
        }
    }

    let mut nodes = Vec::new();
    for caller_file in caller_files {
        let Ok(source) = read(&caller_file) else { continue };
        let lines: Vec<&str> = source.lines().collect();
        let call_line = call_regex.as_ref().and_then(|re| {
            lines.iter().enumerate().find_map(|(i, l)| re.is_match(l).then_some(i + 1))
        });

        let Some(call_line) = call_line else {
            // No textual call site found in this file; emit a synthetic
            // module node rather than dropping the caller silently.
            nodes.push(TraceNode { name: None, file: caller_file, line: None, children: Vec::new() });
            continue;
        };

        let containing = innermost_definition(index, &caller_file, call_line);

        match containing {
            Some((def_name, def_line)) => {
                let key = (caller_file.clone(), def_name.clone());
                if !visited.insert(key) {
                    nodes.push(TraceNode { name: Some(def_name), file: caller_file, line: Some(def_line), children: Vec::new() });
                    continue;
                }
                let children = walk(index, &def_name, Some(caller_file.as_path()), remaining_depth - 1, read, visited);
                nodes.push(TraceNode { name: Some(def_name), file: caller_file, line: Some(def_line), children });
            }
            None => {
                nodes.push(TraceNode { name: None, file: caller_file, line: Some(call_line), children: Vec::new() });
            }
        }
    }
    nodes
}

/// Find the innermost definition in `file` whose `[lineStart, lineEnd]`
/// contains `line` — the narrowest enclosing range wins (spec §4.6/§9).
fn innermost_definition(index: &CodeIndex, file: &Path, line: usize) -> Option<(String, usize)> {
    let graph = index.graph();
    graph
        .symbol_nodes()
        .filter_map(|idx| graph.node(idx).and_then(|n| n.as_symbol()))
        .filter(|s| s.file == file && s.line_start <= line && line <= s.line_end)
        .min_by_key(|s| s.line_end - s.line_start)
        .map(|s| (s.name.clone(), s.line_start))
}
