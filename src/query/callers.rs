//! `callers`: files that reference a named symbol, ranked by file-level
//! PageRank, with optional call-site context lines (spec §4.6).

use std::path::{Path, PathBuf};

use petgraph::Direction;
use regex::Regex;

use crate::graph::edge::EdgeKind;
use crate::index::CodeIndex;
use crate::query::PageParams;

#[derive(Debug, Clone)]
pub struct CallSite {
    pub line: usize,
    pub context_start: usize,
    pub context_lines: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CallerFile {
    pub file: PathBuf,
    pub score: f64,
    pub call_sites: Vec<CallSite>,
}

#[derive(Debug, Clone, Default)]
pub struct CallersResult {
    pub callers: Vec<CallerFile>,
    pub total: usize,
}

/// `read` loads a caller file's source for context-line extraction; an I/O
/// failure just yields no call sites for that file rather than failing the
/// whole query (spec §7: a single bad file never poisons a query).
pub fn callers<F>(
    index: &mut CodeIndex,
    name: &str,
    file: Option<&Path>,
    context: usize,
    page: &PageParams,
    read: F,
) -> CallersResult
where
    F: Fn(&Path) -> std::io::Result<String>,
{
    let targets = crate::query::candidates_named(index.graph(), name, file);
    if targets.is_empty() {
        return CallersResult::default();
    }

    let own_ranges: Vec<(PathBuf, usize, usize)> = targets
        .iter()
        .filter_map(|&idx| {
            let sym = index.graph().node(idx)?.as_symbol()?;
            Some((sym.file.clone(), sym.line_start, sym.line_end))
        })
        .collect();

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

    let file_scores = index.file_scores(&[]);
    let mut scored: Vec<(PathBuf, f64)> = caller_files
        .into_iter()
        .map(|f| {
            let score = *file_scores.get(&f).unwrap_or(&0.0);
            (f, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let call_regex = Regex::new(&format!(r"\b{}\s*\(", regex::escape(name))).ok();
    let import_word = Regex::new(&format!(r"\b{}\b", regex::escape(name))).ok();

    let entries: Vec<CallerFile> = scored
        .into_iter()
        .map(|(file, score)| {
            let call_sites = if context > 0 {
                find_call_sites(&file, &read, call_regex.as_ref(), import_word.as_ref(), context, &own_ranges)
            } else {
                Vec::new()
            };
            CallerFile { file, score, call_sites }
        })
        .collect();

    let (callers, total) = page.apply(entries);
    CallersResult { callers, total }
}

fn find_call_sites<F>(
    file: &Path,
    read: &F,
    call_regex: Option<&Regex>,
    import_word: Option<&Regex>,
    context: usize,
    own_ranges: &[(PathBuf, usize, usize)],
) -> Vec<CallSite>
where
    F: Fn(&Path) -> std::io::Result<String>,
{
    let Ok(source) = read(file) else {
        return Vec::new();
    };
    let lines: Vec<&str> = source.lines().collect();

    let mut sites = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let line_no = i + 1;
        let is_call = call_regex.is_some_and(|re| re.is_match(line));
        let is_import_like = !is_call && import_word.is_some_and(|re| re.is_match(line));
        if !is_call && !is_import_like {
            continue;
        }
        if own_ranges
            .iter()
            .any(|(f, start, end)| f == file && line_no >= *start && line_no <= *end)
        {
            continue;
        }

        let start = line_no.saturating_sub(context).max(1);
        let end = (line_no + context).min(lines.len());
        let context_lines = lines[start - 1..end].iter().map(|s| s.to_string()).collect();
        sites.push(CallSite { line: line_no, context_start: start, context_lines });
    }
    sites
}
