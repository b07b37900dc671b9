mod builder;
mod cache;
mod cli;
mod config;
mod error;
mod graph;
mod index;
mod language;
mod outline;
mod parser;
mod query;
mod rank;
mod vcs;
mod walker;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;

use cli::{Cli, Commands, OrphanLevelArg};
use error::IndexError;
use graph::node::SymbolKind;
use index::CodeIndex;
use query::PageParams;
use query::orphans::OrphanLevel;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut index = CodeIndex::open(&cli.root);
    index.ensure()?;

    let page = PageParams {
        offset: cli.offset,
        limit: cli.limit,
        count: cli.count,
    };
    let json_out = cli.json;

    match cli.command {
        Commands::Map { focus } => run_map(&mut index, &focus, &page, json_out),
        Commands::Search { query, kind } => {
            run_search(&mut index, &query, kind.map(|k| k.to_domain()), &page, json_out)
        }
        Commands::Symbols { file, kind } => {
            let file = resolve_opt_file(&index, file.as_deref())?;
            run_symbols(&mut index, file.as_ref(), kind.map(|k| k.to_domain()), &page, json_out)
        }
        Commands::Callers { symbol, file, context } => {
            let file = resolve_opt_file(&index, file.as_deref())?;
            run_callers(&mut index, &symbol, file.as_deref(), context, &page, json_out)
        }
        Commands::Deps { file } => {
            let file = resolve_file(&index, &file)?;
            run_deps(&mut index, &file, &page, json_out, true)
        }
        Commands::Dependents { file } => {
            let file = resolve_file(&index, &file)?;
            run_deps(&mut index, &file, &page, json_out, false)
        }
        Commands::Neighborhood { file, hops, no_dependents, max_files } => {
            let file = resolve_file(&index, &file)?;
            run_neighborhood(&mut index, &file, hops, !no_dependents, max_files, page.count, json_out)
        }
        Commands::Orphans { level, kind } => {
            let level = match level {
                OrphanLevelArg::File => OrphanLevel::File,
                OrphanLevelArg::Symbol => OrphanLevel::Symbol,
            };
            run_orphans(&index, level, kind.map(|k| k.to_domain()), &page, json_out)
        }
        Commands::Structure { focus } => run_structure(&mut index, &focus, &page, json_out),
        Commands::Context { symbol, file } => {
            let file = resolve_opt_file(&index, file.as_deref())?;
            run_context(&index, &symbol, file.as_deref(), json_out)
        }
        Commands::Trace { symbol, file, depth } => {
            let file = resolve_opt_file(&index, file.as_deref())?;
            run_trace(&index, &symbol, file.as_deref(), depth, json_out)
        }
        Commands::Diff { base_ref } => run_diff(&index, &base_ref, json_out),
        Commands::History { symbol, file } => {
            let file = resolve_opt_file(&index, file.as_deref())?;
            run_history(&index, &symbol, file.as_deref(), &page, json_out)
        }
        Commands::Outline { file, expand } => {
            let file = resolve_file(&index, &file)?;
            run_outline(&index, &file, &expand, json_out)
        }
        Commands::Reindex => run_reindex(&mut index),
        Commands::Stats => run_stats(&index, json_out),
        Commands::Ui => run_ui(&mut index),
    }
}

fn resolve_file(index: &CodeIndex, given: &Path) -> Result<PathBuf, IndexError> {
    index::resolve_file(index.graph(), &given.display().to_string())
}

fn resolve_opt_file(index: &CodeIndex, given: Option<&Path>) -> Result<Option<PathBuf>, IndexError> {
    given.map(|p| resolve_file(index, p)).transpose()
}

fn read_to_string(path: &Path) -> std::io::Result<String> {
    fs::read_to_string(path)
}

fn read_to_bytes(path: &Path) -> std::io::Result<Vec<u8>> {
    fs::read(path)
}

// -- map / structure -----------------------------------------------------

fn run_map(index: &mut CodeIndex, focus: &[PathBuf], page: &PageParams, json_out: bool) -> anyhow::Result<()> {
    let result = query::map::map(index, focus, page);
    if json_out {
        let files: Vec<_> = result
            .files
            .iter()
            .map(|f| {
                json!({
                    "file": f.file.display().to_string(),
                    "symbols": f.symbols.iter().map(|s| json!({
                        "name": s.name,
                        "kind": s.kind.as_str(),
                        "lineStart": s.line_start,
                        "lineEnd": s.line_end,
                        "signature": s.signature,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!(
            "{}",
            json!({
                "files": files,
                "shownFiles": result.shown_files,
                "shownSymbols": result.shown_symbols,
                "totalFiles": result.total_files,
                "totalSymbols": result.total_symbols,
            })
        );
    } else if page.count {
        println!("{} symbols across {} files", result.total_symbols, result.total_files);
    } else {
        print!("{}", query::map::render_text(&result));
    }
    Ok(())
}

fn run_structure(index: &mut CodeIndex, focus: &[PathBuf], page: &PageParams, json_out: bool) -> anyhow::Result<()> {
    if json_out {
        return run_map(index, focus, page, true);
    }
    let result = query::map::map(index, focus, page);
    if page.count {
        println!("{} symbols across {} files", result.total_symbols, result.total_files);
        return Ok(());
    }
    let mut by_dir: std::collections::BTreeMap<PathBuf, Vec<&query::map::MapFile>> = std::collections::BTreeMap::new();
    for file in &result.files {
        let dir = file.file.parent().map(Path::to_path_buf).unwrap_or_default();
        by_dir.entry(dir).or_default().push(file);
    }
    for (dir, files) in &by_dir {
        if dir.as_os_str().is_empty() {
            println!(".");
        } else {
            println!("{}", dir.display());
        }
        for file in files {
            let name = file.file.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
            println!("  {name} ({} symbols)", file.symbols.len());
        }
    }
    Ok(())
}

// -- search / symbols ------------------------------------------------------

fn run_search(
    index: &mut CodeIndex,
    needle: &str,
    kind: Option<SymbolKind>,
    page: &PageParams,
    json_out: bool,
) -> anyhow::Result<()> {
    let result = query::search::search(index, needle, kind, page);
    if json_out {
        let hits: Vec<_> = result
            .hits
            .iter()
            .map(|h| {
                json!({
                    "name": h.name,
                    "kind": h.kind.as_str(),
                    "file": h.file.display().to_string(),
                    "lineStart": h.line_start,
                    "lineEnd": h.line_end,
                    "signature": h.signature,
                    "score": h.score,
                })
            })
            .collect();
        println!("{}", json!({ "hits": hits, "total": result.total }));
    } else if page.count {
        println!("{}", result.total);
    } else {
        for hit in &result.hits {
            println!("{}:{}  {}  [{}]", hit.file.display(), hit.line_start, hit.signature, hit.kind);
        }
    }
    Ok(())
}

fn run_symbols(
    index: &mut CodeIndex,
    file: Option<&PathBuf>,
    kind: Option<SymbolKind>,
    page: &PageParams,
    json_out: bool,
) -> anyhow::Result<()> {
    let result = query::symbols::symbols(index, file, kind, page);
    if json_out {
        let symbols: Vec<_> = result
            .symbols
            .iter()
            .map(|s| {
                json!({
                    "name": s.name,
                    "kind": s.kind.as_str(),
                    "file": s.file.display().to_string(),
                    "lineStart": s.line_start,
                    "lineEnd": s.line_end,
                    "signature": s.signature,
                    "score": s.score,
                })
            })
            .collect();
        println!("{}", json!({ "symbols": symbols, "total": result.total }));
    } else if page.count {
        println!("{}", result.total);
    } else {
        for symbol in &result.symbols {
            println!("{}:{}  {}  [{}]", symbol.file.display(), symbol.line_start, symbol.signature, symbol.kind);
        }
    }
    Ok(())
}

// -- callers ----------------------------------------------------------------

fn run_callers(
    index: &mut CodeIndex,
    symbol: &str,
    file: Option<&Path>,
    context: usize,
    page: &PageParams,
    json_out: bool,
) -> anyhow::Result<()> {
    let result = query::callers::callers(index, symbol, file, context, page, read_to_string);
    if json_out {
        let callers: Vec<_> = result
            .callers
            .iter()
            .map(|c| {
                json!({
                    "file": c.file.display().to_string(),
                    "score": c.score,
                    "callSites": c.call_sites.iter().map(|s| json!({
                        "line": s.line,
                        "contextStart": s.context_start,
                        "lines": s.context_lines,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", json!({ "callers": callers, "total": result.total }));
    } else if page.count {
        println!("{}", result.total);
    } else {
        for caller in &result.callers {
            println!("{} ({:.4})", caller.file.display(), caller.score);
            for site in &caller.call_sites {
                println!("  {}:{}", caller.file.display(), site.line);
                for (i, line) in site.context_lines.iter().enumerate() {
                    println!("    {:>4}| {}", site.context_start + i, line);
                }
            }
        }
    }
    Ok(())
}

// -- deps / dependents --------------------------------------------------

fn run_deps(
    index: &mut CodeIndex,
    file: &PathBuf,
    page: &PageParams,
    json_out: bool,
    outgoing: bool,
) -> anyhow::Result<()> {
    let result = if outgoing {
        query::deps::dependencies(index, file, page)
    } else {
        query::deps::dependents(index, file, page)
    };
    if json_out {
        let files: Vec<_> = result
            .files
            .iter()
            .map(|f| json!({ "file": f.file.display().to_string(), "score": f.score }))
            .collect();
        println!("{}", json!({ "files": files, "total": result.total }));
    } else if page.count {
        println!("{}", result.total);
    } else {
        for entry in &result.files {
            println!("{} ({:.4})", entry.file.display(), entry.score);
        }
    }
    Ok(())
}

// -- neighborhood ------------------------------------------------------------

fn run_neighborhood(
    index: &mut CodeIndex,
    file: &PathBuf,
    hops: usize,
    include_dependents: bool,
    max_files: usize,
    count: bool,
    json_out: bool,
) -> anyhow::Result<()> {
    let params = query::neighborhood::NeighborhoodParams {
        hops,
        include_dependents,
        max_files,
        count,
    };
    let Some(result) = query::neighborhood::neighborhood(index, file, &params) else {
        let suggestions = query::suggest_files(index.graph(), &file.display().to_string());
        return Err(IndexError::UnknownFile { path: file.display().to_string(), suggestions }.into());
    };

    if json_out {
        println!(
            "{}",
            json!({
                "files": result.files.iter().map(|f| json!({
                    "file": f.file.display().to_string(),
                    "hop": f.hop,
                    "isDirect": f.is_direct,
                })).collect::<Vec<_>>(),
                "edges": result.edges.iter().map(|e| json!({
                    "from": e.from.display().to_string(),
                    "to": e.to.display().to_string(),
                })).collect::<Vec<_>>(),
                "symbols": result.symbols.iter().map(|s| json!({
                    "name": s.name,
                    "kind": s.kind.as_str(),
                    "file": s.file.display().to_string(),
                    "lineStart": s.line_start,
                    "signature": s.signature,
                })).collect::<Vec<_>>(),
                "totalFiles": result.total_files,
                "totalSymbols": result.total_symbols,
                "totalEdges": result.total_edges,
                "totalVisited": result.total_visited,
            })
        );
    } else if count {
        println!(
            "{} files, {} symbols, {} edges ({} visited)",
            result.total_files, result.total_symbols, result.total_edges, result.total_visited
        );
    } else {
        for f in &result.files {
            let marker = if f.is_direct { "*" } else { " " };
            println!("{marker} {} (hop {})", f.file.display(), f.hop);
        }
    }
    Ok(())
}

// -- orphans -----------------------------------------------------------------

fn run_orphans(
    index: &CodeIndex,
    level: OrphanLevel,
    kind: Option<SymbolKind>,
    page: &PageParams,
    json_out: bool,
) -> anyhow::Result<()> {
    let result = query::orphans::orphans(index, level, kind, page);
    if json_out {
        println!(
            "{}",
            json!({
                "files": result.files.iter().map(|f| json!({
                    "file": f.file.display().to_string(),
                    "symbolCount": f.symbol_count,
                })).collect::<Vec<_>>(),
                "symbols": result.symbols.iter().map(|s| json!({
                    "name": s.name,
                    "kind": s.kind.as_str(),
                    "file": s.file.display().to_string(),
                    "lineStart": s.line_start,
                })).collect::<Vec<_>>(),
                "total": result.total,
            })
        );
    } else if page.count {
        println!("{}", result.total);
    } else {
        for f in &result.files {
            println!("{} ({} symbols)", f.file.display(), f.symbol_count);
        }
        for s in &result.symbols {
            println!("{}:{}  {}  [{}]", s.file.display(), s.line_start, s.name, s.kind);
        }
    }
    Ok(())
}

// -- context / trace ----------------------------------------------------------

fn run_context(index: &CodeIndex, symbol: &str, file: Option<&Path>, json_out: bool) -> anyhow::Result<()> {
    let result = query::context::context(index, symbol, file, read_to_string)?;
    if json_out {
        println!(
            "{}",
            json!({
                "name": result.name,
                "kind": result.kind.as_str(),
                "file": result.file.display().to_string(),
                "lineStart": result.line_start,
                "lineEnd": result.line_end,
                "signature": result.signature,
                "usedSymbols": result.used_symbols.iter().map(|u| json!({
                    "name": u.name,
                    "file": u.file.display().to_string(),
                    "lineStart": u.line_start,
                    "signature": u.signature,
                })).collect::<Vec<_>>(),
                "typePreviews": result.type_previews.iter().map(|t| json!({
                    "name": t.name,
                    "file": t.file.display().to_string(),
                    "lines": t.lines,
                    "truncated": t.truncated,
                })).collect::<Vec<_>>(),
                "externalCallers": result.external_callers.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            })
        );
    } else {
        println!("{} [{}] {}:{}-{}", result.name, result.kind, result.file.display(), result.line_start, result.line_end);
        println!("{}", result.signature);
        for line in &result.source {
            println!("  {line}");
        }
        if !result.used_symbols.is_empty() {
            println!("used symbols:");
            for u in &result.used_symbols {
                println!("  {} ({}:{})", u.name, u.file.display(), u.line_start);
            }
        }
        if !result.type_previews.is_empty() {
            println!("type previews:");
            for t in &result.type_previews {
                println!("  {} ({})", t.name, t.file.display());
                for line in &t.lines {
                    println!("    {line}");
                }
                if t.truncated {
                    println!("    ...");
                }
            }
        }
        if !result.external_callers.is_empty() {
            println!("callers:");
            for c in &result.external_callers {
                println!("  {}", c.display());
            }
        }
    }
    Ok(())
}

fn run_trace(index: &CodeIndex, symbol: &str, file: Option<&Path>, depth: usize, json_out: bool) -> anyhow::Result<()> {
    let nodes = query::trace::trace(index, symbol, file, depth, read_to_string);
    if json_out {
        println!("{}", json!(trace_nodes_json(&nodes)));
    } else {
        for node in &nodes {
            print_trace_node(node, 0);
        }
    }
    Ok(())
}

fn trace_nodes_json(nodes: &[query::trace::TraceNode]) -> Vec<serde_json::Value> {
    nodes
        .iter()
        .map(|n| {
            json!({
                "name": n.name,
                "file": n.file.display().to_string(),
                "line": n.line,
                "children": trace_nodes_json(&n.children),
            })
        })
        .collect()
}

fn print_trace_node(node: &query::trace::TraceNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let label = node.name.as_deref().unwrap_or("<module>");
    match node.line {
        Some(line) => println!("{indent}{label} ({}:{line})", node.file.display()),
        None => println!("{indent}{label} ({})", node.file.display()),
    }
    for child in &node.children {
        print_trace_node(child, depth + 1);
    }
}

// -- diff / history ------------------------------------------------------------

fn run_diff(index: &CodeIndex, base_ref: &str, json_out: bool) -> anyhow::Result<()> {
    let result = query::diff::diff(index, base_ref, read_to_bytes)?;
    if json_out {
        println!(
            "{}",
            json!({
                "changed": result.changed.iter().map(|f| json!({
                    "file": f.file.display().to_string(),
                    "added": f.added.iter().map(|a| json!({
                        "name": a.name, "kind": a.kind.as_str(), "signature": a.signature,
                    })).collect::<Vec<_>>(),
                    "removed": f.removed.iter().map(|r| json!({
                        "name": r.name, "kind": r.kind.as_str(), "signature": r.signature, "callerCount": r.caller_count,
                    })).collect::<Vec<_>>(),
                    "modified": f.modified.iter().map(|m| json!({
                        "name": m.name, "kind": m.kind.as_str(),
                        "oldSignature": m.old_signature, "newSignature": m.new_signature,
                        "callerCount": m.caller_count,
                    })).collect::<Vec<_>>(),
                })).collect::<Vec<_>>(),
                "totalCallers": result.total_callers,
            })
        );
    } else {
        for f in &result.changed {
            println!("{}", f.file.display());
            for a in &f.added {
                println!("  + {} [{}]", a.name, a.kind);
            }
            for r in &f.removed {
                println!("  - {} [{}] ({} callers)", r.name, r.kind, r.caller_count);
            }
            for m in &f.modified {
                println!("  ~ {} [{}] ({} callers)", m.name, m.kind, m.caller_count);
            }
        }
        println!("total callers affected: {}", result.total_callers);
    }
    Ok(())
}

fn run_history(
    index: &CodeIndex,
    symbol: &str,
    file: Option<&Path>,
    page: &PageParams,
    json_out: bool,
) -> anyhow::Result<()> {
    let entries = query::history::history(index, symbol, file, page.offset, page.limit.unwrap_or(20))?;
    if json_out {
        let entries: Vec<_> = entries
            .iter()
            .map(|e| json!({ "commit": e.commit, "author": e.author, "date": e.date, "summary": e.summary }))
            .collect();
        println!("{}", json!({ "entries": entries }));
    } else {
        for e in &entries {
            println!("{}  {}  {}  {}", &e.commit[..e.commit.len().min(10)], e.date, e.author, e.summary);
        }
    }
    Ok(())
}

// -- outline --------------------------------------------------------------------

fn run_outline(index: &CodeIndex, file: &Path, expand: &[String], json_out: bool) -> anyhow::Result<()> {
    let source = read_to_string(file).map_err(|err| IndexError::IoError { path: file.to_path_buf(), source: err })?;
    let bytes = source.as_bytes();
    let definitions = parser::extract(file, bytes).map(|fs| fs.definitions).unwrap_or_default();

    let mut caller_counts = std::collections::HashMap::new();
    for def in &definitions {
        let targets = query::candidates_named(index.graph(), &def.name, Some(file));
        let count: usize = targets
            .iter()
            .map(|&idx| {
                index
                    .graph()
                    .edges_of_kind(idx, petgraph::Direction::Incoming, graph::edge::EdgeKind::References)
                    .filter(|&caller| {
                        index
                            .graph()
                            .node(caller)
                            .and_then(|n| n.as_file())
                            .is_some_and(|f| f.path != file)
                    })
                    .count()
            })
            .sum();
        if count > 0 {
            caller_counts.insert(def.name.clone(), count);
        }
    }

    if expand.is_empty() {
        let lines = outline::outline(&source, &definitions, Some(&caller_counts));
        if json_out {
            let lines: Vec<_> = lines.iter().map(|l| json!({ "line": l.line_no, "text": l.text })).collect();
            println!("{}", json!({ "lines": lines }));
        } else {
            for line in &lines {
                println!("{:>5}| {}", line.line_no, line.text);
            }
        }
    } else {
        let expanded = outline::expand(&source, &definitions, expand);
        if json_out {
            let expanded: Vec<_> = expanded
                .iter()
                .map(|e| {
                    json!({
                        "name": e.name,
                        "lines": e.lines.iter().map(|l| json!({ "line": l.line_no, "text": l.text })).collect::<Vec<_>>(),
                        "suggestions": e.suggestions,
                    })
                })
                .collect();
            println!("{}", json!(expanded));
        } else {
            for e in &expanded {
                if e.lines.is_empty() {
                    println!("{}: not found. Did you mean: {}?", e.name, e.suggestions.join(", "));
                    continue;
                }
                println!("{}:", e.name);
                for line in &e.lines {
                    println!("{:>5}| {}", line.line_no, line.text);
                }
            }
        }
    }
    Ok(())
}

// -- reindex / stats / ui ------------------------------------------------------

fn run_reindex(index: &mut CodeIndex) -> anyhow::Result<()> {
    let stats = index.reindex()?;
    println!(
        "rebuilt: {} files ({} added, {} changed, {} removed), {} symbols, {} edges",
        stats.files_total, stats.files_added, stats.files_changed, stats.files_removed, stats.symbols_total, stats.edges_total
    );
    Ok(())
}

fn run_stats(index: &CodeIndex, json_out: bool) -> anyhow::Result<()> {
    let stats = query::stats::project_stats(index.graph());
    if json_out {
        let by_language: serde_json::Map<String, serde_json::Value> = stats
            .files_by_language
            .iter()
            .map(|(lang, count)| (lang.name().to_string(), json!(count)))
            .collect();
        let by_kind: serde_json::Map<String, serde_json::Value> = stats
            .symbols_by_kind
            .iter()
            .map(|(kind, count)| (kind.as_str().to_string(), json!(count)))
            .collect();
        println!(
            "{}",
            json!({
                "fileCount": stats.file_count,
                "symbolCount": stats.symbol_count,
                "filesByLanguage": by_language,
                "symbolsByKind": by_kind,
                "definesEdges": stats.defines_edges,
                "referencesEdges": stats.references_edges,
                "importsEdges": stats.imports_edges,
            })
        );
    } else {
        println!("{} files, {} symbols", stats.file_count, stats.symbol_count);
        for (lang, count) in &stats.files_by_language {
            println!("  {}: {count} files", lang.name());
        }
        for (kind, count) in &stats.symbols_by_kind {
            println!("  {kind}: {count}");
        }
        println!(
            "edges: {} defines, {} references, {} imports",
            stats.defines_edges, stats.references_edges, stats.imports_edges
        );
    }
    Ok(())
}

fn run_ui(index: &mut CodeIndex) -> anyhow::Result<()> {
    let stats = query::stats::project_stats(index.graph());
    println!("=== project overview ===");
    println!(
        "{} files, {} symbols, {} edges",
        stats.file_count,
        stats.symbol_count,
        stats.defines_edges + stats.references_edges + stats.imports_edges
    );

    println!("\n=== highest-ranked symbols ===");
    let page = PageParams { offset: 0, limit: Some(10), count: false };
    let result = query::map::map(index, &[], &page);
    print!("{}", query::map::render_text(&result));
    Ok(())
}
