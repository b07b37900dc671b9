//! Outline / Context Helpers (C7): render a file with leaf definition
//! bodies collapsed, or expand specific named symbols to their full text
//! (spec §4.7).

use std::collections::HashMap;

use crate::parser::Definition;

#[derive(Debug, Clone)]
pub struct OutlineLine {
    pub line_no: usize,
    pub text: String,
}

/// Render `source` with every leaf definition's body (everything after its
/// header line, when ≥ 2 lines) replaced by a one-line `"... (N lines)"`
/// marker, optionally annotated with a caller count (spec §4.7).
pub fn outline(source: &str, definitions: &[Definition], caller_counts: Option<&HashMap<String, usize>>) -> Vec<OutlineLine> {
    let lines: Vec<&str> = source.lines().collect();
    let leaves = leaf_definitions(definitions);

    let mut by_start: HashMap<usize, &Definition> = HashMap::new();
    for def in &leaves {
        by_start.entry(def.line_start).or_insert(def);
    }

    let mut out = Vec::new();
    let mut line_no = 1usize;
    let total = lines.len();

    while line_no <= total {
        if let Some(&def) = by_start.get(&line_no) {
            out.push(OutlineLine { line_no, text: lines[line_no - 1].to_string() });
            let body_len = def.line_end - def.line_start;
            if body_len >= 2 {
                let marker = match caller_counts.and_then(|m| m.get(&def.name)) {
                    Some(&count) => format!("    ... ({body_len} lines) ← {count} callers"),
                    None => format!("    ... ({body_len} lines)"),
                };
                out.push(OutlineLine { line_no: def.line_start + 1, text: marker });
                line_no = def.line_end + 1;
                continue;
            }
        } else {
            out.push(OutlineLine { line_no, text: lines[line_no - 1].to_string() });
        }
        line_no += 1;
    }

    out
}

#[derive(Debug, Clone)]
pub struct ExpandedSymbol {
    pub name: String,
    pub lines: Vec<OutlineLine>,
    pub suggestions: Vec<String>,
}

/// Print the full `[lineStart..lineEnd]` text of each name in `names`,
/// suggesting similarly-named definitions in this file when nothing
/// matches (spec §4.7).
pub fn expand(source: &str, definitions: &[Definition], names: &[String]) -> Vec<ExpandedSymbol> {
    let lines: Vec<&str> = source.lines().collect();

    names
        .iter()
        .map(|name| {
            let matched: Vec<&Definition> = definitions.iter().filter(|d| &d.name == name).collect();
            if matched.is_empty() {
                return ExpandedSymbol {
                    name: name.clone(),
                    lines: Vec::new(),
                    suggestions: suggest(definitions, name),
                };
            }

            let mut out = Vec::new();
            for def in matched {
                for line_no in def.line_start..=def.line_end.min(lines.len()) {
                    out.push(OutlineLine { line_no, text: lines[line_no - 1].to_string() });
                }
            }
            ExpandedSymbol { name: name.clone(), lines: out, suggestions: Vec::new() }
        })
        .collect()
}

fn suggest(definitions: &[Definition], given: &str) -> Vec<String> {
    let needle = given.to_lowercase();
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for def in definitions {
        if def.name.to_lowercase().contains(&needle) && seen.insert(def.name.clone()) {
            out.push(def.name.clone());
            if out.len() == 5 {
                break;
            }
        }
    }
    out
}

/// A definition is a leaf when no other definition's range is strictly
/// contained within its own (spec §4.7: "container" vs. "leaf").
fn leaf_definitions(definitions: &[Definition]) -> Vec<&Definition> {
    definitions
        .iter()
        .enumerate()
        .filter(|&(i, def)| {
            !definitions.iter().enumerate().any(|(j, other)| {
                j != i && other.line_start >= def.line_start && other.line_end <= def.line_end
                    && (other.line_start, other.line_end) != (def.line_start, def.line_end)
            })
        })
        .map(|(_, def)| def)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::SymbolKind;
    use std::path::PathBuf;

    fn def(name: &str, start: usize, end: usize) -> Definition {
        Definition { name: name.into(), kind: SymbolKind::Function, file: PathBuf::from("a.rs"), line_start: start, line_end: end, signature: format!("fn {name}()") }
    }

    #[test]
    fn collapses_leaf_bodies_of_two_or_more_lines() {
        let source = "fn outer() {\n    fn inner() {\n        1;\n        2;\n    }\n}\n";
        let defs = vec![def("outer", 1, 6), def("inner", 2, 5)];
        let rendered = outline(source, &defs, None);
        assert!(rendered.iter().any(|l| l.text.contains("... (3 lines)")));
        assert!(rendered.iter().any(|l| l.text.contains("fn outer()")));
    }

    #[test]
    fn single_line_body_is_not_collapsed() {
        let source = "fn tiny() {\n    1;\n}\n";
        let defs = vec![def("tiny", 1, 3)];
        let rendered = outline(source, &defs, None);
        assert!(!rendered.iter().any(|l| l.text.contains("lines)")));
        assert_eq!(rendered.len(), 3);
    }

    #[test]
    fn expand_returns_suggestions_when_no_match() {
        let source = "fn helperFn() {}\n";
        let defs = vec![def("helperFn", 1, 1)];
        let result = expand(source, &defs, &["helper".to_string()]);
        assert!(result[0].lines.is_empty());
        assert!(result[0].suggestions.contains(&"helperFn".to_string()));
    }

    #[test]
    fn expand_returns_full_range_on_match() {
        let source = "fn a() {\n    1;\n}\n";
        let defs = vec![def("a", 1, 3)];
        let result = expand(source, &defs, &["a".to_string()]);
        assert_eq!(result[0].lines.len(), 3);
    }
}
