//! Signature extraction: collapse a declaration head into a single-line,
//! length-capped string (spec §3 / §4.2).
//!
//! Brace languages cut at the first `{` (falling back to the first line
//! break, or end of text, when no `{` occurs — e.g. an interface method
//! signature ending in `;`), capped at 200 characters. Indentation-defined
//! languages (Python) cut at the first `:` following the closing `)` (or
//! the first `:` at all, when there are no parens), capped at 300
//! characters. Either way the cut point itself is excluded, embedded
//! newlines in a multi-line head are collapsed to single spaces, and a
//! truncated signature gets a trailing ellipsis.

const BRACE_CAP: usize = 200;
const COLON_CAP: usize = 300;
const ELLIPSIS: char = '…';

pub fn extract(definition_text: &str, indentation_defined: bool) -> String {
    let cutoff = if indentation_defined {
        colon_cutoff(definition_text)
    } else {
        brace_cutoff(definition_text)
    };
    let head = &definition_text[..cutoff];
    let collapsed = collapse_whitespace(head);
    let cap = if indentation_defined { COLON_CAP } else { BRACE_CAP };
    truncate_with_ellipsis(&collapsed, cap)
}

fn brace_cutoff(text: &str) -> usize {
    match text.find('{') {
        Some(i) => i,
        None => text.find('\n').unwrap_or(text.len()),
    }
}

fn colon_cutoff(text: &str) -> usize {
    if let Some(paren_close) = text.find(')') {
        if let Some(rel) = text[paren_close..].find(':') {
            return paren_close + rel;
        }
    }
    if let Some(i) = text.find(':') {
        return i;
    }
    text.find('\n').unwrap_or(text.len())
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out.trim().to_string()
}

fn truncate_with_ellipsis(s: &str, cap: usize) -> String {
    if s.chars().count() <= cap {
        return s.to_string();
    }
    let truncated: String = s.chars().take(cap.saturating_sub(1)).collect();
    format!("{truncated}{ELLIPSIS}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brace_language_cuts_at_open_brace() {
        let sig = extract("fn foo(a: i32) {\n    a\n}", false);
        assert_eq!(sig, "fn foo(a: i32)");
    }

    #[test]
    fn brace_language_falls_back_to_linebreak_without_brace() {
        let sig = extract("void foo();\nvoid bar();", false);
        assert_eq!(sig, "void foo();");
    }

    #[test]
    fn brace_language_collapses_multiline_head() {
        let sig = extract("fn foo(\n    a: i32,\n) {\n}", false);
        assert_eq!(sig, "fn foo( a: i32, )");
    }

    #[test]
    fn brace_language_truncates_with_ellipsis() {
        let long_head = format!("fn {}() {{", "a".repeat(250));
        let sig = extract(&long_head, false);
        assert_eq!(sig.chars().count(), BRACE_CAP);
        assert!(sig.ends_with(ELLIPSIS));
    }

    #[test]
    fn indentation_language_cuts_after_closing_paren() {
        let sig = extract("def foo(a, b):\n    return a", true);
        assert_eq!(sig, "def foo(a, b)");
    }

    #[test]
    fn indentation_language_uses_first_colon_without_parens() {
        let sig = extract("class Foo:\n    pass", true);
        assert_eq!(sig, "class Foo");
    }
}
