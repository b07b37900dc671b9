//! Grammar registry: maps file extensions to tree-sitter grammars and their
//! compiled definition/reference queries.
//!
//! Built once per process (`GrammarRegistry::global()`), since tree-sitter
//! `Language` handles and compiled `Query` objects are immutable and cheap to
//! share across threads behind an `Arc`. Parsing itself still needs one
//! `Parser` per thread (tree-sitter's `Parser` is not `Sync`); see
//! `crate::parser`.

mod queries;

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tree_sitter::Query;

use crate::error::{IndexError, IndexResult};

/// The closed set of languages this engine understands.
///
/// Adding a language means adding a variant here, a grammar dependency in
/// `Cargo.toml`, an extension mapping below, and a pair of query strings in
/// `queries.rs` — nothing else in the engine is language-specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageId {
    Rust,
    TypeScript,
    Tsx,
    JavaScript,
    Python,
    Go,
    Java,
    C,
    Cpp,
    CSharp,
    Php,
    Kotlin,
}

impl LanguageId {
    pub fn name(self) -> &'static str {
        match self {
            LanguageId::Rust => "rust",
            LanguageId::TypeScript => "typescript",
            LanguageId::Tsx => "tsx",
            LanguageId::JavaScript => "javascript",
            LanguageId::Python => "python",
            LanguageId::Go => "go",
            LanguageId::Java => "java",
            LanguageId::C => "c",
            LanguageId::Cpp => "cpp",
            LanguageId::CSharp => "csharp",
            LanguageId::Php => "php",
            LanguageId::Kotlin => "kotlin",
        }
    }

    pub fn from_extension(ext: &str) -> Option<LanguageId> {
        Some(match ext {
            "rs" => LanguageId::Rust,
            "ts" | "mts" | "cts" => LanguageId::TypeScript,
            "tsx" => LanguageId::Tsx,
            "js" | "mjs" | "cjs" | "jsx" => LanguageId::JavaScript,
            "py" | "pyi" => LanguageId::Python,
            "go" => LanguageId::Go,
            "java" => LanguageId::Java,
            "c" | "h" => LanguageId::C,
            "cc" | "cpp" | "cxx" | "hpp" | "hh" | "hxx" => LanguageId::Cpp,
            "cs" => LanguageId::CSharp,
            "php" => LanguageId::Php,
            "kt" | "kts" => LanguageId::Kotlin,
            _ => return None,
        })
    }

    /// Python is the only supported language whose block structure is
    /// defined by indentation rather than braces; the signature extractor
    /// (`crate::parser::signature`) uses this to pick its truncation rule.
    pub fn is_indentation_defined(self) -> bool {
        matches!(self, LanguageId::Python)
    }

    fn ts_language(self) -> tree_sitter::Language {
        match self {
            LanguageId::Rust => tree_sitter_rust::LANGUAGE.into(),
            LanguageId::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            LanguageId::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            LanguageId::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            LanguageId::Python => tree_sitter_python::LANGUAGE.into(),
            LanguageId::Go => tree_sitter_go::LANGUAGE.into(),
            LanguageId::Java => tree_sitter_java::LANGUAGE.into(),
            LanguageId::C => tree_sitter_c::LANGUAGE.into(),
            LanguageId::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            LanguageId::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
            LanguageId::Php => tree_sitter_php::LANGUAGE_PHP.into(),
            LanguageId::Kotlin => tree_sitter_kotlin_codanna::LANGUAGE.into(),
        }
    }

    fn all() -> &'static [LanguageId] {
        &[
            LanguageId::Rust,
            LanguageId::TypeScript,
            LanguageId::Tsx,
            LanguageId::JavaScript,
            LanguageId::Python,
            LanguageId::Go,
            LanguageId::Java,
            LanguageId::C,
            LanguageId::Cpp,
            LanguageId::CSharp,
            LanguageId::Php,
            LanguageId::Kotlin,
        ]
    }
}

/// A compiled grammar plus its two standing queries.
pub struct GrammarHandle {
    pub language_id: LanguageId,
    pub language: tree_sitter::Language,
    pub def_query: Query,
    pub ref_query: Query,
}

/// extension -> grammar lookup table, built once at process start.
///
/// A language whose query string fails to compile against the linked
/// grammar version is dropped from the registry (logged at `warn`) rather
/// than aborting the whole registry build — every other language keeps
/// working, matching the engine-wide rule that a single bad grammar is
/// never fatal.
pub struct GrammarRegistry {
    by_extension: HashMap<&'static str, Arc<GrammarHandle>>,
}

const EXTENSIONS: &[(&str, LanguageId)] = &[
    ("rs", LanguageId::Rust),
    ("ts", LanguageId::TypeScript),
    ("mts", LanguageId::TypeScript),
    ("cts", LanguageId::TypeScript),
    ("tsx", LanguageId::Tsx),
    ("js", LanguageId::JavaScript),
    ("mjs", LanguageId::JavaScript),
    ("cjs", LanguageId::JavaScript),
    ("jsx", LanguageId::JavaScript),
    ("py", LanguageId::Python),
    ("pyi", LanguageId::Python),
    ("go", LanguageId::Go),
    ("java", LanguageId::Java),
    ("c", LanguageId::C),
    ("h", LanguageId::C),
    ("cc", LanguageId::Cpp),
    ("cpp", LanguageId::Cpp),
    ("cxx", LanguageId::Cpp),
    ("hpp", LanguageId::Cpp),
    ("hh", LanguageId::Cpp),
    ("hxx", LanguageId::Cpp),
    ("cs", LanguageId::CSharp),
    ("php", LanguageId::Php),
    ("kt", LanguageId::Kotlin),
    ("kts", LanguageId::Kotlin),
];

impl GrammarRegistry {
    fn build() -> GrammarRegistry {
        let mut handles: HashMap<LanguageId, Arc<GrammarHandle>> = HashMap::new();

        for &lang in LanguageId::all() {
            match Self::build_one(lang) {
                Ok(handle) => {
                    handles.insert(lang, Arc::new(handle));
                }
                Err(err) => {
                    tracing::warn!(language = lang.name(), error = %err, "grammar unavailable, skipping");
                }
            }
        }

        let mut by_extension = HashMap::new();
        for &(ext, lang) in EXTENSIONS {
            if let Some(handle) = handles.get(&lang) {
                by_extension.insert(ext, Arc::clone(handle));
            }
        }

        GrammarRegistry { by_extension }
    }

    fn build_one(lang: LanguageId) -> IndexResult<GrammarHandle> {
        let language = lang.ts_language();

        let def_query =
            Query::new(&language, queries::definitions(lang)).map_err(|e| IndexError::QueryError {
                language: lang.name().to_string(),
                query_name: "definitions",
                reason: e.to_string(),
            })?;
        let ref_query =
            Query::new(&language, queries::references(lang)).map_err(|e| IndexError::QueryError {
                language: lang.name().to_string(),
                query_name: "references",
                reason: e.to_string(),
            })?;

        Ok(GrammarHandle {
            language_id: lang,
            language,
            def_query,
            ref_query,
        })
    }

    /// The process-wide registry, built lazily on first use.
    pub fn global() -> &'static GrammarRegistry {
        static REGISTRY: OnceLock<GrammarRegistry> = OnceLock::new();
        REGISTRY.get_or_init(GrammarRegistry::build)
    }

    /// Resolve a bare extension (no leading dot) to its grammar, if any.
    ///
    /// Mirrors the grammar registry contract: `resolve(extension) -> { languageId,
    /// grammar, defQuery, refQuery } | none`.
    pub fn resolve(&self, extension: &str) -> Option<Arc<GrammarHandle>> {
        self.by_extension.get(extension).cloned()
    }

    pub fn supported_extensions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_extension.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_extensions() {
        let registry = GrammarRegistry::global();
        for ext in ["rs", "ts", "tsx", "js", "py", "go", "java", "c", "cpp", "cs", "php", "kt"] {
            assert!(
                registry.resolve(ext).is_some(),
                "expected a grammar for .{ext}"
            );
        }
    }

    #[test]
    fn rejects_unknown_extension() {
        let registry = GrammarRegistry::global();
        assert!(registry.resolve("xyz").is_none());
    }

    #[test]
    fn only_python_is_indentation_defined() {
        for &lang in LanguageId::all() {
            assert_eq!(lang.is_indentation_defined(), lang == LanguageId::Python);
        }
    }

    #[test]
    fn every_grammar_compiles_its_queries() {
        let registry = GrammarRegistry::global();
        for &(ext, _) in EXTENSIONS {
            let handle = registry
                .resolve(ext)
                .unwrap_or_else(|| panic!("missing grammar for .{ext}"));
            assert!(handle.def_query.pattern_count() > 0);
            assert!(handle.ref_query.pattern_count() > 0);
        }
    }
}
