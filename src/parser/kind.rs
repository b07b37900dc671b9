//! Fixed per-language mapping from a `@definition` capture's tree-sitter
//! node type to the closed `SymbolKind` set (spec §3: "Derived from the
//! grammar's node type via a fixed mapping").

use crate::graph::node::SymbolKind;
use crate::language::LanguageId;

pub fn symbol_kind(lang: LanguageId, node_type: &str) -> SymbolKind {
    use SymbolKind::*;

    match (lang, node_type) {
        // Rust
        (LanguageId::Rust, "function_item") => Function,
        (LanguageId::Rust, "struct_item") => Class,
        (LanguageId::Rust, "impl_item") => Class,
        (LanguageId::Rust, "enum_item") => Type,
        (LanguageId::Rust, "trait_item") => Type,
        (LanguageId::Rust, "type_item") => Type,
        (LanguageId::Rust, "mod_item") => Namespace,
        (LanguageId::Rust, "const_item") => Variable,
        (LanguageId::Rust, "static_item") => Variable,
        (LanguageId::Rust, "macro_definition") => Other,

        // TypeScript / TSX / JavaScript
        (LanguageId::TypeScript | LanguageId::Tsx | LanguageId::JavaScript, "function_declaration") => Function,
        (LanguageId::TypeScript | LanguageId::Tsx | LanguageId::JavaScript, "method_definition") => Function,
        (LanguageId::TypeScript | LanguageId::Tsx | LanguageId::JavaScript, "variable_declarator") => Function,
        (LanguageId::TypeScript | LanguageId::Tsx | LanguageId::JavaScript, "class_declaration") => Class,
        (LanguageId::TypeScript | LanguageId::Tsx, "abstract_class_declaration") => Class,
        (LanguageId::TypeScript | LanguageId::Tsx, "interface_declaration") => Type,
        (LanguageId::TypeScript | LanguageId::Tsx, "type_alias_declaration") => Type,
        (LanguageId::TypeScript | LanguageId::Tsx | LanguageId::JavaScript, "enum_declaration") => Type,

        // Python
        (LanguageId::Python, "function_definition") => Function,
        (LanguageId::Python, "class_definition") => Class,

        // Go
        (LanguageId::Go, "function_declaration") => Function,
        (LanguageId::Go, "method_declaration") => Function,
        (LanguageId::Go, "type_spec") => Type,
        (LanguageId::Go, "const_spec") => Variable,
        (LanguageId::Go, "var_spec") => Variable,

        // Java
        (LanguageId::Java, "method_declaration") => Function,
        (LanguageId::Java, "constructor_declaration") => Function,
        (LanguageId::Java, "class_declaration") => Class,
        (LanguageId::Java, "interface_declaration") => Type,
        (LanguageId::Java, "enum_declaration") => Type,

        // C
        (LanguageId::C, "function_definition") => Function,
        (LanguageId::C, "struct_specifier") => Class,
        (LanguageId::C, "enum_specifier") => Type,
        (LanguageId::C, "type_definition") => Type,

        // C++
        (LanguageId::Cpp, "function_definition") => Function,
        (LanguageId::Cpp, "class_specifier") => Class,
        (LanguageId::Cpp, "struct_specifier") => Class,
        (LanguageId::Cpp, "namespace_definition") => Namespace,
        (LanguageId::Cpp, "enum_specifier") => Type,

        // C#
        (LanguageId::CSharp, "method_declaration") => Function,
        (LanguageId::CSharp, "class_declaration") => Class,
        (LanguageId::CSharp, "struct_declaration") => Class,
        (LanguageId::CSharp, "interface_declaration") => Type,
        (LanguageId::CSharp, "enum_declaration") => Type,
        (LanguageId::CSharp, "namespace_declaration") => Namespace,

        // PHP
        (LanguageId::Php, "function_definition") => Function,
        (LanguageId::Php, "method_declaration") => Function,
        (LanguageId::Php, "class_declaration") => Class,
        (LanguageId::Php, "interface_declaration") => Type,
        (LanguageId::Php, "trait_declaration") => Type,
        (LanguageId::Php, "enum_declaration") => Type,

        // Kotlin
        (LanguageId::Kotlin, "function_declaration") => Function,
        (LanguageId::Kotlin, "class_declaration") => Class,
        (LanguageId::Kotlin, "object_declaration") => Class,

        _ => Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_node_types() {
        assert_eq!(symbol_kind(LanguageId::Rust, "function_item"), SymbolKind::Function);
        assert_eq!(symbol_kind(LanguageId::Python, "class_definition"), SymbolKind::Class);
        assert_eq!(symbol_kind(LanguageId::Go, "type_spec"), SymbolKind::Type);
    }

    #[test]
    fn unknown_node_type_falls_back_to_other() {
        assert_eq!(symbol_kind(LanguageId::Rust, "something_unheard_of"), SymbolKind::Other);
    }
}
