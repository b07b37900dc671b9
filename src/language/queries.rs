//! Per-language tree-sitter query strings.
//!
//! Each language exposes two query source strings:
//! - `definitions()`: captures `@name` (the identifier) and `@definition` (the
//!   enclosing declaration node) for everything the registry recognizes as a
//!   top-level or nested declaration.
//! - `references()`: captures `@name` for bare call targets, import-clause
//!   identifiers, type identifiers in type position, and decorator/attribute
//!   identifiers. Deliberately does NOT capture `obj.method(...)` attribute
//!   calls — the AST shape alone keeps those out for most grammars (a call
//!   with a `member_expression`/`field_expression` callee doesn't match a
//!   bare-identifier pattern); Java and C# need an explicit `!object` /
//!   `!expression` field negation since their invocation node is the same
//!   for both forms.
//!
//! A query string failing to compile for a given tree-sitter grammar version
//! is a `QueryError` at registry-build time for that language only — every
//! other language keeps working (spec: "a grammar/query failure for one file
//! is never fatal").

use super::LanguageId;

pub fn definitions(lang: LanguageId) -> &'static str {
    match lang {
        LanguageId::Rust => RUST_DEFS,
        LanguageId::TypeScript | LanguageId::Tsx => TS_DEFS,
        LanguageId::JavaScript => JS_DEFS,
        LanguageId::Python => PY_DEFS,
        LanguageId::Go => GO_DEFS,
        LanguageId::Java => JAVA_DEFS,
        LanguageId::C => C_DEFS,
        LanguageId::Cpp => CPP_DEFS,
        LanguageId::CSharp => CSHARP_DEFS,
        LanguageId::Php => PHP_DEFS,
        LanguageId::Kotlin => KOTLIN_DEFS,
    }
}

pub fn references(lang: LanguageId) -> &'static str {
    match lang {
        LanguageId::Rust => RUST_REFS,
        LanguageId::TypeScript | LanguageId::Tsx => TS_REFS,
        LanguageId::JavaScript => JS_REFS,
        LanguageId::Python => PY_REFS,
        LanguageId::Go => GO_REFS,
        LanguageId::Java => JAVA_REFS,
        LanguageId::C => C_REFS,
        LanguageId::Cpp => CPP_REFS,
        LanguageId::CSharp => CSHARP_REFS,
        LanguageId::Php => PHP_REFS,
        LanguageId::Kotlin => KOTLIN_REFS,
    }
}

// ---------------------------------------------------------------------------
// Rust
// ---------------------------------------------------------------------------

const RUST_DEFS: &str = r#"
(function_item name: (identifier) @name) @definition
(struct_item name: (type_identifier) @name) @definition
(enum_item name: (type_identifier) @name) @definition
(trait_item name: (type_identifier) @name) @definition
(impl_item type: (type_identifier) @name) @definition
(type_item name: (type_identifier) @name) @definition
(mod_item name: (identifier) @name) @definition
(const_item name: (identifier) @name) @definition
(static_item name: (identifier) @name) @definition
(macro_definition name: (identifier) @name) @definition
"#;

const RUST_REFS: &str = r#"
(call_expression function: (identifier) @name)
(call_expression function: (scoped_identifier name: (identifier) @name))
(use_declaration argument: (identifier) @name)
(use_declaration argument: (scoped_identifier name: (identifier) @name))
(use_declaration argument: (use_as_clause alias: (identifier) @name))
(attribute_item (attribute (identifier) @name))
(type_identifier) @name
"#;

// ---------------------------------------------------------------------------
// TypeScript / JavaScript
// ---------------------------------------------------------------------------

const JS_DEFS: &str = r#"
(function_declaration name: (identifier) @name) @definition
(class_declaration name: (identifier) @name) @definition
(method_definition name: (property_identifier) @name) @definition
(variable_declarator name: (identifier) @name value: (arrow_function)) @definition
(variable_declarator name: (identifier) @name value: (function_expression)) @definition
"#;

const JS_REFS: &str = r#"
(call_expression function: (identifier) @name)
(import_specifier name: (identifier) @name)
(import_clause (identifier) @name)
(namespace_import (identifier) @name)
(decorator (identifier) @name)
(decorator (call_expression function: (identifier) @name))
"#;

const TS_DEFS: &str = r#"
(function_declaration name: (identifier) @name) @definition
(class_declaration name: (identifier) @name) @definition
(method_definition name: (property_identifier) @name) @definition
(variable_declarator name: (identifier) @name value: (arrow_function)) @definition
(variable_declarator name: (identifier) @name value: (function_expression)) @definition
(interface_declaration name: (type_identifier) @name) @definition
(type_alias_declaration name: (type_identifier) @name) @definition
(enum_declaration name: (identifier) @name) @definition
(abstract_class_declaration name: (identifier) @name) @definition
"#;

const TS_REFS: &str = r#"
(call_expression function: (identifier) @name)
(import_specifier name: (identifier) @name)
(import_clause (identifier) @name)
(namespace_import (identifier) @name)
(decorator (identifier) @name)
(decorator (call_expression function: (identifier) @name))
(type_identifier) @name
"#;

// ---------------------------------------------------------------------------
// Python
// ---------------------------------------------------------------------------

const PY_DEFS: &str = r#"
(function_definition name: (identifier) @name) @definition
(class_definition name: (identifier) @name) @definition
"#;

const PY_REFS: &str = r#"
(call function: (identifier) @name)
(import_statement name: (dotted_name (identifier) @name))
(import_from_statement name: (dotted_name (identifier) @name))
(aliased_import name: (dotted_name (identifier) @name))
(decorator (identifier) @name)
(decorator (call function: (identifier) @name))
"#;

// ---------------------------------------------------------------------------
// Go
// ---------------------------------------------------------------------------

const GO_DEFS: &str = r#"
(function_declaration name: (identifier) @name) @definition
(method_declaration name: (field_identifier) @name) @definition
(type_spec name: (type_identifier) @name) @definition
(const_spec name: (identifier) @name) @definition
(var_spec name: (identifier) @name) @definition
"#;

const GO_REFS: &str = r#"
(call_expression function: (identifier) @name)
(type_identifier) @name
"#;

// ---------------------------------------------------------------------------
// Java
// ---------------------------------------------------------------------------

const JAVA_DEFS: &str = r#"
(method_declaration name: (identifier) @name) @definition
(constructor_declaration name: (identifier) @name) @definition
(class_declaration name: (identifier) @name) @definition
(interface_declaration name: (identifier) @name) @definition
(enum_declaration name: (identifier) @name) @definition
"#;

const JAVA_REFS: &str = r#"
(method_invocation !object name: (identifier) @name)
(import_declaration (scoped_identifier name: (identifier) @name))
(marker_annotation name: (identifier) @name)
(annotation name: (identifier) @name)
(type_identifier) @name
"#;

// ---------------------------------------------------------------------------
// C
// ---------------------------------------------------------------------------

const C_DEFS: &str = r#"
(function_definition declarator: (function_declarator declarator: (identifier) @name)) @definition
(struct_specifier name: (type_identifier) @name) @definition
(enum_specifier name: (type_identifier) @name) @definition
(type_definition declarator: (type_identifier) @name) @definition
"#;

const C_REFS: &str = r#"
(call_expression function: (identifier) @name)
(type_identifier) @name
"#;

// ---------------------------------------------------------------------------
// C++
// ---------------------------------------------------------------------------

const CPP_DEFS: &str = r#"
(function_definition declarator: (function_declarator declarator: (identifier) @name)) @definition
(function_definition declarator: (function_declarator declarator: (field_identifier) @name)) @definition
(class_specifier name: (type_identifier) @name) @definition
(struct_specifier name: (type_identifier) @name) @definition
(namespace_definition name: (namespace_identifier) @name) @definition
(enum_specifier name: (type_identifier) @name) @definition
"#;

const CPP_REFS: &str = r#"
(call_expression function: (identifier) @name)
(type_identifier) @name
"#;

// ---------------------------------------------------------------------------
// C#
// ---------------------------------------------------------------------------

const CSHARP_DEFS: &str = r#"
(method_declaration name: (identifier) @name) @definition
(class_declaration name: (identifier) @name) @definition
(interface_declaration name: (identifier) @name) @definition
(struct_declaration name: (identifier) @name) @definition
(enum_declaration name: (identifier) @name) @definition
(namespace_declaration name: (identifier) @name) @definition
"#;

const CSHARP_REFS: &str = r#"
(invocation_expression function: (identifier) @name)
(using_directive name: (identifier) @name)
(attribute name: (identifier) @name)
(identifier) @name
"#;

// ---------------------------------------------------------------------------
// PHP
// ---------------------------------------------------------------------------

const PHP_DEFS: &str = r#"
(function_definition name: (name) @name) @definition
(method_declaration name: (name) @name) @definition
(class_declaration name: (name) @name) @definition
(interface_declaration name: (name) @name) @definition
(trait_declaration name: (name) @name) @definition
(enum_declaration name: (name) @name) @definition
"#;

const PHP_REFS: &str = r#"
(function_call_expression function: (name) @name)
(namespace_use_clause (qualified_name) @name)
(attribute (name) @name)
"#;

// ---------------------------------------------------------------------------
// Kotlin
// ---------------------------------------------------------------------------

const KOTLIN_DEFS: &str = r#"
(function_declaration (simple_identifier) @name) @definition
(class_declaration (type_identifier) @name) @definition
(object_declaration (type_identifier) @name) @definition
"#;

const KOTLIN_REFS: &str = r#"
(call_expression (simple_identifier) @name)
(import_header (identifier) @name)
"#;
