//! Parse Module for the inner component transform
//!
//! Parses one module with Oxc and resolves its scopes, producing the tree
//! (with byte spans) and the scoping tables that the alias engine queries.

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::Parser;
use oxc_semantic::{Scoping, SemanticBuilder};
use oxc_span::SourceType;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CompilerError, ERR_SYNTAX};

// ═══════════════════════════════════════════════════════════════════════════════
// SOURCE DIALECT
// ═══════════════════════════════════════════════════════════════════════════════

/// Syntax dialect of a module. Selects which parser capabilities are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceDialect {
    /// JavaScript. Component sources routinely carry JSX in `.js` files, so
    /// JSX stays enabled.
    Js,
    Jsx,
    /// TypeScript without JSX (`<T>expr` is a type assertion here).
    Ts,
    #[default]
    Tsx,
}

impl SourceDialect {
    /// Infers the dialect from a file extension, falling back to `Tsx`,
    /// the most permissive dialect.
    pub fn from_path(path: &str) -> Self {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("js") | Some("mjs") | Some("cjs") => SourceDialect::Js,
            Some("jsx") => SourceDialect::Jsx,
            Some("ts") | Some("mts") | Some("cts") => SourceDialect::Ts,
            _ => SourceDialect::Tsx,
        }
    }

    pub fn source_type(self) -> SourceType {
        let base = SourceType::default().with_module(true);
        match self {
            SourceDialect::Js | SourceDialect::Jsx => base.with_jsx(true),
            SourceDialect::Ts => base.with_typescript(true),
            SourceDialect::Tsx => base.with_typescript(true).with_jsx(true),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSED MODULE
// ═══════════════════════════════════════════════════════════════════════════════

/// A parsed module: the arena-allocated program plus its resolved scopes.
///
/// Every `IdentifierReference` in `program` carries a reference id that
/// `scoping` resolves.
pub struct ParsedModule<'a> {
    pub program: &'a Program<'a>,
    pub scoping: Scoping,
}

/// Parses `source` and builds its semantic model.
///
/// Any parser or binder diagnostic aborts the module: the first one
/// determines the reported location, the rest become hints.
pub fn parse_module<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    dialect: SourceDialect,
    file_path: &str,
) -> Result<ParsedModule<'a>, CompilerError> {
    let ret = Parser::new(allocator, source, dialect.source_type()).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let diagnostics = ret.errors.iter().map(to_diagnostic).collect::<Vec<_>>();
        return Err(syntax_error(source, file_path, diagnostics));
    }

    let program: &'a Program<'a> = allocator.alloc(ret.program);
    let semantic_ret = SemanticBuilder::new()
        .with_check_syntax_error(true)
        .build(program);

    if !semantic_ret.errors.is_empty() {
        let diagnostics = semantic_ret
            .errors
            .iter()
            .map(to_diagnostic)
            .collect::<Vec<_>>();
        return Err(syntax_error(source, file_path, diagnostics));
    }

    Ok(ParsedModule {
        program,
        scoping: semantic_ret.semantic.into_scoping(),
    })
}

struct Diagnostic {
    message: String,
    offset: Option<u32>,
}

fn to_diagnostic(error: &OxcDiagnostic) -> Diagnostic {
    Diagnostic {
        message: error.message.to_string(),
        offset: error
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| label.offset() as u32),
    }
}

fn syntax_error(source: &str, file_path: &str, diagnostics: Vec<Diagnostic>) -> CompilerError {
    let mut diagnostics = diagnostics.into_iter();
    let Some(first) = diagnostics.next() else {
        return CompilerError::new(ERR_SYNTAX, "Parser aborted", file_path, 1, 1);
    };

    let mut err = CompilerError::at_offset(
        ERR_SYNTAX,
        &first.message,
        file_path,
        source,
        first.offset.unwrap_or(0),
    );
    err.hints = diagnostics.map(|d| d.message).collect();
    err
}
