//! Inner component auto-binding.
//!
//! Component classes split their markup across `render*` methods and use
//! them as tags in each other without importing them:
//!
//! ```jsx
//! class Page {
//!   renderHeader() { return <h1>Hi</h1>; }
//!   render() { return <main><Header /></main>; }
//! }
//! ```
//!
//! The transform inserts `const Header = this.renderHeader;` at the start of
//! `render` so ordinary lookup finds the sibling method. Everything outside
//! the insertion points stays byte-identical.

use oxc_allocator::Allocator;
use oxc_ast_visit::Visit;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{CompilerError, ERR_INVALID_PREFIX};
use crate::parse::{parse_module, SourceDialect};
use crate::patch::InsertionPoint;
use crate::scope::SemanticBindings;
use crate::visitor::InnerComponentCollector;

pub const DEFAULT_PREFIX: &str = "render";

// ═══════════════════════════════════════════════════════════════════════════════
// OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    /// Identity of the module, used in diagnostics and to infer the dialect.
    pub file_path: String,
    /// Overrides the dialect inferred from `file_path`.
    pub dialect: Option<SourceDialect>,
    /// Method name prefix marking component methods.
    pub prefix: String,
    /// Alias the object of member tags such as `<Menu.Item />`.
    pub alias_member_tag_objects: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            file_path: String::new(),
            dialect: None,
            prefix: DEFAULT_PREFIX.to_string(),
            alias_member_tag_objects: true,
        }
    }
}

impl TransformOptions {
    pub fn for_file(file_path: &str) -> Self {
        Self {
            file_path: file_path.to_string(),
            ..Self::default()
        }
    }

    pub fn dialect(&self) -> SourceDialect {
        self.dialect
            .unwrap_or_else(|| SourceDialect::from_path(&self.file_path))
    }

    fn validate(&self) -> Result<(), CompilerError> {
        let mut chars = self.prefix.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c == '_' || c == '$' || c.is_ascii_alphabetic());
        let valid_rest = chars.all(|c| c == '_' || c == '$' || c.is_ascii_alphanumeric());
        if valid_start && valid_rest {
            return Ok(());
        }
        Err(CompilerError::new(
            ERR_INVALID_PREFIX,
            &format!(
                "Component method prefix '{}' is not a valid identifier.",
                self.prefix
            ),
            &self.file_path,
            1,
            1,
        ))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutput {
    pub code: String,
    pub changed: bool,
    /// Applied insertion points, ascending by offset in the original text.
    pub injections: Vec<InsertionPoint>,
}

impl TransformOutput {
    fn unchanged(source: &str) -> Self {
        Self {
            code: source.to_string(),
            changed: false,
            injections: Vec::new(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSFORM
// ═══════════════════════════════════════════════════════════════════════════════

/// Transforms one module.
#[instrument(skip_all, fields(file = %options.file_path))]
pub fn transform_inner_components(
    source: &str,
    options: &TransformOptions,
) -> Result<TransformOutput, CompilerError> {
    options.validate()?;

    let allocator = Allocator::default();
    let parsed = parse_module(&allocator, source, options.dialect(), &options.file_path)?;
    let resolver = SemanticBindings::new(&parsed.scoping);

    let mut collector =
        InnerComponentCollector::new(source, &options.file_path, &options.prefix, &resolver)
            .with_member_tag_objects(options.alias_member_tag_objects);
    collector.visit_program(parsed.program);
    let plan = collector.into_plan();

    if plan.is_empty() {
        debug!("no unbound component tags, module untouched");
        return Ok(TransformOutput::unchanged(source));
    }

    let code = plan.apply(source).into_owned();
    debug!(
        points = plan.points().len(),
        aliases = plan.alias_count(),
        "inner components bound"
    );

    let mut injections = plan.into_points();
    injections.retain(|p| !p.names.is_empty());
    injections.sort_by_key(|p| p.offset);

    Ok(TransformOutput {
        code,
        changed: true,
        injections,
    })
}

/// Convenience wrapper returning only the transformed text.
pub fn transform_source(source: &str, file_path: &str) -> Result<String, CompilerError> {
    transform_inner_components(source, &TransformOptions::for_file(file_path)).map(|o| o.code)
}

// ═══════════════════════════════════════════════════════════════════════════════
// BATCH
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInput {
    pub file_path: String,
    pub source: String,
}

/// Transforms independent modules in parallel. Results keep input order and
/// a failing module never affects the others.
///
/// `base` supplies every option except the file path; an explicit dialect in
/// `base` applies to all modules.
pub fn transform_modules(
    modules: &[ModuleInput],
    base: &TransformOptions,
) -> Vec<Result<TransformOutput, CompilerError>> {
    modules
        .par_iter()
        .map(|module| {
            let options = TransformOptions {
                file_path: module.file_path.clone(),
                ..base.clone()
            };
            transform_inner_components(&module.source, &options)
        })
        .collect()
}
