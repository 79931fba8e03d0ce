//! # Inner Component Binding (Native Loader)
//!
//! ## Transform Invariants
//!
//! 1. **Component Methods**: a class method whose plain identifier key starts
//!    with the prefix (`render` by default, the bare prefix included).
//!
//! 2. **Qualifying Tags**: an opening tag name inside a component method that
//!    starts with an upper-case letter and resolves to no binding at its point
//!    of occurrence. `<div>` never qualifies; `<Card />` qualifies unless
//!    `Card` is a parameter, local, import or outer declaration.
//!
//! 3. **One Insertion Point per Method**: aliases go to the method's body
//!    start (first statement, else after the opening brace), in first-seen
//!    order, each name once:
//!    - `<Header />` → `const Header = this.renderHeader;`
//!
//! 4. **Nested Methods**: tags are charged to the innermost component method
//!    whose body contains them. A component method declared inside another
//!    one collects its own tags; tags in its parameter defaults belong to the
//!    enclosing method, since initializers cannot see body declarations.
//!
//! 5. **Byte Fidelity**: the original text is spliced, never re-printed.
//!    Offsets come from the untouched original and points are applied from
//!    the end of the buffer backward. A module with nothing to alias is
//!    returned as-is.
//!
//! 6. **Idempotence**: injected aliases are bindings, so a second run finds
//!    nothing left to alias.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod error;
mod parse;
mod patch;
mod scope;
mod tracing_config;
mod transform;
mod visitor;

#[cfg(test)]
mod parse_tests;

pub use error::{CompilerError, SourceLocation, ERR_INVALID_PREFIX, ERR_SYNTAX};
pub use parse::{parse_module, ParsedModule, SourceDialect};
pub use patch::{alias_declaration, InsertionPoint, Layout, PatchPlan};
pub use scope::{BindingResolver, SemanticBindings};
pub use tracing_config::init_tracing;
pub use transform::{
    transform_inner_components, transform_modules, transform_source, ModuleInput,
    TransformOptions, TransformOutput, DEFAULT_PREFIX,
};
pub use visitor::{body_start, component_method_name, is_component_tag, InnerComponentCollector};

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI LOADER BINDINGS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
fn native_options(options: Option<serde_json::Value>) -> napi::Result<TransformOptions> {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(init_tracing);

    match options {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| napi::Error::from_reason(format!("Invalid transform options: {}", e))),
        None => Ok(TransformOptions::default()),
    }
}

#[cfg(feature = "napi")]
#[napi]
pub fn inner_components_bridge() -> String {
    "Inner Components Native Bridge Connected".to_string()
}

/// Loader entry point: one module in, `{ code, changed, injections }` out.
#[cfg(feature = "napi")]
#[napi]
pub fn transform_inner_components_native(
    source: String,
    options: Option<serde_json::Value>,
) -> napi::Result<serde_json::Value> {
    let options = native_options(options)?;
    let output = transform_inner_components(&source, &options)
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    serde_json::to_value(output).map_err(|e| napi::Error::from_reason(e.to_string()))
}

/// Batch entry point: `[{ filePath, source }]` in, one
/// `{ filePath, code?, changed?, error? }` per module out, in input order.
#[cfg(feature = "napi")]
#[napi]
pub fn transform_modules_native(
    modules: serde_json::Value,
    options: Option<serde_json::Value>,
) -> napi::Result<serde_json::Value> {
    let options = native_options(options)?;
    let modules: Vec<ModuleInput> = serde_json::from_value(modules)
        .map_err(|e| napi::Error::from_reason(format!("Invalid module list: {}", e)))?;

    let results = transform_modules(&modules, &options)
        .into_iter()
        .zip(&modules)
        .map(|(result, module)| match result {
            Ok(output) => serde_json::json!({
                "filePath": module.file_path,
                "code": output.code,
                "changed": output.changed,
            }),
            Err(err) => serde_json::json!({
                "filePath": module.file_path,
                "error": err,
            }),
        })
        .collect::<Vec<_>>();

    Ok(serde_json::Value::Array(results))
}
