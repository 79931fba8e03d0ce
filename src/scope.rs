use oxc_ast::ast::IdentifierReference;
use oxc_semantic::Scoping;
use oxc_syntax::symbol::SymbolId;

/// Answers whether a tag-name reference resolves to a declaration reachable
/// at its point of occurrence (parameter, local, import, or any enclosing
/// declaration).
pub trait BindingResolver {
    fn has_binding(&self, ident: &IdentifierReference) -> bool;
}

/// Resolver backed by the semantic model built alongside the parse.
///
/// References are resolved once by the semantic builder, so a lookup is a
/// table read rather than a walk up the scope chain.
pub struct SemanticBindings<'s> {
    scoping: &'s Scoping,
}

impl<'s> SemanticBindings<'s> {
    pub fn new(scoping: &'s Scoping) -> Self {
        Self { scoping }
    }

    /// Symbol a tag-name reference resolves to. A reference the builder
    /// never visited has no binding to report.
    pub fn resolve(&self, ident: &IdentifierReference) -> Option<SymbolId> {
        let reference_id = ident.reference_id.get()?;
        self.scoping.get_reference(reference_id).symbol_id()
    }
}

impl BindingResolver for SemanticBindings<'_> {
    fn has_binding(&self, ident: &IdentifierReference) -> bool {
        self.resolve(ident).is_some()
    }
}
