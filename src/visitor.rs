//! Traversal and decision half of the alias engine.
//!
//! `InnerComponentCollector` walks a parsed module once. It keeps a stack of
//! the component methods it is inside, so every tag reference is charged to
//! the innermost one and never leaks into an enclosing or nested sibling.
//!
//! Only a method's body belongs to its frame. Parameter initializers cannot
//! see declarations made in the body, so tags there are charged to the
//! enclosing component method, if any.

use lazy_static::lazy_static;
use oxc_ast::ast::{
    FunctionBody, IdentifierReference, JSXElementName, JSXMemberExpression,
    JSXMemberExpressionObject, JSXOpeningElement, MethodDefinition, PropertyKey,
};
use oxc_ast_visit::{walk, Visit};
use oxc_span::GetSpan;
use regex::Regex;
use tracing::{debug, trace, warn};

use crate::patch::{Layout, PatchPlan};
use crate::scope::BindingResolver;

lazy_static! {
    /// Component tags start with an upper-case letter; everything else is an
    /// intrinsic element.
    static ref COMPONENT_TAG_RE: Regex = Regex::new(r"^[A-Z]").unwrap();
}

pub fn is_component_tag(name: &str) -> bool {
    COMPONENT_TAG_RE.is_match(name)
}

/// Name of `method` if it is a component method for `prefix`.
///
/// Only plain identifier keys count: `#renderX`, `['renderX']` and
/// `'renderX'` keys are ignored.
pub fn component_method_name<'m>(method: &'m MethodDefinition, prefix: &str) -> Option<&'m str> {
    match &method.key {
        PropertyKey::StaticIdentifier(id) if !method.computed && id.name.starts_with(prefix) => {
            Some(id.name.as_str())
        }
        _ => None,
    }
}

/// Offset where aliases go: before the first statement, after a trailing
/// directive prologue, or right after the opening brace of an empty body.
pub fn body_start(source: &str, body: &FunctionBody) -> (u32, Layout) {
    if let Some(first) = body.statements.first() {
        let offset = first.span().start;
        return (offset, Layout::before_statement(source, offset));
    }
    if let Some(directive) = body.directives.last() {
        let (start, end) = (directive.span.start as usize, directive.span.end as usize);
        if source[start..end].trim_end().ends_with(';') {
            return (end as u32, Layout::Appended);
        }
        let rest = &source[end..];
        let gap = rest.len() - rest.trim_start().len();
        if rest[gap..].starts_with(';') {
            return ((end + gap + 1) as u32, Layout::Appended);
        }
        return (end as u32, Layout::AfterUnterminated);
    }
    (body.span.start + 1, Layout::Appended)
}

struct ComponentMethod {
    name: String,
    insertion: (u32, Layout),
}

pub struct InnerComponentCollector<'s, R: BindingResolver> {
    source: &'s str,
    file_path: &'s str,
    prefix: &'s str,
    resolver: &'s R,
    alias_member_tag_objects: bool,
    methods: Vec<ComponentMethod>,
    plan: PatchPlan,
}

impl<'s, R: BindingResolver> InnerComponentCollector<'s, R> {
    pub fn new(source: &'s str, file_path: &'s str, prefix: &'s str, resolver: &'s R) -> Self {
        Self {
            source,
            file_path,
            prefix,
            resolver,
            alias_member_tag_objects: true,
            methods: Vec::new(),
            plan: PatchPlan::new(prefix),
        }
    }

    pub fn with_member_tag_objects(mut self, enabled: bool) -> Self {
        self.alias_member_tag_objects = enabled;
        self
    }

    pub fn into_plan(self) -> PatchPlan {
        self.plan
    }

    fn consider(&mut self, ident: &IdentifierReference, member_object: bool) {
        let Some(method) = self.methods.last() else {
            return;
        };
        let name = ident.name.as_str();

        if !is_component_tag(name) {
            return;
        }
        if self.resolver.has_binding(ident) {
            trace!(tag = name, method = %method.name, "tag already bound, skipping");
            return;
        }

        let (offset, layout) = method.insertion.clone();

        if member_object {
            warn!(
                tag = name,
                method = %method.name,
                file = self.file_path,
                "aliasing the object of a member tag as an inner component"
            );
        }

        let method_name = method.name.clone();
        if self.plan.point_at(offset, &method_name, layout).push_name(name) {
            debug!(tag = name, method = %method_name, offset, "inner component alias");
        }
    }
}

fn member_tag_root<'a, 'm>(member: &'m JSXMemberExpression<'a>) -> Option<&'m IdentifierReference<'a>> {
    match &member.object {
        JSXMemberExpressionObject::IdentifierReference(ident) => Some(&**ident),
        JSXMemberExpressionObject::MemberExpression(inner) => member_tag_root(inner),
        JSXMemberExpressionObject::ThisExpression(_) => None,
    }
}

impl<'a, R: BindingResolver> Visit<'a> for InnerComponentCollector<'_, R> {
    fn visit_method_definition(&mut self, def: &MethodDefinition<'a>) {
        let Some(name) = component_method_name(def, self.prefix) else {
            walk::walk_method_definition(self, def);
            return;
        };

        for decorator in &def.decorators {
            self.visit_decorator(decorator);
        }
        self.visit_property_key(&def.key);
        self.visit_formal_parameters(&def.value.params);

        // Abstract methods and overload signatures have nothing to bind into.
        let Some(body) = &def.value.body else {
            return;
        };
        self.methods.push(ComponentMethod {
            name: name.to_string(),
            insertion: body_start(self.source, body),
        });
        self.visit_function_body(body);
        self.methods.pop();
    }

    fn visit_jsx_opening_element(&mut self, el: &JSXOpeningElement<'a>) {
        match &el.name {
            JSXElementName::IdentifierReference(ident) => self.consider(ident, false),
            JSXElementName::MemberExpression(member) if self.alias_member_tag_objects => {
                if let Some(ident) = member_tag_root(member) {
                    self.consider(ident, true);
                }
            }
            _ => {}
        }
        walk::walk_jsx_opening_element(self, el);
    }
}
