//! Non-destructive multi-point patching.
//!
//! A `PatchPlan` is a set of insertion points over the untouched original
//! text. Applying it cuts the text at every point from the end of the buffer
//! backward, so no offset is ever recomputed after an earlier insertion.

use serde::Serialize;
use std::borrow::Cow;

/// How generated declarations sit relative to the text at the insertion
/// offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Layout {
    /// The offset starts a line: each declaration is followed by a line
    /// break and the line's original indentation.
    Line { newline: String, indent: String },
    /// The offset is a statement sharing its line with earlier text: each
    /// declaration is followed by a space.
    Inline,
    /// The offset follows an opening brace or directive: each declaration is
    /// preceded by a space.
    Appended,
    /// The offset follows a directive without its own `;`. The directive is
    /// terminated once, then declarations are laid out as `Appended`.
    AfterUnterminated,
}

impl Layout {
    /// Layout for declarations inserted before the statement at `offset`.
    pub fn before_statement(source: &str, offset: u32) -> Self {
        let offset = offset as usize;
        let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let indent = &source[line_start..offset];
        if line_start == 0 || !indent.chars().all(|c| c == ' ' || c == '\t') {
            return Layout::Inline;
        }
        let newline = if source[..line_start].ends_with("\r\n") {
            "\r\n"
        } else {
            "\n"
        };
        Layout::Line {
            newline: newline.to_string(),
            indent: indent.to_string(),
        }
    }

    fn write(&self, declaration: &str, out: &mut String) {
        match self {
            Layout::Line { newline, indent } => {
                out.push_str(declaration);
                out.push_str(newline);
                out.push_str(indent);
            }
            Layout::Inline => {
                out.push_str(declaration);
                out.push(' ');
            }
            Layout::Appended | Layout::AfterUnterminated => {
                out.push(' ');
                out.push_str(declaration);
            }
        }
    }

    fn lead(&self) -> &'static str {
        match self {
            Layout::AfterUnterminated => ";",
            _ => "",
        }
    }
}

/// All aliases owed to one component method, keyed by its body-start offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertionPoint {
    pub offset: u32,
    pub method: String,
    /// First-seen order, no duplicates.
    pub names: Vec<String>,
    pub layout: Layout,
}

impl InsertionPoint {
    pub fn new(offset: u32, method: &str, layout: Layout) -> Self {
        Self {
            offset,
            method: method.to_string(),
            names: Vec::new(),
            layout,
        }
    }

    /// Appends `name` unless already present. Returns whether it was added.
    pub fn push_name(&mut self, name: &str) -> bool {
        if self.names.iter().any(|n| n == name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    fn render(&self, prefix: &str) -> String {
        let mut out = String::from(self.layout.lead());
        for name in &self.names {
            let declaration = alias_declaration(prefix, name);
            self.layout.write(&declaration, &mut out);
        }
        out
    }
}

/// `const Header = this.renderHeader;`
pub fn alias_declaration(prefix: &str, name: &str) -> String {
    format!("const {} = this.{}{};", name, prefix, name)
}

#[derive(Debug, Clone)]
pub struct PatchPlan {
    prefix: String,
    points: Vec<InsertionPoint>,
}

impl PatchPlan {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            points: Vec::new(),
        }
    }

    /// Returns the insertion point at `offset`, creating it on first use.
    /// The method and layout of an existing point are kept.
    pub fn point_at(&mut self, offset: u32, method: &str, layout: Layout) -> &mut InsertionPoint {
        let index = match self.points.iter().position(|p| p.offset == offset) {
            Some(index) => index,
            None => {
                self.points.push(InsertionPoint::new(offset, method, layout));
                self.points.len() - 1
            }
        };
        &mut self.points[index]
    }

    pub fn points(&self) -> &[InsertionPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<InsertionPoint> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.iter().all(|p| p.names.is_empty())
    }

    pub fn alias_count(&self) -> usize {
        self.points.iter().map(|p| p.names.len()).sum()
    }

    /// Splices every point's declarations into `source`.
    ///
    /// Points are visited by descending offset; each step emits the text
    /// since the previous cut followed by the point's declarations, and the
    /// pieces are reassembled in forward order at the end.
    pub fn apply<'s>(&self, source: &'s str) -> Cow<'s, str> {
        if self.is_empty() {
            return Cow::Borrowed(source);
        }

        let mut ordered: Vec<&InsertionPoint> =
            self.points.iter().filter(|p| !p.names.is_empty()).collect();
        ordered.sort_by(|a, b| b.offset.cmp(&a.offset));

        let mut pieces: Vec<Cow<'s, str>> = Vec::with_capacity(ordered.len() * 2 + 1);
        let mut last = source.len();
        for point in ordered {
            let offset = point.offset as usize;
            debug_assert!(offset <= last && source.is_char_boundary(offset));
            pieces.push(Cow::Borrowed(&source[offset..last]));
            pieces.push(Cow::Owned(point.render(&self.prefix)));
            last = offset;
        }
        pieces.push(Cow::Borrowed(&source[..last]));
        pieces.reverse();

        Cow::Owned(pieces.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_name_deduplicates_in_first_seen_order() {
        let mut point = InsertionPoint::new(0, "render", Layout::Inline);
        assert!(point.push_name("B"));
        assert!(point.push_name("A"));
        assert!(!point.push_name("B"));
        assert_eq!(point.names, vec!["B", "A"]);
    }

    #[test]
    fn test_point_at_reuses_existing_offset() {
        let mut plan = PatchPlan::new("render");
        plan.point_at(10, "render", Layout::Inline).push_name("A");
        plan.point_at(10, "render", Layout::Appended).push_name("B");
        assert_eq!(plan.points().len(), 1);
        assert_eq!(plan.points()[0].names, vec!["A", "B"]);
        assert_eq!(plan.points()[0].layout, Layout::Inline);
    }

    #[test]
    fn test_empty_plan_borrows_source() {
        let plan = PatchPlan::new("render");
        let source = "class A {}";
        assert!(matches!(plan.apply(source), Cow::Borrowed(s) if s == source));
    }

    #[test]
    fn test_apply_multiple_points_keeps_original_offsets() {
        let source = "{ a; } { b; }";
        let mut plan = PatchPlan::new("render");
        // Registered out of order on purpose.
        plan.point_at(2, "renderA", Layout::Inline).push_name("X");
        plan.point_at(9, "renderB", Layout::Inline).push_name("Y");
        plan.point_at(2, "renderA", Layout::Inline).push_name("Z");
        let out = plan.apply(source);
        assert_eq!(
            out,
            "{ const X = this.renderX; const Z = this.renderZ; a; } { const Y = this.renderY; b; }"
        );
    }

    #[test]
    fn test_line_layout_reuses_indentation() {
        let source = "render() {\n    return 1;\n}";
        let offset = source.find("return").unwrap() as u32;
        let layout = Layout::before_statement(source, offset);
        assert_eq!(
            layout,
            Layout::Line {
                newline: "\n".to_string(),
                indent: "    ".to_string()
            }
        );

        let mut plan = PatchPlan::new("render");
        plan.point_at(offset, "render", layout).push_name("Card");
        assert_eq!(
            plan.apply(source),
            "render() {\n    const Card = this.renderCard;\n    return 1;\n}"
        );
    }

    #[test]
    fn test_line_layout_keeps_crlf() {
        let source = "render() {\r\n\treturn 1;\r\n}";
        let offset = source.find("return").unwrap() as u32;
        let mut plan = PatchPlan::new("render");
        plan.point_at(offset, "render", Layout::before_statement(source, offset))
            .push_name("Card");
        assert_eq!(
            plan.apply(source),
            "render() {\r\n\tconst Card = this.renderCard;\r\n\treturn 1;\r\n}"
        );
    }

    #[test]
    fn test_appended_layout_after_brace() {
        let source = "render() {}";
        let mut plan = PatchPlan::new("render");
        plan.point_at(10, "render", Layout::Appended).push_name("Icon");
        assert_eq!(plan.apply(source), "render() { const Icon = this.renderIcon;}");
    }

    #[test]
    fn test_unterminated_directive_is_closed_once() {
        let source = "render() { \"use client\" }";
        let offset = source.find(" }").unwrap() as u32;
        let mut plan = PatchPlan::new("render");
        let point = plan.point_at(offset, "render", Layout::AfterUnterminated);
        point.push_name("A");
        point.push_name("B");
        assert_eq!(
            plan.apply(source),
            "render() { \"use client\"; const A = this.renderA; const B = this.renderB; }"
        );
    }

    #[test]
    fn test_apply_preserves_multibyte_text() {
        let source = "// héllo\nrender() { return 1; }";
        let offset = source.find("return").unwrap() as u32;
        let mut plan = PatchPlan::new("render");
        plan.point_at(offset, "render", Layout::before_statement(source, offset))
            .push_name("Card");
        assert_eq!(
            plan.apply(source),
            "// héllo\nrender() { const Card = this.renderCard; return 1; }"
        );
        assert_eq!(plan.alias_count(), 1);
    }
}
