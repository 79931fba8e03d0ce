#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_SYNTAX: &str = "IC-ERR-SYNTAX-001";
pub const ERR_INVALID_PREFIX: &str = "IC-ERR-CONFIG-001";

// ═══════════════════════════════════════════════════════════════════════════════
// GUARANTEES
// ═══════════════════════════════════════════════════════════════════════════════

fn get_guarantee(code: &str) -> &'static str {
    match code {
        ERR_SYNTAX => "Modules are only transformed when they parse cleanly; nothing is emitted otherwise.",
        ERR_INVALID_PREFIX => "Alias targets are always valid member names.",
        _ => "Unknown invariant.",
    }
}

fn get_error_type(code: &str) -> &'static str {
    match code {
        ERR_SYNTAX => "SYNTAX_ERROR",
        ERR_INVALID_PREFIX => "CONFIGURATION_ERROR",
        _ => "TRANSFORM_ERROR",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
#[error("{file}:{line}:{column}: [{code}] {message}")]
pub struct CompilerError {
    pub code: String,
    pub error_type: String,
    pub message: String,
    pub guarantee: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub context: Option<String>,
    pub hints: Vec<String>,
}

impl CompilerError {
    pub fn new(code: &str, message: &str, file: &str, line: u32, column: u32) -> Self {
        Self::with_details(code, message, file, line, column, None, vec![])
    }

    pub fn with_details(
        code: &str,
        message: &str,
        file: &str,
        line: u32,
        column: u32,
        context: Option<String>,
        hints: Vec<String>,
    ) -> Self {
        CompilerError {
            code: code.to_string(),
            error_type: get_error_type(code).to_string(),
            message: message.to_string(),
            guarantee: get_guarantee(code).to_string(),
            file: file.to_string(),
            line,
            column,
            context,
            hints,
        }
    }

    /// Builds an error positioned at a byte offset of `source`, attaching the
    /// offending line as context.
    pub fn at_offset(code: &str, message: &str, file: &str, source: &str, offset: u32) -> Self {
        let location = SourceLocation::from_offset(source, offset);
        let context = line_text(source, offset).map(str::to_string);
        Self::with_details(
            code,
            message,
            file,
            location.line,
            location.column,
            context,
            vec![],
        )
    }

    pub fn is_syntax_error(&self) -> bool {
        self.code == ERR_SYNTAX
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SOURCE LOCATIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// 1-based line and column. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn from_offset(source: &str, offset: u32) -> Self {
        let offset = clamp_to_char_boundary(source, offset as usize);
        let before = &source[..offset];
        let line = before.matches('\n').count() as u32 + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() as u32 + 1;
        SourceLocation { line, column }
    }
}

fn clamp_to_char_boundary(source: &str, offset: usize) -> usize {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fn line_text(source: &str, offset: u32) -> Option<&str> {
    let offset = clamp_to_char_boundary(source, offset as usize);
    let start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = source[offset..]
        .find('\n')
        .map(|i| offset + i)
        .unwrap_or(source.len());
    let line = source[start..end].trim_end_matches('\r');
    if line.trim().is_empty() {
        None
    } else {
        Some(line)
    }
}
