//! Структуры для диагностических сообщений

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analyzer::RuleFamily;
use crate::core::{LineIndex, PackedSpan};
use crate::syntax::SyntaxKind;

/// Уровень серьезности диагностики
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Hint => "hint",
        };
        f.write_str(name)
    }
}

/// Местоположение в исходном коде (строка и колонка с нуля)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub length: usize,
}

impl Location {
    pub fn new(file: String, line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self { file, line, column, offset, length }
    }

    pub fn from_span(file: impl Into<String>, index: &LineIndex, span: PackedSpan) -> Self {
        let start = index.to_position(span.start);
        Self::new(file.into(), start.line, start.column, start.offset, span.len as usize)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line + 1, self.column + 1)
    }
}

/// Static description of one rule.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticDescriptor {
    pub id: &'static str,
    pub family: RuleFamily,
    pub title: &'static str,
    /// Шаблон сообщения; `{name}` подставляется из аргументов.
    pub message: &'static str,
    pub default_severity: Severity,
    pub category: &'static str,
    pub help: &'static str,
}

/// Подставляет `{key}` из аргументов в шаблон.
pub fn render_message(template: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

/// Диагностическое сообщение
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule_id: String,
    pub family: RuleFamily,
    pub severity: Severity,
    pub message: String,
    pub location: Location,
    pub span: PackedSpan,
    /// Диапазоны, которые редактор показывает «затухшими» до применения исправления.
    #[serde(default)]
    pub fade_out: Vec<PackedSpan>,
    /// Якорный узел, по которому исправление находит кандидата повторно.
    pub anchor_span: PackedSpan,
    pub anchor_kind: SyntaxKind,
    /// Версия снимка, для которой получена диагностика.
    pub version: u64,
}

impl Diagnostic {
    pub fn new(
        descriptor: &DiagnosticDescriptor,
        severity: Severity,
        location: Location,
        span: PackedSpan,
        anchor: (PackedSpan, SyntaxKind),
        version: u64,
    ) -> Self {
        Self {
            rule_id: descriptor.id.to_string(),
            family: descriptor.family,
            severity,
            message: descriptor.message.to_string(),
            location,
            span,
            fade_out: Vec::new(),
            anchor_span: anchor.0,
            anchor_kind: anchor.1,
            version,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_fade_out(mut self, spans: Vec<PackedSpan>) -> Self {
        self.fade_out = spans;
        self
    }

    pub fn is_error(&self) -> bool { self.severity == Severity::Error }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}] {}", self.location, self.severity, self.rule_id, self.message)
    }
}
