/*!
# Reports Module

Отчёты по результатам анализа.

## Поддерживаемые форматы:
- **Text** - человекочитаемый отчёт для консоли, сгруппированный по файлам
- **JSON** - структурированный отчёт для интеграций
- **SARIF 2.1.0** - для GitHub code scanning и других CI/CD систем
*/

pub mod json;
pub mod sarif;
pub mod text;

pub use json::JsonReporter;
pub use sarif::SarifReporter;
pub use text::TextReporter;

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::diagnostics::{Diagnostic, Severity};

/// Формат отчёта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Json,
    Sarif,
}

impl std::str::FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "sarif" => Ok(ReportFormat::Sarif),
            _ => Err(anyhow::anyhow!("Unknown report format: {}", s)),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Sarif => write!(f, "sarif"),
        }
    }
}

/// Диагностики одного файла.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Результат прогона по набору файлов.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisReport {
    pub files: Vec<FileReport>,
    pub files_analyzed: usize,
    /// Files that could not be read or parsed, with the reason.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<(String, String)>,
}

impl AnalysisReport {
    pub fn push(&mut self, file: impl Into<String>, diagnostics: Vec<Diagnostic>) {
        self.files_analyzed += 1;
        if !diagnostics.is_empty() {
            self.files.push(FileReport { file: file.into(), diagnostics });
        }
    }

    pub fn push_failure(&mut self, file: impl Into<String>, reason: impl Into<String>) {
        self.failures.push((file.into(), reason.into()));
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.files.iter().flat_map(|f| f.diagnostics.iter())
    }

    pub fn total(&self) -> usize {
        self.files.iter().map(|f| f.diagnostics.len()).sum()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics().filter(|d| d.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0 || !self.failures.is_empty()
    }

    /// Файлы по алфавиту, диагностики по позиции.
    pub fn sort(&mut self) {
        self.files.sort_by(|a, b| a.file.cmp(&b.file));
        for file in &mut self.files {
            file.diagnostics.sort_by_key(|d| (d.span.start, d.rule_id.clone()));
        }
        self.failures.sort();
    }
}

/// Трейт для генерации отчётов
pub trait ReportGenerator {
    fn generate_report(&self, report: &AnalysisReport) -> Result<String>;
}

pub fn generate(report: &AnalysisReport, format: ReportFormat, use_colors: bool) -> Result<String> {
    match format {
        ReportFormat::Text => TextReporter::new().with_colors(use_colors).generate_report(report),
        ReportFormat::Json => JsonReporter::new().generate_report(report),
        ReportFormat::Sarif => {
            SarifReporter::new("consolidate", env!("CARGO_PKG_VERSION")).generate_report(report)
        }
    }
}

/// Сохраняет отчёт в файл
pub fn save_report<P: AsRef<Path>>(report: &AnalysisReport, format: ReportFormat, output: P) -> Result<()> {
    let content = generate(report, format, false)?;
    std::fs::write(&output, content)?;
    tracing::info!("Saved {} report to {}", format, output.as_ref().display());
    Ok(())
}

#[cfg(test)]
pub(crate) fn sample_report() -> AnalysisReport {
    use crate::analyzer::{AnalysisEngine, CancellationToken};
    use crate::syntax::Document;

    let engine = AnalysisEngine::default();
    let document = Document::parse("bool F(bool c)\n{\n    if (c) return true;\n    return false;\n}\n")
        .unwrap()
        .with_path("src/F.cs");
    let diagnostics = engine.analyze(&document, &CancellationToken::new()).unwrap();
    let mut report = AnalysisReport::default();
    report.push(document.display_name(), diagnostics);
    report.push("src/Empty.cs", Vec::new());
    report
}
