/*!
# Text Reporter

Консольный отчёт: диагностики сгруппированы по файлам, в конце сводка.
Цвета через `colored`; без цветов вывод пригоден для CI-логов.
*/

use anyhow::Result;
use colored::{ColoredString, Colorize};
use std::fmt::Write;

use super::{AnalysisReport, ReportGenerator};
use crate::diagnostics::Severity;

pub struct TextReporter {
    use_colors: bool,
    /// Показывать справку правила под каждой диагностикой
    show_help: bool,
}

impl TextReporter {
    pub fn new() -> Self {
        Self { use_colors: true, show_help: false }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn with_help(mut self, show_help: bool) -> Self {
        self.show_help = show_help;
        self
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.use_colors { style(text).to_string() } else { text.to_string() }
    }

    fn severity_label(&self, severity: Severity) -> String {
        let label = severity.to_string();
        self.paint(&label, |s| match severity {
            Severity::Error => s.red().bold(),
            Severity::Warning => s.yellow().bold(),
            Severity::Info => s.blue(),
            Severity::Hint => s.dimmed(),
        })
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TextReporter {
    fn generate_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut out = String::new();
        for file in &report.files {
            writeln!(out, "{}", self.paint(&file.file, |s| s.bold().underline()))?;
            for diagnostic in &file.diagnostics {
                writeln!(
                    out,
                    "  {}:{}  {} {} {}",
                    diagnostic.location.line + 1,
                    diagnostic.location.column + 1,
                    self.severity_label(diagnostic.severity),
                    self.paint(&format!("[{}]", diagnostic.rule_id), |s| s.cyan()),
                    diagnostic.message
                )?;
                if self.show_help {
                    let help = crate::rules::BuiltinRules::descriptor(diagnostic.family).help;
                    writeln!(out, "      {}", self.paint(help, |s| s.dimmed()))?;
                }
            }
            writeln!(out)?;
        }
        for (file, reason) in &report.failures {
            writeln!(out, "{} {}: {}", self.paint("failed", |s| s.red().bold()), file, reason)?;
        }

        let total = report.total();
        let summary = format!(
            "{} issue(s) in {} of {} file(s): {} error(s), {} warning(s), {} info, {} hint(s)",
            total,
            report.files.len(),
            report.files_analyzed,
            report.count(Severity::Error),
            report.count(Severity::Warning),
            report.count(Severity::Info),
            report.count(Severity::Hint),
        );
        if total == 0 {
            writeln!(out, "{}", self.paint("No consolidation opportunities found", |s| s.green()))?;
        } else {
            writeln!(out, "{}", self.paint(&summary, |s| s.bold()))?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::sample_report;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_groups_by_file() {
        let text = TextReporter::new().with_colors(false).generate_report(&sample_report()).unwrap();
        assert_eq!(
            text,
            "src/F.cs\n  \
             3:5  info [MRG004] 'if' returning boolean literals can be replaced with a single return\n\n\
             1 issue(s) in 1 of 2 file(s): 0 error(s), 0 warning(s), 1 info, 0 hint(s)\n"
        );
    }

    #[test]
    fn empty_report_says_so() {
        let text = TextReporter::new().with_colors(false).generate_report(&AnalysisReport::default()).unwrap();
        assert_eq!(text, "No consolidation opportunities found\n");
    }

    #[test]
    fn help_lines_are_optional() {
        let text = TextReporter::new()
            .with_colors(false)
            .with_help(true)
            .generate_report(&sample_report())
            .unwrap();
        assert!(text.contains("      Return the condition (or its negation)."));
    }
}
