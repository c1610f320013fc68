//! JSON-отчёт: сериализация `AnalysisReport` как есть плюс сводка.

use anyhow::{Context, Result};
use serde::Serialize;

use super::{AnalysisReport, ReportGenerator};
use crate::diagnostics::Severity;

#[derive(Serialize)]
struct Summary {
    total: usize,
    errors: usize,
    warnings: usize,
    info: usize,
    hints: usize,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    tool: &'static str,
    version: &'static str,
    summary: Summary,
    #[serde(flatten)]
    report: &'a AnalysisReport,
}

pub struct JsonReporter {
    pretty: bool,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate_report(&self, report: &AnalysisReport) -> Result<String> {
        let document = JsonDocument {
            tool: "consolidate",
            version: env!("CARGO_PKG_VERSION"),
            summary: Summary {
                total: report.total(),
                errors: report.count(Severity::Error),
                warnings: report.count(Severity::Warning),
                info: report.count(Severity::Info),
                hints: report.count(Severity::Hint),
            },
            report,
        };
        let json = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };
        json.context("Failed to serialize JSON report")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::sample_report;

    #[test]
    fn json_contains_diagnostics_and_summary() {
        let json = JsonReporter::new().compact().generate_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["total"], 1);
        assert_eq!(value["files_analyzed"], 2);
        let diagnostic = &value["files"][0]["diagnostics"][0];
        assert_eq!(diagnostic["rule_id"], "MRG004");
        assert_eq!(diagnostic["severity"], "info");
        assert_eq!(diagnostic["family"], "SimplifyIfToReturn");
        assert!(value.get("failures").is_none());
    }
}
