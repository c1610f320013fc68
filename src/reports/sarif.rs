/*!
# SARIF Reporter

Отчёт в формате SARIF 2.1.0 (GitHub code scanning, Azure DevOps и т.п.).
Диапазоны fade-out выгружаются как `relatedLocations`.
*/

use anyhow::{Context, Result};
use serde::Serialize;

use super::{AnalysisReport, ReportGenerator};
use crate::diagnostics::{Diagnostic, Severity};
use crate::rules::BuiltinRules;

const SARIF_SCHEMA: &str = "https://json.schemastore.org/sarif-2.1.0.json";

#[derive(Debug, Clone, Serialize)]
pub struct SarifReport {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    pub short_description: SarifText,
    pub full_description: SarifText,
    pub help: SarifText,
    pub default_configuration: SarifConfiguration,
    pub properties: SarifRuleProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifRuleProperties {
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifConfiguration {
    pub level: SarifLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SarifLevel {
    Error,
    Warning,
    Note,
    None,
}

impl From<Severity> for SarifLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => SarifLevel::Error,
            Severity::Warning => SarifLevel::Warning,
            Severity::Info => SarifLevel::Note,
            Severity::Hint => SarifLevel::None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifText {
    pub text: String,
}

impl SarifText {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub rule_id: String,
    pub rule_index: usize,
    pub level: SarifLevel,
    pub message: SarifText,
    pub locations: Vec<SarifLocation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_locations: Vec<SarifLocation>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<usize>,
    pub physical_location: SarifPhysicalLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<SarifText>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifPhysicalLocation {
    pub artifact_location: SarifArtifactLocation,
    pub region: SarifRegion,
}

#[derive(Debug, Clone, Serialize)]
pub struct SarifArtifactLocation {
    pub uri: String,
}

/// Регион: строки и колонки с единицы, смещения в байтах.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifRegion {
    pub start_line: usize,
    pub start_column: usize,
    pub char_offset: usize,
    pub char_length: usize,
}

pub struct SarifReporter {
    tool_name: String,
    tool_version: String,
}

impl SarifReporter {
    pub fn new(tool_name: &str, tool_version: &str) -> Self {
        Self { tool_name: tool_name.to_string(), tool_version: tool_version.to_string() }
    }

    fn rules() -> Vec<SarifRule> {
        BuiltinRules::descriptors()
            .iter()
            .map(|d| SarifRule {
                id: d.id.to_string(),
                name: d.family.to_string(),
                short_description: SarifText::new(d.title),
                full_description: SarifText::new(d.message),
                help: SarifText::new(d.help),
                default_configuration: SarifConfiguration { level: d.default_severity.into() },
                properties: SarifRuleProperties { category: d.category.to_string() },
            })
            .collect()
    }

    fn uri(file: &str) -> String {
        file.replace('\\', "/")
    }

    fn convert(file: &str, diagnostic: &Diagnostic) -> SarifResult {
        let uri = Self::uri(file);
        let location = SarifLocation {
            id: None,
            physical_location: SarifPhysicalLocation {
                artifact_location: SarifArtifactLocation { uri: uri.clone() },
                region: SarifRegion {
                    start_line: diagnostic.location.line + 1,
                    start_column: diagnostic.location.column + 1,
                    char_offset: diagnostic.location.offset,
                    char_length: diagnostic.location.length,
                },
            },
            message: None,
        };
        // для fade-out известны только смещения; строку берём из основной позиции
        let related_locations = diagnostic
            .fade_out
            .iter()
            .enumerate()
            .map(|(i, span)| SarifLocation {
                id: Some(i + 1),
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifactLocation { uri: uri.clone() },
                    region: SarifRegion {
                        start_line: diagnostic.location.line + 1,
                        start_column: 1,
                        char_offset: span.start as usize,
                        char_length: span.len as usize,
                    },
                },
                message: Some(SarifText::new("fade out")),
            })
            .collect();
        SarifResult {
            rule_id: diagnostic.rule_id.clone(),
            rule_index: diagnostic.family as usize,
            level: diagnostic.severity.into(),
            message: SarifText::new(diagnostic.message.clone()),
            locations: vec![location],
            related_locations,
        }
    }

    pub fn build(&self, report: &AnalysisReport) -> SarifReport {
        let results = report
            .files
            .iter()
            .flat_map(|file| file.diagnostics.iter().map(move |d| Self::convert(&file.file, d)))
            .collect();
        SarifReport {
            schema: SARIF_SCHEMA.to_string(),
            version: "2.1.0".to_string(),
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: self.tool_name.clone(),
                        version: self.tool_version.clone(),
                        rules: Self::rules(),
                    },
                },
                results,
            }],
        }
    }
}

impl ReportGenerator for SarifReporter {
    fn generate_report(&self, report: &AnalysisReport) -> Result<String> {
        serde_json::to_string_pretty(&self.build(report)).context("Failed to serialize SARIF report")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::sample_report;

    #[test]
    fn sarif_document_shape() {
        let json = SarifReporter::new("consolidate", "0.0.1").generate_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], "2.1.0");
        assert_eq!(value["$schema"], SARIF_SCHEMA);

        let run = &value["runs"][0];
        assert_eq!(run["tool"]["driver"]["rules"].as_array().unwrap().len(), 6);
        let result = &run["results"][0];
        assert_eq!(result["ruleId"], "MRG004");
        assert_eq!(result["ruleIndex"], 3);
        assert_eq!(result["level"], "note");
        let region = &result["locations"][0]["physicalLocation"]["region"];
        assert_eq!(region["startLine"], 3);
        assert_eq!(region["startColumn"], 5);
        // у if->return нет затухающих диапазонов
        assert!(result.get("relatedLocations").is_none());
    }

    #[test]
    fn windows_paths_become_uris() {
        assert_eq!(SarifReporter::uri("src\\a\\B.cs"), "src/a/B.cs");
    }
}
