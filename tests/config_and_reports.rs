//! Rules configuration on disk, source discovery and report rendering end to end.

use consolidation_analyzer::cli_common::collect_sources;
use consolidation_analyzer::reports::{self, AnalysisReport, ReportFormat};
use consolidation_analyzer::{AnalysisEngine, CancellationToken, Document, RuleFamily, RulesConfig, Severity};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::{tempdir, Builder};

const NESTED: &str = "class A\n{\n    void M(bool a, bool b)\n    {\n        if (a)\n        {\n            if (b) Run();\n        }\n    }\n}\n";
const PADDED: &str = "class B\n{\n\n    bool F(bool c)\n    {\n        if (c) return true;\n        return false;\n    }\n}\n";

fn analyze_dir(config: RulesConfig, root: &std::path::Path) -> AnalysisReport {
    let engine = AnalysisEngine::new(config);
    let documents: Vec<Document> = collect_sources(&[root.to_path_buf()])
        .unwrap()
        .iter()
        .map(|path| Document::from_file(path).unwrap())
        .collect();
    let results = engine.analyze_documents(&documents, &CancellationToken::new()).unwrap();

    let mut report = AnalysisReport::default();
    for (document, diagnostics) in documents.iter().zip(results) {
        let name = document.path().unwrap().file_name().unwrap().to_string_lossy().to_string();
        report.push(name, diagnostics);
    }
    report.sort();
    report
}

fn project() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::create_dir_all(dir.path().join("obj")).unwrap();
    fs::write(dir.path().join("src/A.cs"), NESTED).unwrap();
    fs::write(dir.path().join("src/B.cs"), PADDED).unwrap();
    fs::write(dir.path().join("obj/Generated.cs"), NESTED).unwrap();
    dir
}

#[test]
fn default_rules_over_a_project() {
    let dir = project();
    let report = analyze_dir(RulesConfig::default(), dir.path());
    assert_eq!(report.files_analyzed, 2);

    let ids: Vec<_> = report.diagnostics().map(|d| d.rule_id.as_str()).collect();
    assert_eq!(ids, vec!["MRG001", "MRG005", "MRG004"]);
    assert!(!report.has_errors());
}

#[test]
fn toml_file_disables_and_escalates_rules() {
    let dir = project();
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    std::io::Write::write_all(
        &mut file,
        br#"
[rules.MRG005]
enabled = false

[rules.MRG001]
severity = "error"
message = "merge these ifs"
"#,
    )
    .unwrap();

    let config = RulesConfig::load_from_file(file.path()).unwrap();
    assert!(!config.is_enabled(RuleFamily::RemoveRedundantBlankLine));
    assert_eq!(config.profiles.len(), 3);

    let report = analyze_dir(config, dir.path());
    let merged: Vec<_> = report.diagnostics().map(|d| (d.rule_id.as_str(), d.severity)).collect();
    assert_eq!(merged, vec![("MRG001", Severity::Error), ("MRG004", Severity::Info)]);
    assert_eq!(report.diagnostics().next().unwrap().message, "merge these ifs");
    assert!(report.has_errors());
}

#[test]
fn yaml_profile_selection() {
    let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
    std::io::Write::write_all(&mut file, b"active_profile: strict\n").unwrap();
    let config = RulesConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.severity(RuleFamily::MergeNestedIf), Severity::Warning);
    assert_eq!(config.enabled_families(), RuleFamily::ALL.to_vec());
}

#[test]
fn saved_config_loads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("consolidate.toml");
    let mut config = RulesConfig::default();
    config.restrict_to(&["mrg004".to_string()]).unwrap();
    config.save_to_file(&path).unwrap();

    let loaded = RulesConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.enabled_families(), vec![RuleFamily::SimplifyIfToReturn]);
}

#[test]
fn reports_in_every_format() {
    let dir = project();
    let report = analyze_dir(RulesConfig::default(), dir.path());

    let json: serde_json::Value =
        serde_json::from_str(&reports::generate(&report, ReportFormat::Json, false).unwrap()).unwrap();
    assert_eq!(json["summary"]["total"], 3);
    assert_eq!(json["files"][0]["file"], "A.cs");
    assert_eq!(json["files"][0]["diagnostics"][0]["rule_id"], "MRG001");

    let sarif: serde_json::Value =
        serde_json::from_str(&reports::generate(&report, ReportFormat::Sarif, false).unwrap()).unwrap();
    assert_eq!(sarif["version"], "2.1.0");
    let results = sarif["runs"][0]["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[2]["ruleId"], "MRG004");
    assert_eq!(results[2]["level"], "note");

    let text = reports::generate(&report, ReportFormat::Text, false).unwrap();
    assert!(text.contains("[MRG001]"), "{text}");
    assert!(text.ends_with("3 issue(s) in 2 of 2 file(s): 0 error(s), 0 warning(s), 2 info, 1 hint(s)\n"), "{text}");
}

#[test]
fn report_written_to_file() {
    let dir = project();
    let report = analyze_dir(RulesConfig::default(), dir.path());
    let out = dir.path().join("report.sarif");
    reports::save_report(&report, "sarif".parse().unwrap(), &out).unwrap();
    assert!(fs::read_to_string(&out).unwrap().contains("\"ruleId\": \"MRG005\""));
}
