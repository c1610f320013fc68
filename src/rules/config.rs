/*!
# Rules Configuration

Per-rule switches, severities and message overrides, loaded from TOML or YAML.
Rules missing from the file keep their builtin defaults.
*/

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::builtin::BuiltinRules;
use crate::analyzer::RuleFamily;
use crate::diagnostics::Severity;

/// Configuration for a single rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Severity override; the descriptor default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    /// Custom message template (`{name}` is substituted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self { enabled: true, severity: None, message: None }
    }
}

/// Rule profile: a named set of exclusions plus an optional severity floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleProfile {
    pub description: Option<String>,

    #[serde(default)]
    pub excludes: Vec<String>,

    /// Severity applied to every rule without an explicit override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Upper bound of analyze/fix rounds in `fix_all`
    #[serde(default = "default_max_fix_iterations")]
    pub max_fix_iterations: usize,

    /// Parallel analysis threads; 0 means one per CPU
    #[serde(default)]
    pub worker_threads: usize,
}

fn default_max_fix_iterations() -> usize {
    32
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self { max_fix_iterations: default_max_fix_iterations(), worker_threads: 0 }
    }
}

impl GlobalSettings {
    pub fn effective_worker_threads(&self) -> usize {
        if self.worker_threads == 0 { num_cpus::get() } else { self.worker_threads }
    }
}

/// Global rules configuration; sections missing from a file keep their defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub active_profile: String,
    pub profiles: HashMap<String, RuleProfile>,
    pub rules: HashMap<String, RuleConfig>,
    pub settings: GlobalSettings,
}

fn default_profile() -> String {
    "default".to_string()
}

impl Default for RulesConfig {
    fn default() -> Self {
        let rules = BuiltinRules::descriptors()
            .iter()
            .map(|d| (d.id.to_string(), RuleConfig::default()))
            .collect();

        let mut profiles = HashMap::new();
        profiles.insert(
            "default".to_string(),
            RuleProfile { description: Some("All consolidation rules".to_string()), excludes: Vec::new(), severity: None },
        );
        profiles.insert(
            "strict".to_string(),
            RuleProfile {
                description: Some("Every opportunity is a warning".to_string()),
                excludes: Vec::new(),
                severity: Some(Severity::Warning),
            },
        );
        // форматирование часто оставляют форматтеру
        profiles.insert(
            "lenient".to_string(),
            RuleProfile {
                description: Some("Skip formatting rules".to_string()),
                excludes: vec![RuleFamily::RemoveRedundantBlankLine.rule_id().to_string()],
                severity: None,
            },
        );

        Self { active_profile: default_profile(), profiles, rules, settings: GlobalSettings::default() }
    }
}

impl RulesConfig {
    /// Loads a TOML or YAML file, chosen by extension (TOML otherwise).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules config from {}", path.display()))?;

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        let config = if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
        .with_context(|| format!("Invalid rules config {}", path.display()))?;

        for warning in config.validate()? {
            tracing::warn!(path = %path.display(), "{}", warning);
        }
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML config")
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse YAML config")
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize rules config to TOML")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write rules config to {}", path.as_ref().display()))
    }

    fn active(&self) -> Option<&RuleProfile> {
        self.profiles.get(&self.active_profile)
    }

    pub fn is_enabled(&self, family: RuleFamily) -> bool {
        let id = family.rule_id();
        if self.active().is_some_and(|p| p.excludes.iter().any(|e| e.eq_ignore_ascii_case(id))) {
            return false;
        }
        self.rules.get(id).map_or(true, |r| r.enabled)
    }

    pub fn enabled_families(&self) -> Vec<RuleFamily> {
        RuleFamily::ALL.into_iter().filter(|f| self.is_enabled(*f)).collect()
    }

    /// Rule override, then profile severity, then the descriptor default.
    pub fn severity(&self, family: RuleFamily) -> Severity {
        self.rules
            .get(family.rule_id())
            .and_then(|r| r.severity)
            .or_else(|| self.active().and_then(|p| p.severity))
            .unwrap_or(BuiltinRules::descriptor(family).default_severity)
    }

    pub fn message_template(&self, family: RuleFamily) -> &str {
        self.rules
            .get(family.rule_id())
            .and_then(|r| r.message.as_deref())
            .unwrap_or(BuiltinRules::descriptor(family).message)
    }

    /// Оставляет включёнными только перечисленные правила (фильтр `--rule`).
    pub fn restrict_to(&mut self, rule_ids: &[String]) -> Result<()> {
        let mut keep = Vec::new();
        for id in rule_ids {
            match RuleFamily::from_rule_id(id) {
                Some(family) => keep.push(family),
                None => bail!("Unknown rule '{}'", id),
            }
        }
        for family in RuleFamily::ALL {
            self.rules.entry(family.rule_id().to_string()).or_default().enabled = keep.contains(&family);
        }
        Ok(())
    }

    /// Hard errors fail; soft problems come back as warnings.
    pub fn validate(&self) -> Result<Vec<String>> {
        if self.settings.max_fix_iterations == 0 {
            bail!("settings.max_fix_iterations must be at least 1");
        }
        let mut warnings = Vec::new();
        if self.active().is_none() {
            warnings.push(format!("Active profile '{}' not found", self.active_profile));
        }
        for rule_id in self.rules.keys() {
            if RuleFamily::from_rule_id(rule_id).is_none() {
                warnings.push(format!("Unknown rule '{}'", rule_id));
            }
        }
        for (name, profile) in &self.profiles {
            for rule_id in &profile.excludes {
                if RuleFamily::from_rule_id(rule_id).is_none() {
                    warnings.push(format!("Profile '{}' excludes unknown rule '{}'", name, rule_id));
                }
            }
        }
        warnings.sort();
        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::Builder;

    #[test]
    fn default_config_enables_everything() {
        let config = RulesConfig::default();
        assert_eq!(config.enabled_families(), RuleFamily::ALL.to_vec());
        assert_eq!(config.severity(RuleFamily::RemoveRedundantBlankLine), Severity::Hint);
        assert!(config.validate().unwrap().is_empty());
    }

    #[test]
    fn toml_overrides_and_profiles() {
        let config = RulesConfig::from_toml_str(
            r#"
active_profile = "lenient"

[profiles.lenient]
excludes = ["MRG005"]
severity = "warning"

[rules.MRG001]
severity = "error"
message = "merge me"

[rules.MRG004]
enabled = false
"#,
        )
        .unwrap();
        assert!(!config.is_enabled(RuleFamily::RemoveRedundantBlankLine));
        assert!(!config.is_enabled(RuleFamily::SimplifyIfToReturn));
        assert!(config.is_enabled(RuleFamily::RemoveRedundantAsyncAwait));
        assert_eq!(config.severity(RuleFamily::MergeNestedIf), Severity::Error);
        assert_eq!(config.severity(RuleFamily::MergeAssignmentWithReturn), Severity::Warning);
        assert_eq!(config.message_template(RuleFamily::MergeNestedIf), "merge me");
        assert_eq!(config.settings.max_fix_iterations, 32);
    }

    #[test]
    fn yaml_file_is_detected_by_extension() {
        let file = Builder::new().suffix(".yaml").tempfile().unwrap();
        std::fs::write(
            file.path(),
            "rules:\n  MRG006:\n    enabled: false\nsettings:\n  worker_threads: 2\n",
        )
        .unwrap();
        let config = RulesConfig::load_from_file(file.path()).unwrap();
        assert!(!config.is_enabled(RuleFamily::RemoveRedundantAsyncAwait));
        assert_eq!(config.settings.effective_worker_threads(), 2);
    }

    #[test]
    fn toml_round_trip_through_file() {
        let file = Builder::new().suffix(".toml").tempfile().unwrap();
        let config = RulesConfig::default();
        config.save_to_file(file.path()).unwrap();
        assert_eq!(RulesConfig::load_from_file(file.path()).unwrap(), config);
    }

    #[test]
    fn validation_reports_unknown_rules() {
        let config = RulesConfig::from_toml_str("[rules.BSL001]\nenabled = true\n").unwrap();
        assert_eq!(config.validate().unwrap(), vec!["Unknown rule 'BSL001'"]);

        let missing = RulesConfig::from_toml_str("active_profile = \"ci\"\n").unwrap();
        assert_eq!(missing.validate().unwrap(), vec!["Active profile 'ci' not found"]);

        let broken = RulesConfig::from_toml_str("[settings]\nmax_fix_iterations = 0\n").unwrap();
        assert!(broken.validate().is_err());
    }

    #[test]
    fn restrict_to_keeps_listed_rules() {
        let mut config = RulesConfig::default();
        config.restrict_to(&["mrg002".to_string()]).unwrap();
        assert_eq!(config.enabled_families(), vec![RuleFamily::MergeLocalDeclarationWithReturn]);
        assert!(config.restrict_to(&["nope".to_string()]).is_err());
    }
}
