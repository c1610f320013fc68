/*!
# Builtin consolidation rules

Static descriptor table for the six rule families, ids `MRG001`..`MRG006`.
*/

use once_cell::sync::Lazy;

use crate::analyzer::RuleFamily;
use crate::diagnostics::{DiagnosticDescriptor, Severity};

static DESCRIPTORS: Lazy<Vec<DiagnosticDescriptor>> = Lazy::new(|| {
    RuleFamily::ALL.into_iter().map(describe).collect()
});

fn describe(family: RuleFamily) -> DiagnosticDescriptor {
    let (title, message, default_severity, category, help) = match family {
        RuleFamily::MergeNestedIf => (
            "Merge nested if statements",
            "Nested 'if' can be merged with the enclosing 'if'",
            Severity::Info,
            "style",
            "Combine both conditions with '&&' and keep the inner statement.",
        ),
        RuleFamily::MergeLocalDeclarationWithReturn => (
            "Merge local declaration with return",
            "Local '{name}' is returned immediately after declaration",
            Severity::Info,
            "simplification",
            "Return the initializer directly.",
        ),
        RuleFamily::MergeAssignmentWithReturn => (
            "Merge assignment with return",
            "Assignment to '{name}' is returned immediately",
            Severity::Info,
            "simplification",
            "Return the assigned value directly.",
        ),
        RuleFamily::SimplifyIfToReturn => (
            "Return condition directly",
            "'if' returning boolean literals can be replaced with a single return",
            Severity::Info,
            "simplification",
            "Return the condition (or its negation).",
        ),
        RuleFamily::RemoveRedundantBlankLine => (
            "Remove redundant blank line",
            "Redundant blank line",
            Severity::Hint,
            "formatting",
            "Delete blank lines after '{' and before '}'.",
        ),
        RuleFamily::RemoveRedundantAsyncAwait => (
            "Remove redundant async/await",
            "'async' and 'await' are redundant in '{name}'",
            Severity::Info,
            "performance",
            "Drop the 'async' modifier and return the awaited task directly.",
        ),
    };
    DiagnosticDescriptor {
        id: family.rule_id(),
        family,
        title,
        message,
        default_severity,
        category,
        help,
    }
}

/// Built-in consolidation rules
pub struct BuiltinRules;

impl BuiltinRules {
    pub fn descriptors() -> &'static [DiagnosticDescriptor] {
        &DESCRIPTORS
    }

    pub fn descriptor(family: RuleFamily) -> &'static DiagnosticDescriptor {
        // таблица строится из RuleFamily::ALL в том же порядке
        &DESCRIPTORS[family as usize]
    }

    pub fn find(rule_id: &str) -> Option<&'static DiagnosticDescriptor> {
        DESCRIPTORS.iter().find(|d| d.id.eq_ignore_ascii_case(rule_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_table_follows_family_order() {
        for family in RuleFamily::ALL {
            let descriptor = BuiltinRules::descriptor(family);
            assert_eq!(descriptor.family, family);
            assert_eq!(descriptor.id, family.rule_id());
        }
        assert_eq!(BuiltinRules::descriptors().len(), 6);
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(
            BuiltinRules::find("mrg005").map(|d| d.family),
            Some(RuleFamily::RemoveRedundantBlankLine)
        );
        assert!(BuiltinRules::find("MRG999").is_none());
    }
}
