//! Применение исправлений: диагностика -> новый снимок документа.

use super::{apply_edit, plan};
use crate::analyzer::{AnalysisEngine, CancellationToken, RuleContext, RuleFamily};
use crate::core::{ConsolidationError, Result};
use crate::diagnostics::Diagnostic;
use crate::semantic::SemanticModel;
use crate::syntax::Document;

/// Результат пакетного исправления.
#[derive(Debug, Clone)]
pub struct FixOutcome {
    pub document: Document,
    pub applied: usize,
    /// `true`, если остановились по лимиту итераций, а кандидаты ещё есть.
    pub exhausted: bool,
}

pub struct CodeFixer<'e> {
    engine: &'e AnalysisEngine,
    max_iterations: usize,
}

impl<'e> CodeFixer<'e> {
    pub fn new(engine: &'e AnalysisEngine) -> Self {
        let max_iterations = engine.config().settings.max_fix_iterations;
        Self { engine, max_iterations }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Applies the fix of one diagnostic reported for `document`.
    ///
    /// The anchor is relocated by span and kind in a freshly bound model and the
    /// family's finder runs again, so a diagnostic whose shape no longer holds is
    /// rejected instead of being applied blindly.
    pub fn fix(&self, document: &Document, diagnostic: &Diagnostic) -> Result<Document> {
        ConsolidationError::ensure_version(diagnostic.version, document.version())?;
        let tree = document.tree();
        let model = SemanticModel::build(tree);
        let anchor = tree.find_node(diagnostic.anchor_span, diagnostic.anchor_kind).ok_or_else(|| {
            ConsolidationError::invalid_argument(format!(
                "{} anchor {:?} not found in {}",
                diagnostic.rule_id,
                diagnostic.anchor_kind,
                document.display_name()
            ))
        })?;
        let ctx = RuleContext::new(&model);
        let candidate = diagnostic
            .family
            .find(&ctx, anchor)
            .filter(|c| c.span == diagnostic.span)
            .ok_or_else(|| {
                ConsolidationError::invalid_argument(format!("{} no longer applies", diagnostic.rule_id))
            })?;
        let plan = plan(document, &model, &candidate)?;
        let text = apply_edit(document.text(), &plan.edit)?;
        tracing::debug!(
            rule = %diagnostic.rule_id,
            file = %document.display_name(),
            version = document.version() + 1,
            "fix applied"
        );
        document.with_text(&text)
    }

    /// Fixes `family` until no candidate remains: one edit per snapshot, fresh
    /// model every round.
    pub fn fix_all(&self, document: &Document, family: RuleFamily, token: &CancellationToken) -> Result<FixOutcome> {
        self.fix_families(document, &[family], token)
    }

    pub fn fix_families(
        &self,
        document: &Document,
        families: &[RuleFamily],
        token: &CancellationToken,
    ) -> Result<FixOutcome> {
        let mut current = document.clone();
        let mut applied = 0;
        while applied < self.max_iterations {
            let model = SemanticModel::build(current.tree());
            let candidates = self.engine.candidates_for(&model, families, token)?;
            let Some(candidate) = candidates.first() else {
                return Ok(FixOutcome { document: current, applied, exhausted: false });
            };
            let plan = plan(&current, &model, candidate)?;
            let text = apply_edit(current.text(), &plan.edit)?;
            current = current.with_text(&text)?;
            applied += 1;
        }
        let model = SemanticModel::build(current.tree());
        let exhausted = !self.engine.candidates_for(&model, families, token)?.is_empty();
        if exhausted {
            tracing::warn!(
                file = %current.display_name(),
                iterations = self.max_iterations,
                "fix iteration limit reached"
            );
        }
        Ok(FixOutcome { document: current, applied, exhausted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fix_applies_reported_diagnostic() {
        let engine = AnalysisEngine::default();
        let document = Document::parse("bool F(bool c) { if (c) return false; return true; }").unwrap();
        let diagnostics = engine.analyze(&document, &CancellationToken::new()).unwrap();
        assert_eq!(diagnostics.len(), 1);

        let fixed = CodeFixer::new(&engine).fix(&document, &diagnostics[0]).unwrap();
        assert_eq!(fixed.text(), "bool F(bool c) { return !c; }");
        assert_eq!(fixed.version(), 1);
    }

    #[test]
    fn stale_diagnostic_is_rejected() {
        let engine = AnalysisEngine::default();
        let document = Document::parse("int F() { var x = 1; return x; }").unwrap();
        let diagnostic = engine.analyze(&document, &CancellationToken::new()).unwrap().remove(0);
        let edited = document.with_text(document.text()).unwrap();

        let err = CodeFixer::new(&engine).fix(&edited, &diagnostic).unwrap_err();
        assert!(matches!(err, ConsolidationError::StaleSnapshot { expected: 0, actual: 1 }));
    }

    #[test]
    fn fix_all_merges_nested_ifs_repeatedly() {
        let engine = AnalysisEngine::default();
        let document = Document::parse("void M() { if (a) { if (b) { if (c) { F(); } } } }").unwrap();
        let outcome = CodeFixer::new(&engine)
            .fix_all(&document, RuleFamily::MergeNestedIf, &CancellationToken::new())
            .unwrap();
        assert_eq!(outcome.document.text(), "void M() { if (a && b && c) { F(); } }");
        assert_eq!(outcome.applied, 2);
        assert!(!outcome.exhausted);
    }

    #[test]
    fn iteration_limit_is_reported() {
        let engine = AnalysisEngine::default();
        let document = Document::parse("void M() { if (a) { if (b) { if (c) { F(); } } } }").unwrap();
        let outcome = CodeFixer::new(&engine)
            .with_max_iterations(1)
            .fix_all(&document, RuleFamily::MergeNestedIf, &CancellationToken::new())
            .unwrap();
        assert_eq!(outcome.applied, 1);
        assert!(outcome.exhausted);
    }
}
